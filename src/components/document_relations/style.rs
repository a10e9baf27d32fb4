use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::error;

use super::types::{NodeState, Relationship};

pub const GREEN: &str = "#198754";
pub const BLUE: &str = "#0d6efd";
pub const ORANGE: &str = "#fd7e14";
pub const CYAN: &str = "#0dcaf0";
pub const YELLOW: &str = "#ffc107";
pub const TEAL: &str = "#20c997";
pub const WHITE: &str = "#fff";
pub const BLACK: &str = "#212529";
pub const GRAY200: &str = "#E5E7EB";
pub const GRAY400: &str = "#ced4da";

/// Page theme the diagram is drawn for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
	/// Dark ink on a light page.
	#[default]
	Light,
	/// Light ink on a dark page.
	Dark,
}

impl ColorMode {
	/// Circle outlines and arrowhead borders.
	pub fn outline(self) -> &'static str {
		match self {
			ColorMode::Light => BLACK,
			ColorMode::Dark => GRAY200,
		}
	}

	/// Link colour for relationship kinds with no registered colour.
	pub fn fallback(self) -> &'static str {
		match self {
			ColorMode::Light => BLACK,
			ColorMode::Dark => GRAY200,
		}
	}
}

/// Relationship colours registered for a render session.
pub struct Palette {
	mode: ColorMode,
	links: HashMap<Relationship, &'static str>,
	reported: RefCell<HashSet<String>>,
}

impl Palette {
	/// Palette with every known relationship registered.
	pub fn new(mode: ColorMode) -> Self {
		let links = HashMap::from([
			(Relationship::RefQueue, GREEN),
			(Relationship::NotReceived, BLUE),
			(Relationship::WithdrawnRef, ORANGE),
			(Relationship::RefNorm, TEAL),
			(Relationship::RelInfo, YELLOW),
		]);
		Self {
			mode,
			links,
			reported: RefCell::new(HashSet::new()),
		}
	}

	/// The colour mode the palette was built for.
	pub fn mode(&self) -> ColorMode {
		self.mode
	}

	/// Colour for a relationship kind, falling back (and logging once per
	/// kind) when none is registered.
	pub fn link_color(&self, rel: &Relationship) -> &'static str {
		if let Some(&color) = self.links.get(rel) {
			return color;
		}
		if self.reported.borrow_mut().insert(rel.as_str().to_owned()) {
			error!("Unable to find rel style {:?}", rel.as_str());
		}
		self.mode.fallback()
	}

	/// Circle fill for a display state.
	pub fn node_fill(&self, state: NodeState) -> &'static str {
		match state {
			NodeState::Published => GREEN,
			NodeState::Done => TEAL,
			NodeState::InProgress => CYAN,
			NodeState::Assigned => YELLOW,
			NodeState::NotReceived => GRAY400,
			NodeState::Received | NodeState::Unknown => WHITE,
		}
	}

	/// Label ink; light text only on the dark published fill. Fills do not
	/// change with the colour mode, so neither does the ink.
	pub fn node_text(&self, state: NodeState) -> &'static str {
		match state {
			NodeState::Published => WHITE,
			_ => BLACK,
		}
	}
}

/// Outline thickness, thicker for documents further along the queue.
pub fn node_stroke(state: NodeState) -> f64 {
	match state {
		NodeState::Published => 10.0,
		NodeState::Done => 8.0,
		NodeState::InProgress => 4.0,
		NodeState::Assigned => 2.0,
		NodeState::NotReceived | NodeState::Received | NodeState::Unknown => 1.0,
	}
}

pub fn node_dashed(state: NodeState) -> bool {
	state == NodeState::NotReceived
}

pub fn link_dashed(rel: &Relationship) -> bool {
	matches!(rel, Relationship::NotReceived | Relationship::WithdrawnRef)
}

/// `stroke-dasharray` value.
pub fn dash_array(dashed: bool) -> &'static str {
	if dashed { "4" } else { "0" }
}
