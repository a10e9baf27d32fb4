use log::info;

use super::config::RenderConfig;
use super::error::Result;
use super::graph::{Graph, normalize};
use super::label::TextMeasurer;
use super::scene::{Frame, Scene};
use super::simulation::{Simulation, SimulationState};
use super::style::Palette;
use super::types::DataParam;

/// Pan/zoom applied to the whole scene. Kept out of the view box fit.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Scale by `factor` about the scene point (`px`, `py`).
	pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64, (min, max): (f64, f64)) {
		let new_k = (self.k * factor).clamp(min, max);
		let ratio = new_k / self.k;
		self.x = px - (px - self.x) * ratio;
		self.y = py - (py - self.y) * ratio;
		self.k = new_k;
	}

	pub fn to_svg(&self) -> String {
		format!("translate({:.2},{:.2}) scale({:.4})", self.x, self.y, self.k)
	}
}

/// Drag in progress. The start is in client pixels, so a view box refit
/// mid-drag does not shift the anchor.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything one render session owns.
pub struct RelationsState {
	pub graph: Graph,
	pub simulation: Simulation,
	pub scene: Scene,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub config: RenderConfig,
}

impl RelationsState {
	pub fn new(
		data: &DataParam,
		measurer: &dyn TextMeasurer,
		palette: &Palette,
		config: RenderConfig,
	) -> Result<Self> {
		let mut graph = normalize(data, measurer, &config)?;
		let simulation = Simulation::new(&mut graph, &config.forces);
		let scene = Scene::build(&graph, palette);
		info!(
			"Relations diagram with {} nodes and {} links",
			graph.nodes().len(),
			graph.links().len()
		);
		Ok(Self {
			graph,
			simulation,
			scene,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			config,
		})
	}

	pub fn is_running(&self) -> bool {
		self.simulation.state() == SimulationState::Running
	}

	/// Run a batch of ticks; `None` when nothing moved.
	pub fn advance(&mut self) -> Option<Frame> {
		self.simulation
			.tick_frame(&mut self.graph, self.config.ticks_per_frame)
			.then(|| self.frame())
	}

	pub fn frame(&self) -> Frame {
		Frame::capture(&self.graph, self.config.viewport_padding)
	}

	/// Start a drag at client pixel (`x`, `y`).
	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Follow the pointer to client pixel (`x`, `y`); `scale` is the current
	/// pixels per scene unit.
	pub fn pan_to(&mut self, x: f64, y: f64, scale: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x) / scale;
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y) / scale;
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Wheel zoom about a scene point.
	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform
			.zoom_at(x, y, factor, self.config.scale_extent);
	}
}
