//! Everything the renderer draws, computed without touching the DOM.

use super::geometry::{ViewBox, edge_path, scene_bounds};
use super::graph::{Graph, Link, NO_DESTINATION, Node};
use super::label::line_offset;
use super::style::{self, Palette};
use super::types::{NodeState, Relationship};

/// Text to show next to a hovered or focused element.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// One entry per displayed line.
	pub text: Vec<String>,
	/// Viewport coordinates of the anchor point.
	pub position: [f64; 2],
}

/// Arrowhead definition, one per relationship kind present.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
	pub id: String,
	pub fill: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: &'static str,
	pub dash: &'static str,
	pub marker: String,
	pub class: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
	pub text: String,
	pub y: f64,
	pub style: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub href: String,
	pub fill: &'static str,
	pub ink: &'static str,
	pub outline: &'static str,
	pub stroke_width: f64,
	pub dash: &'static str,
	pub radius: f64,
	pub lines: Vec<TextLine>,
}

/// Attributes fixed for the whole session.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	/// Arrowheads, one per relationship kind in use.
	pub markers: Vec<Marker>,
	/// Parallel to [`Graph::links`].
	pub edges: Vec<EdgeStyle>,
	/// Parallel to [`Graph::nodes`].
	pub nodes: Vec<NodeStyle>,
}

fn marker_id(rel: &Relationship) -> String {
	format!("marker-{}", rel.slug())
}

impl Scene {
	/// Resolve colours, dashes, markers and label lines for `graph`.
	pub fn build(graph: &Graph, palette: &Palette) -> Self {
		let mut markers: Vec<Marker> = Vec::new();
		for link in graph.links() {
			let id = marker_id(&link.rel);
			if !markers.iter().any(|m| m.id == id) {
				markers.push(Marker {
					id,
					fill: palette.link_color(&link.rel),
				});
			}
		}

		let edges = graph
			.links()
			.iter()
			.map(|link| EdgeStyle {
				color: palette.link_color(&link.rel),
				dash: style::dash_array(style::link_dashed(&link.rel)),
				marker: format!("url(#{})", marker_id(&link.rel)),
				class: link.rel.slug(),
			})
			.collect();

		let outline = palette.mode().outline();
		let nodes = graph
			.nodes()
			.iter()
			.map(|node| {
				let n = node.lines().len();
				NodeStyle {
					href: node.href().to_owned(),
					fill: palette.node_fill(node.state),
					ink: palette.node_text(node.state),
					outline,
					stroke_width: node.stroke(),
					dash: style::dash_array(style::node_dashed(node.state)),
					radius: node.circle_radius(),
					lines: node
						.lines()
						.iter()
						.enumerate()
						.map(|(i, line)| TextLine {
							text: line.text.clone(),
							y: line_offset(i, n),
							style: line.style.map(|s| s.css()).unwrap_or_default(),
						})
						.collect(),
				}
			})
			.collect();

		Self {
			markers,
			edges,
			nodes,
		}
	}
}

/// Attributes that change on every redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	/// `d` per link; empty while an endpoint is unplaced.
	pub edge_paths: Vec<String>,
	/// `transform` per node; empty while unplaced.
	pub node_transforms: Vec<String>,
	/// Fitted to everything drawn, or the initial view before placement.
	pub view_box: ViewBox,
}

impl Frame {
	/// Snapshot current positions, padding the view box by `padding`.
	pub fn capture(graph: &Graph, padding: f64) -> Self {
		let edge_paths = graph
			.links()
			.iter()
			.map(|link| edge_path(graph.source(link), graph.target(link)))
			.collect();
		let node_transforms = graph
			.nodes()
			.iter()
			.map(|node| match node.position {
				Some(p) => format!("translate({:.2}, {:.2})", p.x, p.y),
				None => String::new(),
			})
			.collect();
		let view_box = scene_bounds(graph)
			.map(|b| ViewBox::fit(b, padding))
			.unwrap_or(ViewBox::INITIAL);
		Self {
			edge_paths,
			node_transforms,
			view_box,
		}
	}
}

/// One line per relationship drawn between the same ordered pair.
pub fn edge_tooltip(graph: &Graph, link: &Link) -> Vec<String> {
	let (source, target) = (graph.source(link), graph.target(link));
	graph
		.links_between(link.source, link.target)
		.map(|l| format!("{} {} {}", source.id(), l.rel.human(), target.id()))
		.collect()
}

pub fn node_tooltip(node: &Node) -> Vec<String> {
	let param = &node.param;
	let name = match (node.state, param.rfc_number) {
		(NodeState::Published, Some(number)) => {
			format!("RFC {number}, {}", param.id.to_uppercase())
		}
		(NodeState::Published, None) => param.id.to_uppercase(),
		_ => param.id.clone(),
	};

	let mut text = vec![name];
	if param.is_rfc {
		text.push("Published".to_owned());
	}
	match param.is_received {
		Some(true) => text.push("Received".to_owned()),
		Some(false) => text.push("Not received".to_owned()),
		None => {}
	}
	if let Some(disposition) = param.disposition {
		text.push(format!("Disposition: {}", disposition.describe()));
	}
	text
}

/// Where a click on a node link should go, if anywhere.
pub fn click_destination(href: &str) -> Option<&str> {
	match href {
		"" | NO_DESTINATION => None,
		href => Some(href),
	}
}

/// Invoke `navigate` for a real destination. Returns whether it was called.
pub fn follow_link(href: &str, navigate: &dyn Fn(&str)) -> bool {
	match click_destination(href) {
		Some(path) => {
			log::debug!("SPA navigating to {path}");
			navigate(path);
			true
		}
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::components::document_relations::config::RenderConfig;
	use crate::components::document_relations::geometry::Point;
	use crate::components::document_relations::graph::normalize;
	use crate::components::document_relations::label::FixedWidthMeasurer;
	use crate::components::document_relations::style::{BLACK, ColorMode, GREEN};
	use crate::components::document_relations::types::{
		DataParam, Disposition, LinkParam, NodeParam, legend_data,
	};

	fn graph_of(data: &DataParam) -> Graph {
		normalize(data, &FixedWidthMeasurer::default(), &RenderConfig::default()).unwrap()
	}

	#[test]
	fn unmapped_relationship_renders_with_fallback() {
		let data = DataParam {
			nodes: vec![NodeParam::new("a"), NodeParam::new("b")],
			links: vec![
				LinkParam::new("a", "b", "refqueue"),
				LinkParam::new("a", "b", "downref"),
			],
		};
		let mut graph = graph_of(&data);
		let scene = Scene::build(&graph, &Palette::new(ColorMode::Light));

		assert_eq!(scene.edges[0].color, GREEN);
		assert_eq!(scene.edges[1].color, BLACK);
		assert_eq!(scene.edges[1].marker, "url(#marker-downref)");
		assert_eq!(scene.markers.len(), 2);

		graph.nodes_mut()[0].position = Some(Point::new(0.0, 0.0));
		graph.nodes_mut()[1].position = Some(Point::new(200.0, 0.0));
		let frame = Frame::capture(&graph, 5.0);
		assert!(frame.edge_paths.iter().all(|p| !p.is_empty()));
	}

	#[test]
	fn frame_paths_fill_in_once_positions_exist() {
		let mut graph = graph_of(&legend_data());
		let before = Frame::capture(&graph, 5.0);
		assert!(before.edge_paths.iter().all(String::is_empty));
		assert!(before.node_transforms.iter().all(String::is_empty));
		assert_eq!(before.view_box, ViewBox::INITIAL);

		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			node.position = Some(Point::new(i as f64 * 120.0, 0.0));
		}
		let after = Frame::capture(&graph, 5.0);
		assert!(after.edge_paths.iter().all(|p| !p.is_empty()));
		assert_eq!(after.node_transforms[1], "translate(120.00, 0.00)");
		assert_ne!(after.view_box, ViewBox::INITIAL);
	}

	#[test]
	fn node_styles_follow_state() {
		let graph = graph_of(&legend_data());
		let scene = Scene::build(&graph, &Palette::new(ColorMode::Light));
		let hub = &scene.nodes[0];
		assert_eq!(hub.fill, GREEN);
		assert_eq!(hub.lines[0].text, "RFC 100");
		assert_eq!(hub.lines[0].style, "font-weight: bold");
		assert_eq!(hub.href, NO_DESTINATION);

		let not_received = graph.node_by_id("draft-is-not-received").unwrap();
		assert_eq!(scene.nodes[not_received.index()].dash, "4");
	}

	#[test]
	fn edge_tooltip_joins_parallel_relationships() {
		let data = DataParam {
			nodes: vec![NodeParam::new("a"), NodeParam::new("b")],
			links: vec![
				LinkParam::new("a", "b", "refqueue"),
				LinkParam::new("b", "a", "relinfo"),
				LinkParam::new("a", "b", "refnorm"),
			],
		};
		let graph = graph_of(&data);
		assert_eq!(
			edge_tooltip(&graph, &graph.links()[0]),
			["a has ref queue to b", "a has ref norm to b"]
		);
		assert_eq!(edge_tooltip(&graph, &graph.links()[1]), ["b has rel info to a"]);
	}

	#[test]
	fn node_tooltip_summarizes_state() {
		let data = DataParam {
			nodes: vec![
				NodeParam {
					is_rfc: true,
					rfc_number: Some(9110),
					..NodeParam::new("draft-ietf-httpbis-semantics")
				},
				NodeParam {
					is_received: Some(false),
					disposition: Some(Disposition::InProgress),
					..NodeParam::new("draft-b")
				},
			],
			links: vec![],
		};
		let graph = graph_of(&data);
		assert_eq!(
			node_tooltip(&graph.nodes()[0]),
			["RFC 9110, DRAFT-IETF-HTTPBIS-SEMANTICS", "Published"]
		);
		assert_eq!(
			node_tooltip(&graph.nodes()[1]),
			["draft-b", "Not received", "Disposition: in progress"]
		);
	}

	#[test]
	fn placeholder_link_does_not_navigate() {
		let visited = RefCell::new(Vec::new());
		let navigate = |path: &str| visited.borrow_mut().push(path.to_owned());

		assert!(!follow_link("#", &navigate));
		assert!(visited.borrow().is_empty());

		assert!(follow_link("/docs/foo", &navigate));
		assert_eq!(*visited.borrow(), ["/docs/foo"]);
	}
}
