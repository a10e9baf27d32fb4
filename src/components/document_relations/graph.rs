//! Turns caller-supplied [`DataParam`] into the session-owned node store that
//! the simulation mutates and the renderer reads.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, warn};

use super::config::{IntegrityPolicy, RenderConfig};
use super::error::{Error, Result};
use super::geometry::Point;
use super::label::{Line, TextMeasurer, fit_label};
use super::style::node_stroke;
use super::types::{DataParam, NodeParam, NodeState, Relationship};

/// Href given to nodes without a destination so they stay focusable.
pub const NO_DESTINATION: &str = "#";

/// Index of a node in its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(usize);

impl NodeIdx {
	/// Position in [`Graph::nodes`].
	pub fn index(self) -> usize {
		self.0
	}
}

/// A document laid out for one render session.
#[derive(Clone, Debug)]
pub struct Node {
	/// The input record, unchanged.
	pub param: NodeParam,
	/// Display state derived from `param`.
	pub state: NodeState,
	/// Unset until the simulation seeds it.
	pub position: Option<Point>,
	lines: Vec<Line>,
	radius: f64,
	stroke: f64,
}

impl Node {
	/// The document id links refer to.
	pub fn id(&self) -> &str {
		&self.param.id
	}

	/// Fitted label lines.
	pub fn lines(&self) -> &[Line] {
		&self.lines
	}

	/// Radius of the label block; fixed for the lifetime of the node.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Outline thickness.
	pub fn stroke(&self) -> f64 {
		self.stroke
	}

	/// Radius of the drawn circle, so that the outline sits outside the label.
	pub fn circle_radius(&self) -> f64 {
		self.radius + self.stroke / 2.0
	}

	/// Link target, or `#` when the node has no url.
	pub fn href(&self) -> &str {
		self.param.url.as_deref().unwrap_or(NO_DESTINATION)
	}
}

/// A relationship whose endpoints are resolved to nodes of the same graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Referencing document.
	pub source: NodeIdx,
	/// Referenced document.
	pub target: NodeIdx,
	/// Kind of the reference.
	pub rel: Relationship,
}

/// Nodes in input order and the links that survived normalization.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, NodeIdx>,
}

impl Graph {
	/// All nodes, in input order minus duplicates.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable access for the simulation; positions only change here.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Resolved links, in input order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Panics if `idx` came from another graph.
	pub fn node(&self, idx: NodeIdx) -> &Node {
		&self.nodes[idx.0]
	}

	/// Index of the node declared with `id`.
	pub fn node_by_id(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	/// The node a link starts from.
	pub fn source(&self, link: &Link) -> &Node {
		self.node(link.source)
	}

	/// The node a link points at.
	pub fn target(&self, link: &Link) -> &Node {
		self.node(link.target)
	}

	/// Largest label radius, 0 for an empty graph.
	pub fn max_radius(&self) -> f64 {
		self.nodes.iter().map(Node::radius).fold(0.0, f64::max)
	}

	/// Links running from `source` to `target`, in input order.
	pub fn links_between(&self, source: NodeIdx, target: NodeIdx) -> impl Iterator<Item = &Link> {
		self.links
			.iter()
			.filter(move |l| l.source == source && l.target == target)
	}
}

/// Build the layout graph: fit labels, derive styles, resolve link endpoints.
pub fn normalize(
	data: &DataParam,
	measurer: &dyn TextMeasurer,
	config: &RenderConfig,
) -> Result<Graph> {
	let mut graph = Graph::default();

	for param in &data.nodes {
		let idx = NodeIdx(graph.nodes.len());
		match graph.index.entry(param.id.clone()) {
			Entry::Occupied(_) => {
				warn!("Duplicate node id {:?}, keeping the first", param.id);
				continue;
			}
			Entry::Vacant(slot) => {
				slot.insert(idx);
			}
		}
		let label = fit_label(measurer, Some(&param.id), param.rfc_number)?;
		let state = NodeState::of(param);
		graph.nodes.push(Node {
			param: param.clone(),
			state,
			position: None,
			lines: label.lines,
			radius: label.radius.max(config.min_radius),
			stroke: node_stroke(state),
		});
	}

	for link in &data.links {
		let source = graph.node_by_id(&link.source);
		let target = graph.node_by_id(&link.target);
		match (source, target) {
			(Some(source), Some(target)) => graph.links.push(Link {
				source,
				target,
				rel: link.rel.clone(),
			}),
			_ => {
				let missing = if source.is_none() {
					&link.source
				} else {
					&link.target
				};
				let err = Error::MissingEndpoint {
					from: link.source.clone(),
					to: link.target.clone(),
					missing: missing.clone(),
				};
				match config.integrity {
					IntegrityPolicy::Strict => return Err(err),
					IntegrityPolicy::Lenient => warn!("Dropping link: {err}"),
				}
			}
		}
	}

	debug!(
		"Normalized {} nodes and {} links",
		graph.nodes.len(),
		graph.links.len()
	);
	Ok(graph)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::document_relations::label::FixedWidthMeasurer;
	use crate::components::document_relations::types::{LinkParam, legend_data};

	fn two_nodes(target: &str) -> DataParam {
		DataParam {
			nodes: vec![NodeParam::new("a"), NodeParam::new("b")],
			links: vec![LinkParam::new("a", target, "refqueue")],
		}
	}

	#[test]
	fn resolves_link_endpoints_to_nodes() {
		let graph = normalize(
			&two_nodes("b"),
			&FixedWidthMeasurer::default(),
			&RenderConfig::default(),
		)
		.unwrap();

		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.links().len(), 1);
		let link = &graph.links()[0];
		assert!(std::ptr::eq(graph.source(link), &graph.nodes()[0]));
		assert!(std::ptr::eq(graph.target(link), &graph.nodes()[1]));
		assert_eq!(graph.target(link).id(), "b");
		assert_eq!(link.rel, Relationship::RefQueue);
	}

	#[test]
	fn lenient_policy_drops_dangling_link() {
		let mut data = legend_data();
		let before = data.links.len();
		data.links
			.insert(2, LinkParam::new("draft-one-with-rfc", "missing-id", "refnorm"));

		let graph = normalize(&data, &FixedWidthMeasurer::default(), &RenderConfig::default())
			.unwrap();

		assert_eq!(graph.links().len(), before);
		assert!(
			graph
				.links()
				.iter()
				.all(|l| graph.target(l).id() != "missing-id")
		);
	}

	#[test]
	fn strict_policy_fails_on_dangling_link() {
		let config = RenderConfig {
			integrity: IntegrityPolicy::Strict,
			..RenderConfig::default()
		};
		let err = normalize(&two_nodes("missing-id"), &FixedWidthMeasurer::default(), &config)
			.unwrap_err();
		match err {
			Error::MissingEndpoint { missing, .. } => assert_eq!(missing, "missing-id"),
			other => panic!("unexpected error {other:?}"),
		}
	}

	#[test]
	fn nodes_start_unplaced_with_positive_radius() {
		let data = DataParam {
			nodes: vec![NodeParam::new(""), NodeParam::new("draft-x")],
			links: vec![],
		};
		let graph = normalize(&data, &FixedWidthMeasurer::default(), &RenderConfig::default())
			.unwrap();
		assert!(graph.nodes().iter().all(|n| n.position.is_none()));
		assert_eq!(graph.nodes()[0].radius(), 1.0);
		assert!(graph.nodes()[0].lines().is_empty());
		assert_eq!(graph.max_radius(), graph.nodes()[1].radius());
		assert_eq!(graph.nodes()[1].href(), NO_DESTINATION);
	}

	#[test]
	fn duplicate_ids_keep_first_node() {
		let data = DataParam {
			nodes: vec![
				NodeParam {
					rfc_number: Some(1),
					..NodeParam::new("a")
				},
				NodeParam::new("a"),
			],
			links: vec![],
		};
		let graph = normalize(&data, &FixedWidthMeasurer::default(), &RenderConfig::default())
			.unwrap();
		assert_eq!(graph.nodes().len(), 1);
		assert_eq!(graph.nodes()[0].param.rfc_number, Some(1));
		assert_eq!(graph.node_by_id("a"), Some(NodeIdx(0)));
	}
}
