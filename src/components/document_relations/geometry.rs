//! Edge arcs, bounding boxes and view box fitting.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use super::graph::{Graph, Node};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	fn on_circle(center: Point, radius: f64, angle: f64) -> Point {
		Point::new(
			center.x + radius * angle.cos(),
			center.y + radius * angle.sin(),
		)
	}
}

/// Clockwise arc between two node boundaries, with radius equal to the
/// distance between the node centres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeArc {
	pub start: Point,
	pub end: Point,
	pub radius: f64,
	center: Point,
	start_angle: f64,
	end_angle: f64,
}

/// Angle swept by an arc whose radius equals its chord.
const ARC_SWEEP: f64 = PI / 3.0;

impl EdgeArc {
	/// `None` while either endpoint has no position yet.
	pub fn between(source: &Node, target: &Node) -> Option<Self> {
		let (s, t) = (source.position?, target.position?);
		let radius = s.distance(t);
		if radius <= f64::EPSILON {
			return Some(Self {
				start: s,
				end: s,
				radius: 0.0,
				center: s,
				start_angle: 0.0,
				end_angle: 0.0,
			});
		}

		let (ux, uy) = ((t.x - s.x) / radius, (t.y - s.y) / radius);
		let offset = radius * (ARC_SWEEP / 2.0).cos();
		let center = Point::new(
			(s.x + t.x) / 2.0 - uy * offset,
			(s.y + t.y) / 2.0 + ux * offset,
		);
		let base = (s.y - center.y).atan2(s.x - center.x);
		let length = radius * ARC_SWEEP;

		// trim so the path starts and ends just outside each outlined circle
		let from = (source.radius() + source.stroke()).min(length);
		let to = (length - target.radius() - target.stroke()).max(from);
		let (start_angle, end_angle) = (base + from / radius, base + to / radius);

		Some(Self {
			start: Point::on_circle(center, radius, start_angle),
			end: Point::on_circle(center, radius, end_angle),
			radius,
			center,
			start_angle,
			end_angle,
		})
	}

	pub fn to_path(&self) -> String {
		format!(
			"M{:.2},{:.2} A{:.2},{:.2} 0 0,1 {:.2},{:.2}",
			self.start.x, self.start.y, self.radius, self.radius, self.end.x, self.end.y
		)
	}

	pub fn bounds(&self) -> Bounds {
		let mut bounds = Bounds::at(self.start);
		bounds.include(self.end);
		// axis extremes inside the swept range
		let first = (self.start_angle / FRAC_PI_2).ceil() as i64;
		let last = (self.end_angle / FRAC_PI_2).floor() as i64;
		for k in first..=last {
			bounds.include(Point::on_circle(
				self.center,
				self.radius,
				k as f64 * FRAC_PI_2,
			));
		}
		bounds
	}
}

/// SVG path data for a link; empty while geometry is incomplete.
pub fn edge_path(source: &Node, target: &Node) -> String {
	EdgeArc::between(source, target)
		.map(|arc| arc.to_path())
		.unwrap_or_default()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn at(p: Point) -> Self {
		Self {
			min_x: p.x,
			min_y: p.y,
			max_x: p.x,
			max_y: p.y,
		}
	}

	pub fn circle(center: Point, radius: f64) -> Self {
		Self {
			min_x: center.x - radius,
			min_y: center.y - radius,
			max_x: center.x + radius,
			max_y: center.y + radius,
		}
	}

	pub fn include(&mut self, p: Point) {
		self.min_x = self.min_x.min(p.x);
		self.min_y = self.min_y.min(p.y);
		self.max_x = self.max_x.max(p.x);
		self.max_y = self.max_y.max(p.y);
	}

	pub fn union(self, other: Bounds) -> Bounds {
		Bounds {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}
}

/// Tight box around every placed circle and drawn arc, in scene units.
pub fn scene_bounds(graph: &Graph) -> Option<Bounds> {
	let circles = graph.nodes().iter().filter_map(|node| {
		node.position
			.map(|p| Bounds::circle(p, node.circle_radius()))
	});
	let arcs = graph.links().iter().filter_map(|link| {
		EdgeArc::between(graph.source(link), graph.target(link)).map(|arc| arc.bounds())
	});
	circles.chain(arcs).reduce(Bounds::union)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl ViewBox {
	/// View used before anything has been placed.
	pub const INITIAL: ViewBox = ViewBox {
		x: -500.0,
		y: -500.0,
		width: 1000.0,
		height: 1000.0,
	};

	pub fn fit(bounds: Bounds, padding: f64) -> Self {
		Self {
			x: bounds.min_x - padding,
			y: bounds.min_y - padding,
			width: bounds.max_x - bounds.min_x + 2.0 * padding,
			height: bounds.max_y - bounds.min_y + 2.0 * padding,
		}
	}

	/// Pixels per scene unit when shown in a `width` x `height` element with
	/// the default `xMidYMid meet` aspect ratio.
	pub fn scale_in(&self, width: f64, height: f64) -> f64 {
		let scale = (width / self.width).min(height / self.height);
		if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
	}

	/// Map a point relative to the element's top left corner into scene
	/// units, undoing the uniform scale and the letterbox centring.
	pub fn to_scene(&self, (width, height): (f64, f64), (px, py): (f64, f64)) -> Point {
		let scale = self.scale_in(width, height);
		let offset_x = (width - self.width * scale) / 2.0;
		let offset_y = (height - self.height * scale) / 2.0;
		Point::new(
			self.x + (px - offset_x) / scale,
			self.y + (py - offset_y) / scale,
		)
	}
}

impl fmt::Display for ViewBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:.2} {:.2} {:.2} {:.2}",
			self.x, self.y, self.width, self.height
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::document_relations::config::RenderConfig;
	use crate::components::document_relations::graph::normalize;
	use crate::components::document_relations::label::FixedWidthMeasurer;
	use crate::components::document_relations::types::{DataParam, LinkParam, NodeParam};

	fn pair() -> Graph {
		let data = DataParam {
			nodes: vec![NodeParam::new("a"), NodeParam::new("b")],
			links: vec![LinkParam::new("a", "b", "refqueue")],
		};
		normalize(&data, &FixedWidthMeasurer::default(), &RenderConfig::default()).unwrap()
	}

	fn place(graph: &mut Graph, a: Point, b: Point) {
		graph.nodes_mut()[0].position = Some(a);
		graph.nodes_mut()[1].position = Some(b);
	}

	#[test]
	fn path_is_empty_until_both_endpoints_are_placed() {
		let mut graph = pair();
		let (a, b) = (&graph.nodes()[0], &graph.nodes()[1]);
		assert_eq!(edge_path(a, b), "");

		graph.nodes_mut()[0].position = Some(Point::new(0.0, 0.0));
		assert_eq!(edge_path(&graph.nodes()[0], &graph.nodes()[1]), "");

		graph.nodes_mut()[1].position = Some(Point::new(300.0, 0.0));
		let path = edge_path(&graph.nodes()[0], &graph.nodes()[1]);
		assert!(path.starts_with('M'), "{path}");
		assert!(path.contains(" A300.00,300.00 0 0,1 "), "{path}");
	}

	#[test]
	fn coincident_nodes_still_draw_a_path() {
		let mut graph = pair();
		place(&mut graph, Point::new(5.0, 5.0), Point::new(5.0, 5.0));
		assert!(!edge_path(&graph.nodes()[0], &graph.nodes()[1]).is_empty());
	}

	#[test]
	fn arc_is_trimmed_to_node_boundaries() {
		let mut graph = pair();
		place(&mut graph, Point::new(0.0, 0.0), Point::new(400.0, 0.0));
		let (a, b) = (&graph.nodes()[0], &graph.nodes()[1]);
		let arc = EdgeArc::between(a, b).unwrap();

		// endpoints stay on the arc's circle
		assert!((arc.center.distance(arc.start) - arc.radius).abs() < 1e-9);
		assert!((arc.center.distance(arc.end) - arc.radius).abs() < 1e-9);

		// and land roughly one outlined radius away from each centre
		let trim_a = a.radius() + a.stroke();
		let trim_b = b.radius() + b.stroke();
		let start = a.position.unwrap().distance(arc.start);
		let end = b.position.unwrap().distance(arc.end);
		assert!(start <= trim_a + 1e-9 && start > trim_a * 0.95);
		assert!(end <= trim_b + 1e-9 && end > trim_b * 0.95);
	}

	#[test]
	fn arc_bounds_include_bulge() {
		let mut graph = pair();
		place(&mut graph, Point::new(-100.0, 0.0), Point::new(100.0, 0.0));
		let arc = EdgeArc::between(&graph.nodes()[0], &graph.nodes()[1]).unwrap();
		let bounds = arc.bounds();
		// a clockwise arc from left to right bulges toward negative y
		assert!(arc.center.y > 0.0);
		assert!(bounds.min_y < arc.start.y.min(arc.end.y));
	}

	#[test]
	fn view_box_pads_scene_bounds() {
		let mut graph = pair();
		assert_eq!(scene_bounds(&graph), None);

		place(&mut graph, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
		let bounds = scene_bounds(&graph).unwrap();
		let r = graph.nodes()[0].circle_radius();
		assert!(bounds.min_x <= -r);
		assert!(bounds.max_x >= 100.0 + graph.nodes()[1].circle_radius());

		let view = ViewBox::fit(bounds, 5.0);
		assert_eq!(view.x, bounds.min_x - 5.0);
		assert_eq!(view.width, bounds.max_x - bounds.min_x + 10.0);
		assert_eq!(ViewBox::INITIAL.to_string(), "-500.00 -500.00 1000.00 1000.00");
	}

	#[test]
	fn pointer_mapping_follows_letterboxed_meet_scale() {
		let view = ViewBox {
			x: -50.0,
			y: -50.0,
			width: 100.0,
			height: 100.0,
		};
		// 800x400 element: uniform scale 4, content centred starting at x=200
		assert_eq!(view.scale_in(800.0, 400.0), 4.0);
		assert_eq!(view.to_scene((800.0, 400.0), (200.0, 0.0)), Point::new(-50.0, -50.0));
		assert_eq!(view.to_scene((800.0, 400.0), (400.0, 200.0)), Point::new(0.0, 0.0));
		assert_eq!(view.to_scene((800.0, 400.0), (600.0, 400.0)), Point::new(50.0, 50.0));

		// collapsed element leaves coordinates unscaled
		assert_eq!(view.scale_in(0.0, 0.0), 1.0);
	}
}
