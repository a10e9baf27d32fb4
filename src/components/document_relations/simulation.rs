use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use super::config::ForceConfig;
use super::geometry::Point;
use super::graph::Graph;

const NODE_MASS: f32 = 10.0;
const INITIAL_RADIUS: f64 = 10.0;

/// Index of the node in the session's [`Graph`].
#[derive(Clone, Copy, Debug, Default)]
struct Slot(usize);

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
	/// Built and seeded, not ticking yet.
	Idle,
	/// Ticking on every frame.
	Running,
	/// Stopped by the caller or cooled down. Terminal.
	Stopped,
}

/// Force layout for one render session.
///
/// Link springs and charge repulsion are integrated by `force_graph`;
/// collision and centering are applied on top, all scaled by a cooling alpha.
pub struct Simulation {
	physics: ForceGraph<Slot, ()>,
	forces: ForceConfig,
	collide_radius: f64,
	alpha: f64,
	state: SimulationState,
}

impl Simulation {
	/// Seed unplaced nodes on a spiral and mirror the graph into the physics.
	pub fn new(graph: &mut Graph, forces: &ForceConfig) -> Self {
		let max_radius = graph.max_radius();
		let mut physics = ForceGraph::new(SimulationParameters {
			force_charge: forces.charge_scale * max_radius as f32,
			force_spring: forces.spring,
			force_max: forces.force_max,
			node_speed: forces.node_speed,
			damping_factor: forces.damping,
		});

		let mut indices = Vec::with_capacity(graph.nodes().len());
		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			let seed = node.position.unwrap_or_else(|| phyllotaxis(i));
			node.position = Some(seed);
			indices.push(physics.add_node(NodeData {
				x: seed.x as f32,
				y: seed.y as f32,
				mass: NODE_MASS,
				is_anchor: false,
				user_data: Slot(i),
			}));
		}
		for link in graph.links() {
			if link.source != link.target {
				physics.add_edge(
					indices[link.source.index()],
					indices[link.target.index()],
					EdgeData::default(),
				);
			}
		}

		Self {
			physics,
			forces: forces.clone(),
			collide_radius: forces.collision_factor * max_radius,
			alpha: 1.0,
			state: SimulationState::Idle,
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SimulationState {
		self.state
	}

	/// Cooling factor, from 1 down to `alpha_min`.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Idle to running. Has no effect once stopped.
	pub fn start(&mut self) {
		match self.state {
			SimulationState::Idle => {
				debug!("Simulation started");
				self.state = SimulationState::Running;
			}
			SimulationState::Running => {}
			SimulationState::Stopped => warn!("Stopped simulations cannot be restarted"),
		}
	}

	/// Halt for good.
	pub fn stop(&mut self) {
		if self.state != SimulationState::Stopped {
			debug!("Simulation stopped at alpha {:.4}", self.alpha);
			self.state = SimulationState::Stopped;
		}
	}

	/// Advance one step. Returns false when not running.
	pub fn tick(&mut self, graph: &mut Graph) -> bool {
		if self.state != SimulationState::Running {
			return false;
		}

		self.physics.update(self.forces.time_step * self.alpha as f32);

		let mut positions: Vec<Point> = graph
			.nodes()
			.iter()
			.map(|n| n.position.unwrap_or_default())
			.collect();
		self.physics.visit_nodes(|node| {
			let p = Point::new(node.x() as f64, node.y() as f64);
			// integrator blow-ups are dropped; the previous position stands
			if p.is_finite() {
				positions[node.data.user_data.0] = p;
			}
		});

		resolve_collisions(&mut positions, self.collide_radius);
		pull_to_origin(&mut positions, self.forces.centering_strength * self.alpha);

		self.physics.visit_nodes_mut(|node| {
			let p = positions[node.data.user_data.0];
			node.data.x = p.x as f32;
			node.data.y = p.y as f32;
		});
		for (node, p) in graph.nodes_mut().iter_mut().zip(positions) {
			node.position = Some(p);
		}

		self.alpha -= self.alpha * self.forces.alpha_decay;
		if self.alpha < self.forces.alpha_min {
			info!("Layout converged");
			self.state = SimulationState::Stopped;
		}
		true
	}

	/// Fast-forward `ticks` steps before a redraw.
	pub fn tick_frame(&mut self, graph: &mut Graph, ticks: usize) -> bool {
		let mut ticked = false;
		for _ in 0..ticks {
			ticked |= self.tick(graph);
		}
		ticked
	}
}

/// Initial placement on a sunflower spiral.
fn phyllotaxis(i: usize) -> Point {
	let angle = PI * (3.0 - 5.0_f64.sqrt());
	let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let a = i as f64 * angle;
	Point::new(r * a.cos(), r * a.sin())
}

/// Push apart every pair of nodes closer than twice `radius`.
pub fn resolve_collisions(positions: &mut [Point], radius: f64) {
	let min = 2.0 * radius;
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let (dx, dy) = (
				positions[i].x - positions[j].x,
				positions[i].y - positions[j].y,
			);
			let l = dx.hypot(dy);
			if l >= min {
				continue;
			}
			if l == 0.0 {
				// stacked: split along x, half the distance each
				positions[i].x += min / 2.0;
				positions[j].x -= min / 2.0;
				continue;
			}
			let k = (min - l) / l * 0.5;
			positions[i].x += dx * k;
			positions[i].y += dy * k;
			positions[j].x -= dx * k;
			positions[j].y -= dy * k;
		}
	}
}

/// Move every node a fraction `strength` of the way toward the origin.
pub fn pull_to_origin(positions: &mut [Point], strength: f64) {
	for p in positions {
		p.x -= p.x * strength;
		p.y -= p.y * strength;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::document_relations::config::RenderConfig;
	use crate::components::document_relations::graph::normalize;
	use crate::components::document_relations::label::FixedWidthMeasurer;
	use crate::components::document_relations::types::legend_data;

	fn legend_graph() -> Graph {
		normalize(
			&legend_data(),
			&FixedWidthMeasurer::default(),
			&RenderConfig::default(),
		)
		.unwrap()
	}

	fn positions(graph: &Graph) -> Vec<Point> {
		graph.nodes().iter().map(|n| n.position.unwrap()).collect()
	}

	#[test]
	fn new_seeds_distinct_positions_and_idles() {
		let mut graph = legend_graph();
		let sim = Simulation::new(&mut graph, &ForceConfig::default());
		assert_eq!(sim.state(), SimulationState::Idle);

		let seeded = positions(&graph);
		for (i, a) in seeded.iter().enumerate() {
			for b in &seeded[i + 1..] {
				assert!(a.distance(*b) > 0.0);
			}
		}
	}

	#[test]
	fn idle_and_stopped_simulations_do_not_move_nodes() {
		let mut graph = legend_graph();
		let mut sim = Simulation::new(&mut graph, &ForceConfig::default());
		let seeded = positions(&graph);
		assert!(!sim.tick_frame(&mut graph, 3));
		assert_eq!(positions(&graph), seeded);

		sim.start();
		assert_eq!(sim.state(), SimulationState::Running);
		assert!(sim.tick_frame(&mut graph, 3));

		sim.stop();
		let frozen = positions(&graph);
		assert!(!sim.tick(&mut graph));
		assert_eq!(positions(&graph), frozen);

		sim.start();
		assert_eq!(sim.state(), SimulationState::Stopped);
	}

	#[test]
	fn cools_down_to_stopped() {
		let mut graph = legend_graph();
		let mut sim = Simulation::new(&mut graph, &ForceConfig::default());
		sim.start();
		let mut ticks = 0;
		while sim.tick(&mut graph) {
			ticks += 1;
			assert!(ticks < 1000, "simulation never converged");
		}
		assert_eq!(sim.state(), SimulationState::Stopped);
		assert!(sim.alpha() < ForceConfig::default().alpha_min);
		assert!(positions(&graph).iter().all(|p| p.is_finite()));
	}

	#[test]
	fn collisions_separate_to_twice_the_radius() {
		let mut points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
		resolve_collisions(&mut points, 10.0);
		assert!((points[0].distance(points[1]) - 20.0).abs() < 1e-9);

		let mut apart = vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
		resolve_collisions(&mut apart, 10.0);
		assert_eq!(apart[1], Point::new(50.0, 0.0));
	}

	#[test]
	fn stacked_nodes_split_to_exactly_twice_the_radius() {
		let mut stacked = vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0)];
		resolve_collisions(&mut stacked, 2.0);
		assert_eq!(stacked[0].distance(stacked[1]), 4.0);
		// split symmetrically about the shared position
		assert_eq!(stacked[0], Point::new(5.0, 3.0));
		assert_eq!(stacked[1], Point::new(1.0, 3.0));
	}

	#[test]
	fn centering_pulls_toward_origin() {
		let mut points = vec![Point::new(100.0, -50.0)];
		pull_to_origin(&mut points, 0.1);
		assert!(points[0].distance(Point::new(90.0, -45.0)) < 1e-9);
	}
}
