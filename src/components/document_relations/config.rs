use serde::Deserialize;

/// Outline thickness that the view box padding is derived from.
pub const DEFAULT_STROKE: f64 = 10.0;

/// What to do with a link whose endpoint id is not a declared node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityPolicy {
	/// Fail the whole normalization.
	Strict,
	/// Drop the link and log a warning.
	#[default]
	Lenient,
}

/// Physics parameters of the layout simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Repulsion charge per unit of the largest node radius.
	pub charge_scale: f32,
	/// Link spring stiffness.
	pub spring: f32,
	/// Cap on the force applied to a node in one step.
	pub force_max: f32,
	/// Speed limit handed to the integrator.
	pub node_speed: f32,
	/// Velocity retained between steps.
	pub damping: f32,
	/// Collision radius as a multiple of the largest node radius.
	pub collision_factor: f64,
	/// Fraction of the distance to the origin removed per tick.
	pub centering_strength: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Per-tick alpha decrement factor; the default settles in about 300 ticks.
	pub alpha_decay: f64,
	/// Integrator step at full alpha, in seconds.
	pub time_step: f32,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			charge_scale: 5.0,
			spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			collision_factor: 1.25,
			centering_strength: 0.1,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			time_step: 0.016,
		}
	}
}

/// Settings for one render session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
	/// Physics ticks fast-forwarded per drawn frame.
	pub ticks_per_frame: usize,
	/// Lower bound for node radii so empty labels still collide.
	pub min_radius: f64,
	/// Handling of links to undeclared nodes.
	pub integrity: IntegrityPolicy,
	/// Scene units added around the fitted bounds.
	pub viewport_padding: f64,
	/// Zoom limits as (min, max) scale factors.
	pub scale_extent: (f64, f64),
	/// Layout physics.
	pub forces: ForceConfig,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			ticks_per_frame: 3,
			min_radius: 1.0,
			integrity: IntegrityPolicy::default(),
			viewport_padding: DEFAULT_STROKE / 2.0,
			scale_extent: (1.0 / 32.0, 32.0),
			forces: ForceConfig::default(),
		}
	}
}
