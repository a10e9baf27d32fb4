mod component;
mod config;
mod error;
mod geometry;
mod graph;
mod label;
mod measure;
mod render;
mod scene;
mod simulation;
mod state;
mod style;
mod types;

pub use component::DocumentRelations;
pub use config::{ForceConfig, IntegrityPolicy, RenderConfig};
pub use error::Error;
pub use graph::{Graph, Link, Node, NodeIdx, normalize};
pub use label::{FixedWidthMeasurer, Label, Line, TextMeasurer, fit_label};
pub use measure::CanvasMeasurer;
pub use render::{Navigate, RenderHandle, SimulationHandle, TooltipSink, render};
pub use scene::{Frame, Scene, Tooltip, follow_link};
pub use simulation::{Simulation, SimulationState};
pub use style::{ColorMode, Palette};
pub use types::{DataParam, Disposition, LinkParam, NodeParam, NodeState, Relationship, legend_data};
