//! Interactive system-architecture simulator core.
//!
//! A purely functional, synchronous library: given a graph of abstract
//! infrastructure components, it validates the topology, simulates request
//! flow under a traffic profile, and reviews the result for common
//! architectural smells. See [`api::evaluate`] for the combined operation,
//! or [`validator::validate`]/[`simulator::simulate`] to run the individual
//! stages.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph_builder;
pub mod layers;
pub mod recommender;
pub mod reviewer;
pub mod simulator;
pub mod types;
pub mod validator;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for consumers of this crate.
pub mod prelude {
    pub use crate::api::{evaluate, validate, EvaluationResult};
    pub use crate::catalog::ComponentType;
    pub use crate::graph_builder::GraphBuilder;
    pub use crate::layers::Layer;
    pub use crate::simulator::{NodeMetric, NodeStatus, PerformanceSummary, SimulationOutcome};
    pub use crate::types::{Edge, Graph, Node, NodeConfig, TrafficProfile};
    pub use crate::validator::ValidationResult;
}
