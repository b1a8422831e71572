//! The three operations surrounding collaborators (HTTP layer, CLI, tests)
//! actually call: `validate`, `evaluate`, and the canonical-table
//! accessors. This module owns none of the algorithms — it sequences the
//! validator, simulator, reviewer and recommender per the component design.

use crate::catalog::ComponentType;
use crate::layers::Layer;
use crate::reviewer;
use crate::recommender;
use crate::simulator::{self, NodeMetric, PerformanceSummary};
use crate::types::{Graph, TrafficProfile};
use crate::validator::{self, ValidationResult};
use serde::Serialize;

pub use validator::validate;

/// The full result of evaluating a graph: validation, plus — only when the
/// graph is structurally valid — the simulated performance, per-node
/// metrics, architecture warnings and recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub structural_errors: Vec<String>,
    pub architectural_warnings: Vec<String>,
    pub performance: PerformanceSummary,
    pub node_metrics: Vec<NodeMetric>,
    pub recommendations: Vec<String>,
}

impl EvaluationResult {
    fn structural_failure(errors: Vec<String>) -> Self {
        EvaluationResult {
            structural_errors: errors,
            architectural_warnings: Vec::new(),
            performance: PerformanceSummary::zeroed(),
            node_metrics: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Validate, then — if and only if the graph is structurally valid —
/// order, simulate, review and recommend. When `structural_errors` is
/// non-empty the remaining fields are empty/zero and simulation never runs.
pub fn evaluate(graph: &Graph, traffic_profile: Option<TrafficProfile>) -> EvaluationResult {
    let ValidationResult { valid, errors } = validator::validate(graph);
    if !valid {
        return EvaluationResult::structural_failure(errors);
    }

    let (ordered, ordering_errors) = validator::topological_order(graph);
    if !ordering_errors.is_empty() {
        return EvaluationResult::structural_failure(ordering_errors);
    }

    let outcome = simulator::simulate(graph, &ordered, traffic_profile);
    let warnings = reviewer::review(graph, &ordered);
    let recommendations = recommender::recommend(&outcome.performance, &outcome.node_metrics, &warnings);

    EvaluationResult {
        structural_errors: Vec::new(),
        architectural_warnings: warnings,
        performance: outcome.performance,
        node_metrics: outcome.node_metrics,
        recommendations,
    }
}

/// All canonical component types, for consumers rendering a palette.
pub fn canonical_types() -> Vec<String> {
    ComponentType::all()
        .iter()
        .map(|t| t.canonical_name().to_string())
        .collect()
}

/// The layer a canonical type name belongs to, or `None` if the name is not
/// one of the canonical types.
pub fn layer_of(type_name: &str) -> Option<Layer> {
    ComponentType::all()
        .iter()
        .find(|t| t.canonical_name() == type_name)
        .map(Layer::of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_builder::GraphBuilder;
    use crate::types::NodeConfig;

    #[test]
    fn invalid_graph_short_circuits_simulation() {
        let graph = Graph::default();
        let result = evaluate(&graph, None);
        assert!(!result.structural_errors.is_empty());
        assert_eq!(result.performance.incoming_rps, 0);
        assert!(result.node_metrics.is_empty());
    }

    #[test]
    fn valid_graph_produces_full_result() {
        let graph = GraphBuilder::new()
            .node(
                "user",
                "User",
                NodeConfig {
                    number_of_users: Some(10.0),
                    requests_per_user: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .node(
                "server",
                "Server",
                NodeConfig {
                    capacity: Some(50.0),
                    base_latency: Some(20.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .node(
                "db",
                "Database",
                NodeConfig {
                    capacity: Some(30.0),
                    base_latency: Some(40.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .edge("user", "server")
            .edge("server", "db")
            .build();

        let result = evaluate(&graph, None);
        assert!(result.structural_errors.is_empty());
        assert_eq!(result.performance.incoming_rps, 20);
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn canonical_types_round_trip_through_layer_of() {
        for name in canonical_types() {
            assert!(layer_of(&name).is_some());
        }
        assert!(layer_of("NotARealType").is_none());
    }
}
