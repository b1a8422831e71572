//! Stateless architecture review: a handful of fixed-order structural
//! smells surfaced as free-form warnings, independent of simulated load.

use crate::catalog::ComponentType;
use crate::types::{Graph, Node};

/// Inspect the topologically ordered node list and emit warnings in a fixed
/// order, each added at most once.
pub fn review(graph: &Graph, ordered: &[String]) -> Vec<String> {
    let by_id: std::collections::HashMap<&str, &Node> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let types: Vec<ComponentType> = ordered
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .map(|n| ComponentType::normalize(&n.type_))
        .collect();

    let mut warnings = Vec::new();

    if !types.iter().any(|t| matches!(t, ComponentType::Server)) {
        warnings.push("No server layer detected; add an application server tier.".to_string());
    }

    if let Some(first_non_user) = types.iter().find(|t| !matches!(t, ComponentType::User)) {
        if matches!(first_non_user, ComponentType::Database) {
            warnings.push("Database is directly exposed to users; add a server layer.".to_string());
        }
    }

    if types.iter().filter(|t| matches!(t, ComponentType::Server)).count() == 1 {
        warnings.push("Single server instance detected; potential single point of failure.".to_string());
    }

    let has_scaling_buffer = types.iter().any(|t| {
        matches!(
            t,
            ComponentType::Cache | ComponentType::Queue | ComponentType::RateLimiter
        )
    });
    if !has_scaling_buffer {
        warnings.push("No scaling buffer detected (cache/queue/rate limiter).".to_string());
    }

    warnings
}
