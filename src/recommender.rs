//! Turns a performance summary, per-node metrics and architecture warnings
//! into an ordered, duplicate-free list of actionable recommendations.

use crate::simulator::{NodeMetric, NodeStatus, PerformanceSummary};
use indexmap::IndexSet;

/// Build recommendations in fixed priority order, then drop duplicates
/// while preserving first-seen order.
pub fn recommend(
    performance: &PerformanceSummary,
    node_metrics: &[NodeMetric],
    warnings: &[String],
) -> Vec<String> {
    let mut recommendations: IndexSet<String> = IndexSet::new();

    if performance.incoming_rps > 0
        && performance.throughput > 0
        && performance.throughput < performance.incoming_rps
    {
        recommendations.insert(
            "Increase capacity on the bottleneck or add replicas to match incoming RPS.".to_string(),
        );
    }

    if performance.error_rate > 0.0 {
        recommendations.insert(
            "Reduce error rate by scaling the overloaded components or throttling load.".to_string(),
        );
    }

    if performance.total_latency > 500.0 {
        recommendations.insert("Optimize latency hotspots by tuning base latency or caching.".to_string());
    }

    for metric in node_metrics {
        if metric.status == NodeStatus::Overloaded {
            recommendations.insert(format!(
                "Scale {} capacity or add replicas to reduce utilization.",
                metric.component_type
            ));
        }
    }

    for warning in warnings {
        let lower = warning.to_lowercase();
        if lower.contains("server") {
            recommendations.insert("Introduce an application server tier to protect data stores.".to_string());
        }
        if lower.contains("scaling buffer") {
            recommendations.insert("Add a cache, queue, or rate limiter to absorb load spikes.".to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations.insert("Architecture looks healthy for the current load profile.".to_string());
    }

    recommendations.into_iter().collect()
}
