//! The closed-form flow simulator: a single pass over the topological order
//! that propagates request rate through the graph and derives per-node and
//! aggregate performance metrics.
//!
//! This module assumes the graph it is handed is already valid and `ordered`
//! is the output of [`crate::validator::topological_order`] on that same
//! graph. Calling it on an invariant-broken graph (cyclic, disconnected) is
//! a caller bug, not a condition this module detects — per the error design,
//! it degrades to a zeroed outcome rather than panicking.

use crate::catalog::ComponentType;
use crate::types::{Graph, Node, TrafficProfile};
use crate::validator::{build_adjacency, node_map};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Healthy,
    Overloaded,
}

/// Per-node simulation result. `utilization` is the only field that can be
/// absent: a node with zero capacity and positive incoming traffic has
/// infinite utilization internally, serialized as `null` rather than a
/// non-finite JSON number.
#[derive(Debug, Clone, Serialize)]
pub struct NodeMetric {
    pub component_id: String,
    pub component_type: String,
    pub incoming_rps: i64,
    pub effective_rps: f64,
    pub utilization: Option<f64>,
    pub overflow: f64,
    pub latency: f64,
    pub status: NodeStatus,
}

/// Aggregate performance figures for one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    pub incoming_rps: i64,
    pub throughput: i64,
    pub total_latency: f64,
    pub error_rate: f64,
    pub bottleneck_component: String,
    pub bottleneck_component_ids: Vec<String>,
}

impl PerformanceSummary {
    pub(crate) fn zeroed() -> Self {
        PerformanceSummary {
            incoming_rps: 0,
            throughput: 0,
            total_latency: 0.0,
            error_rate: 0.0,
            bottleneck_component: String::new(),
            bottleneck_component_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub performance: PerformanceSummary,
    pub node_metrics: Vec<NodeMetric>,
}

impl SimulationOutcome {
    fn zeroed() -> Self {
        SimulationOutcome {
            performance: PerformanceSummary::zeroed(),
            node_metrics: Vec::new(),
        }
    }
}

fn utilization_ties(a: f64, b: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        a == b
    } else {
        (a - b).abs() < f64::EPSILON
    }
}

/// Track the running highest-utilization candidate(s) for bottleneck
/// selection. Equal (including equal-infinite) utilization extends the tie
/// list rather than replacing it; a strictly higher utilization replaces it.
fn record_candidate(best: &mut Option<(f64, Vec<String>, String)>, utilization: f64, id: &str, type_name: &str) {
    match best {
        Some((max_u, tied_ids, _)) if utilization_ties(*max_u, utilization) => {
            tied_ids.push(id.to_string());
        }
        Some((max_u, ..)) if utilization > *max_u => {
            *best = Some((utilization, vec![id.to_string()], type_name.to_string()));
        }
        None => {
            *best = Some((utilization, vec![id.to_string()], type_name.to_string()));
        }
        _ => {}
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn round3_or_null(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(round3(value))
    } else {
        None
    }
}

fn traffic_profile_from_ordering(ordered: &[String], ids: &IndexMap<String, &Node>) -> TrafficProfile {
    for id in ordered {
        let Some(node) = ids.get(id) else { continue };
        if matches!(ComponentType::normalize(&node.type_), ComponentType::User) {
            return TrafficProfile {
                number_of_users: node.config.number_of_users.unwrap_or(0.0),
                requests_per_user: node.config.requests_per_user.unwrap_or(0.0),
            };
        }
    }
    TrafficProfile::default()
}

/// Run the flow simulation over an already-validated graph, using `ordered`
/// (from [`crate::validator::topological_order`]) to drive propagation.
///
/// Returns a zeroed outcome, never panics, if `ordered` is empty or does not
/// cover the graph — that signals the caller skipped validation or handed in
/// a broken invariant.
#[instrument(skip(graph, ordered))]
pub fn simulate(
    graph: &Graph,
    ordered: &[String],
    traffic_profile: Option<TrafficProfile>,
) -> SimulationOutcome {
    if ordered.is_empty() || ordered.len() != graph.nodes.len() {
        return SimulationOutcome::zeroed();
    }

    let ids = node_map(graph);
    let adjacency = build_adjacency(graph, &ids);

    let profile = traffic_profile.unwrap_or_else(|| traffic_profile_from_ordering(ordered, &ids));
    let root_rps = profile.root_rps();

    let entry = &ordered[0];

    let mut incoming: IndexMap<&str, f64> = ids.keys().map(|id| (id.as_str(), 0.0)).collect();
    *incoming.get_mut(entry.as_str()).expect("entry is a known id") = root_rps;

    let mut parents: IndexMap<&str, Vec<&str>> = ids.keys().map(|id| (id.as_str(), Vec::new())).collect();
    for (source, targets) in &adjacency.edges {
        for target in targets {
            parents.entry(target.as_str()).or_default().push(source.as_str());
        }
    }

    let mut effective: IndexMap<&str, f64> = IndexMap::new();
    let mut level: IndexMap<&str, i64> = IndexMap::new();
    let mut node_metrics = Vec::with_capacity(ordered.len());

    let mut best_overloaded: Option<(f64, Vec<String>, String)> = None;
    let mut best_any: Option<(f64, Vec<String>, String)> = None;
    let mut latency_by_level: IndexMap<i64, f64> = IndexMap::new();

    for id in ordered {
        let node = ids[id.as_str()];
        let ty = ComponentType::normalize(&node.type_);
        let node_level = if adjacency.in_degree.get(id.as_str()).copied().unwrap_or(0) == 0 {
            -1
        } else {
            1 + parents[id.as_str()]
                .iter()
                .map(|p| level.get(p).copied().unwrap_or(-1))
                .max()
                .unwrap_or(-1)
        };
        level.insert(id.as_str(), node_level);

        let incoming_rps = incoming.get(id.as_str()).copied().unwrap_or(0.0);

        let (node_effective, utilization_raw, overflow, latency) = if matches!(ty, ComponentType::User) {
            (incoming_rps, 0.0, 0.0, 0.0)
        } else {
            let capacity = node.config.capacity();
            let base_latency = node.config.base_latency();

            let utilization_raw = if capacity > 0.0 {
                incoming_rps / capacity
            } else if incoming_rps > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };
            let node_effective = if capacity > 0.0 { incoming_rps.min(capacity) } else { 0.0 };
            let overflow = (incoming_rps - capacity).max(0.0);
            // A node with zero capacity has infinite utilization but still
            // reports a finite latency contribution (base latency) rather
            // than an infinite/NaN one, so aggregate latency stays finite.
            let bounded_utilization = if utilization_raw.is_finite() { utilization_raw } else { 1.0 };
            let latency = if bounded_utilization <= 1.0 {
                base_latency
            } else {
                base_latency * bounded_utilization * bounded_utilization
            };
            (node_effective, utilization_raw, overflow, latency)
        };

        effective.insert(id.as_str(), node_effective);

        if !matches!(ty, ComponentType::User) {
            let status = if utilization_raw > 1.0 {
                NodeStatus::Overloaded
            } else {
                NodeStatus::Healthy
            };

            let type_name = ty.canonical_name();
            record_candidate(&mut best_any, utilization_raw, id, type_name);
            if matches!(status, NodeStatus::Overloaded) {
                record_candidate(&mut best_overloaded, utilization_raw, id, type_name);
            }

            node_metrics.push(NodeMetric {
                component_id: id.clone(),
                component_type: ty.canonical_name().to_string(),
                incoming_rps: incoming_rps.trunc() as i64,
                effective_rps: round3(node_effective),
                utilization: round3_or_null(utilization_raw),
                overflow: round3(overflow),
                latency: round3(latency),
                status,
            });

            let level_max = latency_by_level.entry(node_level).or_insert(0.0);
            if latency > *level_max {
                *level_max = latency;
            }
        }

        // Fan-out: dispatch this node's effective output to its targets.
        if let Some(targets) = adjacency.edges.get(id.as_str()) {
            if node_effective > 0.0 && !targets.is_empty() {
                let weights: Vec<f64> = targets
                    .iter()
                    .map(|target| {
                        let target_node = ids[target.as_str()];
                        match (ty.clone(), target_node.config.algorithm()) {
                            (ComponentType::LoadBalancer, crate::types::Algorithm::LeastCapacity) => {
                                target_node.config.capacity().max(0.0)
                            }
                            (ComponentType::LoadBalancer, crate::types::Algorithm::WeightedRoundRobin) => {
                                target_node.config.weight()
                            }
                            _ => 1.0,
                        }
                    })
                    .collect();
                let total_weight: f64 = weights.iter().sum();
                for (target, weight) in targets.iter().zip(weights.iter()) {
                    let share = if total_weight > 0.0 {
                        node_effective * weight / total_weight
                    } else {
                        node_effective / targets.len() as f64
                    };
                    *incoming.entry(target.as_str()).or_insert(0.0) += share;
                }
            }
        }
    }

    let throughput_raw: f64 = ids
        .keys()
        .filter(|id| {
            adjacency.out_degree.get(id.as_str()).copied().unwrap_or(0) == 0
                && !matches!(ComponentType::normalize(&ids[id.as_str()].type_), ComponentType::User)
        })
        .map(|id| effective.get(id.as_str()).copied().unwrap_or(0.0))
        .sum();

    let total_latency: f64 = latency_by_level.values().sum();

    let error_rate = if root_rps > 0.0 {
        (root_rps - throughput_raw) / root_rps
    } else {
        0.0
    };

    let (bottleneck_component, bottleneck_component_ids) = best_overloaded
        .or(best_any)
        .map(|(_, ids, name)| (name, ids))
        .unwrap_or_default();

    let performance = PerformanceSummary {
        incoming_rps: root_rps.trunc() as i64,
        throughput: throughput_raw.trunc() as i64,
        total_latency: round3(total_latency),
        error_rate: round3(error_rate),
        bottleneck_component,
        bottleneck_component_ids,
    };

    SimulationOutcome {
        performance,
        node_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, NodeConfig};
    use crate::validator::topological_order;

    fn node(id: &str, ty: &str, config: NodeConfig) -> Node {
        Node {
            id: id.to_string(),
            type_: ty.to_string(),
            config,
        }
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    fn cfg(overrides: impl FnOnce(&mut NodeConfig)) -> NodeConfig {
        let mut c = NodeConfig::default();
        overrides(&mut c);
        c
    }

    #[test]
    fn linear_healthy_scenario_matches_expected_totals() {
        let graph = Graph {
            nodes: vec![
                node("user", "User", cfg(|c| {
                    c.number_of_users = Some(10.0);
                    c.requests_per_user = Some(2.0);
                })),
                node("server", "Server", cfg(|c| {
                    c.capacity = Some(50.0);
                    c.base_latency = Some(20.0);
                })),
                node("db", "Database", cfg(|c| {
                    c.capacity = Some(30.0);
                    c.base_latency = Some(40.0);
                })),
            ],
            edges: vec![edge("user", "server"), edge("server", "db")],
        };
        let (ordered, errs) = topological_order(&graph);
        assert!(errs.is_empty());
        let outcome = simulate(&graph, &ordered, None);
        assert_eq!(outcome.performance.incoming_rps, 20);
        assert_eq!(outcome.performance.throughput, 20);
        assert_eq!(outcome.performance.total_latency, 60.0);
        assert_eq!(outcome.performance.error_rate, 0.0);
        assert_eq!(outcome.performance.bottleneck_component, "Database");
        let server_metric = outcome
            .node_metrics
            .iter()
            .find(|m| m.component_id == "server")
            .unwrap();
        assert_eq!(server_metric.status, NodeStatus::Healthy);
    }

    #[test]
    fn fan_out_overload_matches_expected_totals() {
        let graph = Graph {
            nodes: vec![
                node("user", "User", cfg(|c| {
                    c.number_of_users = Some(100.0);
                    c.requests_per_user = Some(1.0);
                })),
                node("lb", "LoadBalancer", cfg(|c| {
                    c.capacity = Some(300.0);
                    c.base_latency = Some(10.0);
                })),
                node("srv1", "Server", cfg(|c| {
                    c.capacity = Some(50.0);
                    c.base_latency = Some(20.0);
                })),
                node("srv2", "Server", cfg(|c| {
                    c.capacity = Some(50.0);
                    c.base_latency = Some(20.0);
                })),
                node("db", "Database", cfg(|c| {
                    c.capacity = Some(80.0);
                    c.base_latency = Some(40.0);
                })),
            ],
            edges: vec![
                edge("user", "lb"),
                edge("lb", "srv1"),
                edge("lb", "srv2"),
                edge("srv1", "db"),
                edge("srv2", "db"),
            ],
        };
        let (ordered, errs) = topological_order(&graph);
        assert!(errs.is_empty());
        let outcome = simulate(&graph, &ordered, None);
        assert_eq!(outcome.performance.incoming_rps, 100);
        assert_eq!(outcome.performance.throughput, 80);
        assert_eq!(outcome.performance.total_latency, 92.5);
        assert_eq!(outcome.performance.error_rate, 0.2);
        assert!(outcome
            .node_metrics
            .iter()
            .any(|m| m.status == NodeStatus::Overloaded));
    }

    #[test]
    fn weighted_round_robin_splits_by_weight() {
        let graph = Graph {
            nodes: vec![
                node("user", "User", cfg(|c| {
                    c.number_of_users = Some(100.0);
                    c.requests_per_user = Some(1.0);
                })),
                node("lb", "LoadBalancer", cfg(|c| {
                    c.capacity = Some(200.0);
                    c.base_latency = Some(5.0);
                    c.algorithm = Some(crate::types::Algorithm::WeightedRoundRobin);
                })),
                node("srv1", "Server", cfg(|c| {
                    c.capacity = Some(200.0);
                    c.base_latency = Some(10.0);
                    c.weight = Some(3.0);
                })),
                node("srv2", "Server", cfg(|c| {
                    c.capacity = Some(200.0);
                    c.base_latency = Some(10.0);
                    c.weight = Some(1.0);
                })),
                node("db", "Database", cfg(|c| {
                    c.capacity = Some(200.0);
                    c.base_latency = Some(10.0);
                })),
            ],
            edges: vec![
                edge("user", "lb"),
                edge("lb", "srv1"),
                edge("lb", "srv2"),
                edge("srv1", "db"),
                edge("srv2", "db"),
            ],
        };
        let (ordered, _) = topological_order(&graph);
        let outcome = simulate(&graph, &ordered, None);
        let srv1 = outcome.node_metrics.iter().find(|m| m.component_id == "srv1").unwrap();
        let srv2 = outcome.node_metrics.iter().find(|m| m.component_id == "srv2").unwrap();
        assert_eq!(srv1.incoming_rps, 75);
        assert_eq!(srv2.incoming_rps, 25);
    }

    #[test]
    fn zero_capacity_with_traffic_is_overloaded_with_null_utilization() {
        let graph = Graph {
            nodes: vec![
                node("user", "User", cfg(|c| {
                    c.number_of_users = Some(10.0);
                    c.requests_per_user = Some(1.0);
                })),
                node("server", "Server", cfg(|c| {
                    c.capacity = Some(0.0);
                    c.base_latency = Some(5.0);
                })),
                node("db", "Database", cfg(|_| {})),
            ],
            edges: vec![edge("user", "server"), edge("server", "db")],
        };
        let (ordered, _) = topological_order(&graph);
        let outcome = simulate(&graph, &ordered, None);
        let server = outcome.node_metrics.iter().find(|m| m.component_id == "server").unwrap();
        assert_eq!(server.utilization, None);
        assert_eq!(server.status, NodeStatus::Overloaded);
    }

    #[test]
    fn broken_invariant_yields_zeroed_outcome() {
        let graph = Graph {
            nodes: vec![node("user", "User", NodeConfig::default())],
            edges: vec![],
        };
        let outcome = simulate(&graph, &[], None);
        assert_eq!(outcome.performance.incoming_rps, 0);
        assert!(outcome.node_metrics.is_empty());
    }
}
