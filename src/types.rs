//! Wire types for the input graph.
//!
//! These mirror the JSON shape described in the external interface: a flat
//! list of nodes (each with a free-form `type` string and a `config`
//! mapping) and a flat list of source/target edges. The core treats a
//! `Graph` as read-only input; it never mutates or persists one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The dispatch algorithm a `LoadBalancer` node uses to split traffic across
/// its targets. `RoundRobin` is the default when a node omits `algorithm`
/// or the value is unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    RoundRobin,
    LeastCapacity,
    WeightedRoundRobin,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::RoundRobin
    }
}

/// Recognized configuration keys for a node, plus a catch-all for anything
/// else a caller attaches. Every field is optional: a `Server` node simply
/// omits `number_of_users`, a `User` node omits `capacity`, and so on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_users: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_user: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Anything else the caller stashed in `config`; preserved but unused
    /// by the core. Keeps forward-compatible wire payloads round-trippable.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl NodeConfig {
    pub fn capacity(&self) -> f64 {
        self.capacity.unwrap_or(0.0)
    }

    pub fn base_latency(&self) -> f64 {
        self.base_latency.unwrap_or(0.0)
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0).max(0.0)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.unwrap_or_default()
    }
}

/// A single node in the input graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub config: NodeConfig,
}

/// A directed edge, referencing node ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// The full input topology: a set of nodes and a set of directed edges
/// between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// The requested load on the graph's entry node(s): `number_of_users`
/// multiplied by `requests_per_user` gives the root request rate.
///
/// When omitted from a `simulate` call, the simulator reads this from the
/// first `User` node's config instead (see [`crate::simulator`]).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrafficProfile {
    pub number_of_users: f64,
    pub requests_per_user: f64,
}

impl TrafficProfile {
    pub fn root_rps(&self) -> f64 {
        self.number_of_users * self.requests_per_user
    }
}
