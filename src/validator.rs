//! Structural and semantic validation of the input graph, plus the
//! topological ordering the simulator depends on.
//!
//! The two operations live in one module because they share the same
//! adjacency-building pass but have different termination policies: the
//! validator collects every violation it can find before returning, while
//! the orderer gives up the moment Kahn's algorithm stalls. Fusing them
//! into a single pass would tangle those two policies together.

use crate::catalog::ComponentType;
use crate::layers::Layer;
use crate::types::Graph;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashSet, VecDeque};
use tracing::instrument;

/// Outcome of [`validate`]: `valid` is exactly `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(mut errors: Vec<String>) -> Self {
        errors.sort();
        errors.dedup();
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Per-node bookkeeping shared by validation, ordering and simulation: the
/// subset of edges whose endpoints are both known node ids and which are
/// not self-loops, plus in/out degree over that subset.
pub(crate) struct Adjacency {
    pub(crate) edges: IndexMap<String, Vec<String>>,
    pub(crate) in_degree: IndexMap<String, usize>,
    pub(crate) out_degree: IndexMap<String, usize>,
}

pub(crate) fn node_map(graph: &Graph) -> IndexMap<String, &crate::types::Node> {
    let mut map = IndexMap::new();
    for node in &graph.nodes {
        if !node.id.is_empty() {
            map.insert(node.id.clone(), node);
        }
    }
    map
}

pub(crate) fn build_adjacency(
    graph: &Graph,
    ids: &IndexMap<String, &crate::types::Node>,
) -> Adjacency {
    let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut in_degree: IndexMap<String, usize> = IndexMap::new();
    let mut out_degree: IndexMap<String, usize> = IndexMap::new();

    for id in ids.keys() {
        in_degree.insert(id.clone(), 0);
        out_degree.insert(id.clone(), 0);
    }

    for edge in &graph.edges {
        if !ids.contains_key(&edge.source) || !ids.contains_key(&edge.target) {
            continue;
        }
        if edge.source == edge.target {
            continue;
        }
        edges.entry(edge.source.clone()).or_default().push(edge.target.clone());
        *in_degree.entry(edge.target.clone()).or_insert(0) += 1;
        *out_degree.entry(edge.source.clone()).or_insert(0) += 1;
    }

    Adjacency {
        edges,
        in_degree,
        out_degree,
    }
}

fn has_cycle(ids: &IndexMap<String, &crate::types::Node>, adjacency: &Adjacency) -> bool {
    let mut visiting: HashSet<&str> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();

    fn dfs<'a>(
        node: &'a str,
        edges: &'a IndexMap<String, Vec<String>>,
        visiting: &mut HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
    ) -> bool {
        if visiting.contains(node) {
            return true;
        }
        if visited.contains(node) {
            return false;
        }
        visiting.insert(node);
        if let Some(neighbors) = edges.get(node) {
            for neighbor in neighbors {
                if dfs(neighbor.as_str(), edges, visiting, visited) {
                    return true;
                }
            }
        }
        visiting.remove(node);
        visited.insert(node);
        false
    }

    for id in ids.keys() {
        if !visited.contains(id.as_str()) && dfs(id, &adjacency.edges, &mut visiting, &mut visited) {
            return true;
        }
    }
    false
}

/// Run every structural and semantic check from the invariants list and
/// return the accumulated, sorted, de-duplicated error list.
#[instrument(skip(graph))]
pub fn validate(graph: &Graph) -> ValidationResult {
    if graph.nodes.is_empty() {
        return ValidationResult::from_errors(vec![
            "Graph must contain at least one node.".to_string(),
        ]);
    }

    let mut errors = Vec::new();
    let ids = node_map(graph);

    if ids.len() != graph.nodes.len() {
        errors.push("Each node must include a non-empty id.".to_string());
    }

    let mut adjacency_errors = Vec::new();
    for edge in &graph.edges {
        if !ids.contains_key(&edge.source) || !ids.contains_key(&edge.target) {
            adjacency_errors.push("Edges must reference valid node ids.".to_string());
            continue;
        }
        if edge.source == edge.target {
            adjacency_errors.push("Self-referential edges are not allowed.".to_string());
        }
    }
    errors.extend(adjacency_errors);

    let adjacency = build_adjacency(graph, &ids);

    let types: IndexMap<&str, ComponentType> = ids
        .iter()
        .map(|(id, node)| (id.as_str(), ComponentType::normalize(&node.type_)))
        .collect();

    let user_ids: Vec<&str> = types
        .iter()
        .filter(|(_, ty)| matches!(ty, ComponentType::User))
        .map(|(id, _)| *id)
        .collect();
    if user_ids.is_empty() {
        errors.push("Graph must contain at least one User node.".to_string());
    }

    if has_cycle(&ids, &adjacency) {
        errors.push("Graph must be a DAG.".to_string());
    }

    if !user_ids.is_empty() {
        let mut reachable: IndexSet<&str> = IndexSet::new();
        let mut queue: VecDeque<&str> = user_ids.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(neighbors) = adjacency.edges.get(id) {
                for neighbor in neighbors {
                    if !reachable.contains(neighbor.as_str()) {
                        queue.push_back(neighbor.as_str());
                    }
                }
            }
        }
        if ids.keys().any(|id| !reachable.contains(id.as_str())) {
            errors.push("All nodes must be reachable from a User node.".to_string());
        }
    }

    let has_terminal_storage = types.iter().any(|(id, ty)| {
        Layer::of(ty) == Layer::Storage && adjacency.out_degree.get(*id).copied().unwrap_or(0) == 0
    });
    if !has_terminal_storage {
        errors.push("Graph must contain at least one terminal storage node.".to_string());
    }

    for (source, targets) in &adjacency.edges {
        let source_type = &types[source.as_str()];
        let source_layer = Layer::of(source_type);
        for target in targets {
            let target_type = &types[target.as_str()];
            let target_layer = Layer::of(target_type);

            if matches!(source_type, ComponentType::User)
                && matches!(target_type, ComponentType::Database | ComponentType::Cache)
            {
                errors.push("User cannot directly access storage or cache layers.".to_string());
            }
            if matches!(source_type, ComponentType::Cache) && target_layer == Layer::Compute {
                errors.push("Cache cannot send traffic to compute layers.".to_string());
            }
            if matches!(source_type, ComponentType::Database) && target_layer == Layer::Compute {
                errors.push("Database cannot send traffic to compute layers.".to_string());
            }
            if source_layer == Layer::Storage && target_layer != Layer::Async {
                errors.push(
                    "Storage nodes must be terminal unless sending to async processing."
                        .to_string(),
                );
            }
            if !source_layer.allows(target_layer) {
                errors.push("Illegal layer ordering detected.".to_string());
            }
        }
    }

    ValidationResult::from_errors(errors)
}

/// Kahn's algorithm over the same adjacency the validator builds. Assumes
/// the caller already ran [`validate`] and knows the graph is a DAG — on a
/// cyclic or malformed graph this simply returns an empty ordering and a
/// single error, it never panics or loops forever.
#[instrument(skip(graph))]
pub fn topological_order(graph: &Graph) -> (Vec<String>, Vec<String>) {
    let ids = node_map(graph);
    let adjacency = build_adjacency(graph, &ids);

    let mut in_degree = adjacency.in_degree.clone();
    let mut queue: VecDeque<String> = ids
        .keys()
        .filter(|id| in_degree.get(id.as_str()).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();

    let mut ordered = Vec::with_capacity(ids.len());
    while let Some(id) = queue.pop_front() {
        ordered.push(id.clone());
        if let Some(neighbors) = adjacency.edges.get(&id) {
            for neighbor in neighbors {
                if let Some(degree) = in_degree.get_mut(neighbor.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(neighbor.clone());
                    }
                }
            }
        }
    }

    if ordered.len() != ids.len() {
        return (
            Vec::new(),
            vec!["Graph must not contain disconnected nodes.".to_string()],
        );
    }

    (ordered, Vec::new())
}
