//! Topology type definitions.
//!
//! The overlay is a simple undirected graph: an adjacency mapping from node
//! identifier to its neighbor list, plus a parallel mapping from identifier
//! to the node's resource and cache sets.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::config::NetworkConfig;

/// Per-node state: natively hosted resources and learned cache entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeState {
    /// Resources hosted by the node, fixed at construction
    pub resources: BTreeSet<String>,
    /// Resources learned from prior informed searches; only grows
    pub cache: BTreeSet<String>,
}

impl NodeState {
    pub fn new<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resources: resources.into_iter().map(Into::into).collect(),
            cache: BTreeSet::new(),
        }
    }

    /// A node satisfies a search if it hosts or has cached the target
    pub fn satisfies(&self, target: &str) -> bool {
        self.resources.contains(target) || self.cache.contains(target)
    }

    /// Whether the cache alone knows about `target`
    pub fn has_cached(&self, target: &str) -> bool {
        self.cache.contains(target)
    }
}

/// Errors raised while building or validating a topology
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Topology has no nodes")]
    Empty,

    #[error("Edge ({from}, {to}) references undeclared node '{node}'")]
    UnknownNode {
        from: String,
        to: String,
        node: String,
    },

    #[error("Self-loop on node '{node}' is not allowed")]
    SelfLoop { node: String },

    #[error("Duplicate edge between '{from}' and '{to}'")]
    DuplicateEdge { from: String, to: String },

    #[error("Topology is not connected; unreachable from '{origin}': {unreachable:?}")]
    Disconnected {
        origin: String,
        unreachable: Vec<String>,
    },

    #[error("Resource '{resource}' in node '{node}' is not declared")]
    UndeclaredResource { node: String, resource: String },

    #[error("Node '{node}' has degree {degree}, less than min_degree {min_degree}")]
    DegreeViolation {
        node: String,
        degree: usize,
        min_degree: usize,
    },
}

/// Static overlay graph with mutable per-node caches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    nodes: BTreeMap<String, NodeState>,
    /// Neighbor lists in edge insertion order
    adjacency: BTreeMap<String, Vec<String>>,
    edges: Vec<(String, String)>,
}

impl Topology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph declared by a configuration.
    ///
    /// Rejects edges naming undeclared nodes, self-loops and duplicate edges
    /// (in either orientation). Structural invariants such as connectivity are
    /// left to [`validate_topology`](crate::utils::validation::validate_topology).
    pub fn from_config(config: &NetworkConfig) -> Result<Self, TopologyError> {
        let mut topology = Self::new();
        for (name, resources) in &config.nodes {
            topology.add_node(name.clone(), NodeState::new(resources.iter().cloned()));
        }
        for (from, to) in &config.edges {
            topology.add_edge(from, to)?;
        }
        debug!(
            "Built topology with {} nodes and {} edges",
            topology.len(),
            topology.edges.len()
        );
        Ok(topology)
    }

    /// Insert a node, replacing the state of an existing one with the same name
    pub fn add_node(&mut self, name: impl Into<String>, state: NodeState) {
        let name = name.into();
        self.adjacency.entry(name.clone()).or_default();
        self.nodes.insert(name, state);
    }

    /// Connect two existing, distinct, not-yet-adjacent nodes
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), TopologyError> {
        for node in [from, to] {
            if !self.nodes.contains_key(node) {
                return Err(TopologyError::UnknownNode {
                    from: from.to_string(),
                    to: to.to_string(),
                    node: node.to_string(),
                });
            }
        }
        if from == to {
            return Err(TopologyError::SelfLoop {
                node: from.to_string(),
            });
        }
        if self.neighbors(from).iter().any(|n| n == to) {
            return Err(TopologyError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self.adjacency
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
        self.edges.push((from.to_string(), to.to_string()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&NodeState> {
        self.nodes.get(name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut NodeState> {
        self.nodes.get_mut(name)
    }

    /// Node identifiers in name order
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeState)> {
        self.nodes.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// Neighbors of `name` in edge insertion order; empty for unknown nodes
    pub fn neighbors(&self, name: &str) -> &[String] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, name: &str) -> usize {
        self.neighbors(name).len()
    }

    /// Edges in declaration order
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Whether `name` hosts or has cached `target`
    pub fn satisfies(&self, name: &str, target: &str) -> bool {
        self.nodes.get(name).map_or(false, |n| n.satisfies(target))
    }

    /// Whether `name` has `target` in its cache
    pub fn has_cached(&self, name: &str, target: &str) -> bool {
        self.nodes.get(name).map_or(false, |n| n.has_cached(target))
    }

    /// Add `target` to the cache of every listed node
    pub fn remember<'a, I>(&mut self, names: I, target: &str)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            if let Some(state) = self.nodes.get_mut(name) {
                state.cache.insert(target.to_string());
            }
        }
    }

    /// Nodes whose cache contains `target`
    pub fn cached_nodes(&self, target: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, state)| state.has_cached(target))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Clear every cache so the next search starts uninformed
    pub fn reset_caches(&mut self) {
        for state in self.nodes.values_mut() {
            state.cache.clear();
        }
    }

    /// Nodes reachable from `origin`, origin included
    pub fn reachable_from<'a>(&'a self, origin: &'a str) -> HashSet<&'a str> {
        let mut seen: HashSet<&str> = HashSet::new();
        if !self.contains(origin) {
            return seen;
        }
        let mut stack = vec![origin];
        seen.insert(origin);
        while let Some(current) = stack.pop() {
            for neighbor in self.neighbors(current) {
                if seen.insert(neighbor.as_str()) {
                    stack.push(neighbor.as_str());
                }
            }
        }
        seen
    }
}
