//! Declared network configuration.
//!
//! A configuration document lists the resource vocabulary, the nodes with
//! the resources they natively host, and the undirected edges between them.
//! It is consumed once to build a [`Topology`](crate::topology::Topology).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum node degree used when the configuration does not set one
pub const DEFAULT_MIN_DEGREE: usize = 1;

/// Network configuration as declared in a YAML or JSON document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Global vocabulary of valid resource identifiers
    #[serde(default)]
    pub resources: Vec<String>,
    /// Minimum degree every node must have (defaults to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_degree: Option<usize>,
    /// Node identifier -> resources natively hosted by that node
    pub nodes: BTreeMap<String, Vec<String>>,
    /// Undirected edges as identifier pairs
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl NetworkConfig {
    /// Document-level checks that need no graph
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }

        if self.nodes.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidNode(
                "node identifiers cannot be empty".to_string(),
            ));
        }

        if let Some(resource) = self.resources.iter().find(|r| r.trim().is_empty()) {
            return Err(ConfigError::InvalidResource(format!(
                "resource identifiers cannot be empty (got {:?})",
                resource
            )));
        }

        Ok(())
    }

    /// Configured minimum degree, or the default
    pub fn min_degree(&self) -> usize {
        self.min_degree.unwrap_or(DEFAULT_MIN_DEGREE)
    }

    /// Whether `resource` is part of the declared vocabulary
    pub fn declares(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == resource)
    }
}

/// Configuration document errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Configuration declares no nodes")]
    NoNodes,
    #[error("Invalid node declaration: {0}")]
    InvalidNode(String),
    #[error("Invalid resource declaration: {0}")]
    InvalidResource(String),
}
