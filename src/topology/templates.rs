//! Topology templates.
//!
//! Builds declared configurations for common overlay shapes (Chain, Ring,
//! Star, Mesh) over a list of node names. Resources are placed afterwards
//! with [`place_resource`].

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;

/// Overlay shape templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Template {
    /// Path graph: each node linked to the next
    Chain,
    /// Chain with the last node linked back to the first
    Ring,
    /// First node is the hub, all others are leaves
    Star,
    /// Every node linked to every other node
    Mesh,
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chain" | "path" => Ok(Self::Chain),
            "ring" => Ok(Self::Ring),
            "star" => Ok(Self::Star),
            "mesh" => Ok(Self::Mesh),
            other => Err(format!("unknown topology template '{}'", other)),
        }
    }
}

/// Edges of a template over `names`
pub fn template_edges(template: Template, names: &[String]) -> Vec<(String, String)> {
    match template {
        Template::Chain => names
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect(),
        Template::Ring => {
            let mut edges = template_edges(Template::Chain, names);
            // Two nodes already share the chain edge; closing would duplicate it
            if names.len() > 2 {
                edges.push((names[names.len() - 1].clone(), names[0].clone()));
            }
            edges
        }
        Template::Star => match names.split_first() {
            Some((hub, leaves)) => leaves
                .iter()
                .map(|leaf| (hub.clone(), leaf.clone()))
                .collect(),
            None => vec![],
        },
        Template::Mesh => {
            let mut edges = Vec::new();
            for (i, a) in names.iter().enumerate() {
                for b in names.iter().skip(i + 1) {
                    edges.push((a.clone(), b.clone()));
                }
            }
            edges
        }
    }
}

/// Build a configuration with no resources for the given template
pub fn build_template(template: Template, names: &[String]) -> NetworkConfig {
    let nodes: BTreeMap<String, Vec<String>> =
        names.iter().map(|name| (name.clone(), Vec::new())).collect();

    NetworkConfig {
        resources: Vec::new(),
        min_degree: None,
        nodes,
        edges: template_edges(template, names),
    }
}

/// Host `resource` on `node`, declaring it in the vocabulary if needed.
/// Returns false if the node is not part of the configuration.
pub fn place_resource(config: &mut NetworkConfig, node: &str, resource: &str) -> bool {
    let Some(hosted) = config.nodes.get_mut(node) else {
        return false;
    };
    if !hosted.iter().any(|r| r == resource) {
        hosted.push(resource.to_string());
    }
    if !config.declares(resource) {
        config.resources.push(resource.to_string());
    }
    true
}

/// Generate `count` node names with a common prefix (`N0`, `N1`, ...)
pub fn numbered_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}
