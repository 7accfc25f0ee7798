//! Topology validation utilities.
//!
//! This module checks a constructed topology against its declared
//! configuration before any search runs. Validation is all-or-nothing and
//! read-only.

use log::{debug, info};

use crate::config::NetworkConfig;
use crate::topology::{Topology, TopologyError};

/// Validate a topology against its declared configuration
///
/// Checks, in order:
/// - Every hosted resource appears in the declared vocabulary
/// - Every node has at least `min_degree` neighbors (default 1)
/// - The graph is connected
///
/// Nodes are visited in name order, so the reported node is deterministic.
/// The degree check runs before connectivity because an isolated node in a
/// multi-node graph violates both, and the degree error names it directly.
///
/// # Arguments
/// * `topology` - The constructed topology
/// * `config` - The configuration the topology was built from
///
/// # Returns
/// * `Ok(())` if validation succeeds
/// * `Err(TopologyError)` naming the failed invariant and the offending node
///
/// # Examples
/// ```
/// use p2psim::config::NetworkConfig;
/// use p2psim::topology::Topology;
/// use p2psim::utils::validation::validate_topology;
///
/// let config: NetworkConfig = serde_yaml::from_str(
///     "resources: [r1]\nnodes:\n  A: [r1]\n  B: []\nedges:\n  - [A, B]\n",
/// ).unwrap();
/// let topology = Topology::from_config(&config).unwrap();
/// assert!(validate_topology(&topology, &config).is_ok());
/// ```
pub fn validate_topology(topology: &Topology, config: &NetworkConfig) -> Result<(), TopologyError> {
    validate_resources(topology, config)?;
    validate_min_degree(topology, config.min_degree())?;
    validate_connectivity(topology)?;

    info!(
        "Topology valid: {} nodes, {} edges, min_degree {}",
        topology.len(),
        topology.edges().len(),
        config.min_degree()
    );
    Ok(())
}

/// Check that every hosted resource is declared
pub fn validate_resources(topology: &Topology, config: &NetworkConfig) -> Result<(), TopologyError> {
    for (node, state) in topology.nodes() {
        if let Some(resource) = state.resources.iter().find(|r| !config.declares(r)) {
            return Err(TopologyError::UndeclaredResource {
                node: node.to_string(),
                resource: resource.clone(),
            });
        }
    }
    Ok(())
}

/// Check that every node meets the minimum degree
pub fn validate_min_degree(topology: &Topology, min_degree: usize) -> Result<(), TopologyError> {
    for node in topology.node_names() {
        let degree = topology.degree(node);
        if degree < min_degree {
            return Err(TopologyError::DegreeViolation {
                node: node.to_string(),
                degree,
                min_degree,
            });
        }
    }
    Ok(())
}

/// Check that every node is reachable from every other
///
/// # Examples
/// ```
/// use p2psim::topology::{NodeState, Topology, TopologyError};
/// use p2psim::utils::validation::validate_connectivity;
///
/// let mut topology = Topology::new();
/// for name in ["A", "B", "C"] {
///     topology.add_node(name, NodeState::default());
/// }
/// topology.add_edge("A", "B").unwrap();
/// assert!(matches!(
///     validate_connectivity(&topology),
///     Err(TopologyError::Disconnected { .. })
/// ));
/// ```
pub fn validate_connectivity(topology: &Topology) -> Result<(), TopologyError> {
    let Some(origin) = topology.node_names().next() else {
        return Err(TopologyError::Empty);
    };

    let reachable = topology.reachable_from(origin);
    debug!("{} of {} nodes reachable from '{}'", reachable.len(), topology.len(), origin);

    if reachable.len() == topology.len() {
        return Ok(());
    }

    let unreachable: Vec<String> = topology
        .node_names()
        .filter(|name| !reachable.contains(name))
        .map(str::to_string)
        .collect();

    Err(TopologyError::Disconnected {
        origin: origin.to_string(),
        unreachable,
    })
}
