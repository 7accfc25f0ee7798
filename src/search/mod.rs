//! Search engine.
//!
//! Four resource-discovery strategies over a validated [`Topology`]:
//!
//! - **Flooding**: breadth-first broadcast bounded by TTL
//! - **Informed Flooding**: flooding that pulls cache-hinted neighbors to the
//!   front of the queue and warms caches on success
//! - **Random Walk**: single pointer moving to a random unvisited neighbor
//! - **Informed Random Walk**: walk that may revisit and prefers cache-hinted
//!   neighbors, warming caches on success
//!
//! Every strategy reports the number of messages (node visitations that
//! consumed a traversal step) and the number of distinct nodes touched.
//! Walk strategies also record their trajectory for playback.

pub mod flooding;
pub mod walk;

use std::fmt;
use std::str::FromStr;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::topology::Topology;

pub use flooding::{flooding, informed_flooding};
pub use walk::{informed_random_walk, random_walk};

/// Available search strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Flooding,
    InformedFlooding,
    RandomWalk,
    InformedRandomWalk,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Flooding,
        Strategy::InformedFlooding,
        Strategy::RandomWalk,
        Strategy::InformedRandomWalk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Flooding => "flooding",
            Strategy::InformedFlooding => "informed_flooding",
            Strategy::RandomWalk => "random_walk",
            Strategy::InformedRandomWalk => "informed_random_walk",
        }
    }

    /// Walk strategies consume randomness and record a visit history
    pub fn is_walk(&self) -> bool {
        matches!(self, Strategy::RandomWalk | Strategy::InformedRandomWalk)
    }

    /// Informed strategies write to node caches on success
    pub fn is_informed(&self) -> bool {
        matches!(self, Strategy::InformedFlooding | Strategy::InformedRandomWalk)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| SearchError::UnknownStrategy(s.to_string()))
    }
}

/// One step of a walk trajectory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub node: String,
    pub found: bool,
}

/// Result of a single strategy invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub strategy: Strategy,
    /// Node visitations that consumed a traversal step
    pub messages: usize,
    /// Distinct nodes visited
    pub nodes_touched: usize,
    /// Node where the target was located, if any
    pub found_at: Option<String>,
    /// Walk trajectory; `None` for flooding strategies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Visit>>,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.found_at.is_some()
    }
}

/// Caller misuse detected before the engine runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Unknown strategy '{0}' (expected one of: flooding, informed_flooding, random_walk, informed_random_walk)")]
    UnknownStrategy(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Run one strategy after checking the caller's parameters.
///
/// Fails with [`SearchError::InvalidParameter`] for a negative TTL or a start
/// node that is not part of the topology. The topology must already have been
/// validated; informed strategies mutate node caches.
pub fn run<R: Rng + ?Sized>(
    strategy: Strategy,
    topology: &mut Topology,
    start: &str,
    target: &str,
    ttl: i64,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError> {
    if ttl < 0 {
        return Err(SearchError::InvalidParameter(format!(
            "ttl must be a non-negative integer (got {})",
            ttl
        )));
    }
    let ttl = u32::try_from(ttl).map_err(|_| {
        SearchError::InvalidParameter(format!("ttl {} exceeds the maximum of {}", ttl, u32::MAX))
    })?;

    if !topology.contains(start) {
        return Err(SearchError::InvalidParameter(format!(
            "start node '{}' is not part of the topology",
            start
        )));
    }

    info!(
        "Running {} from '{}' for resource '{}' with TTL {}",
        strategy, start, target, ttl
    );

    let outcome = match strategy {
        Strategy::Flooding => flooding(topology, start, target, ttl),
        Strategy::InformedFlooding => informed_flooding(topology, start, target, ttl),
        Strategy::RandomWalk => random_walk(topology, start, target, ttl, rng),
        Strategy::InformedRandomWalk => informed_random_walk(topology, start, target, ttl, rng),
    };

    match &outcome.found_at {
        Some(node) if strategy.is_informed() => info!(
            "Resource '{}' found at '{}' after {} messages; {} nodes now cache it",
            target,
            node,
            outcome.messages,
            topology.cached_nodes(target).len()
        ),
        Some(node) => info!(
            "Resource '{}' found at '{}' after {} messages",
            target, node, outcome.messages
        ),
        None => info!(
            "Resource '{}' not found; {} messages, {} nodes",
            target, outcome.messages, outcome.nodes_touched
        ),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::NodeState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pair() -> Topology {
        let mut topology = Topology::new();
        topology.add_node("A", NodeState::default());
        topology.add_node("B", NodeState::new(["r1"]));
        topology.add_edge("A", "B").unwrap();
        topology
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("flooding".parse::<Strategy>(), Ok(Strategy::Flooding));
        assert_eq!("informed-random-walk".parse::<Strategy>(), Ok(Strategy::InformedRandomWalk));
        assert_eq!(" Random_Walk ".parse::<Strategy>(), Ok(Strategy::RandomWalk));
        assert_eq!(
            "gossip".parse::<Strategy>(),
            Err(SearchError::UnknownStrategy("gossip".to_string()))
        );
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_run_rejects_negative_ttl() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = run(Strategy::Flooding, &mut pair(), "A", "r1", -1, &mut rng).unwrap_err();
        assert!(matches!(err, SearchError::InvalidParameter(_)));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_run_rejects_oversized_ttl() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = run(Strategy::Flooding, &mut pair(), "A", "r1", 5_000_000_000, &mut rng).unwrap_err();
        assert!(matches!(err, SearchError::InvalidParameter(_)));
        assert!(err.to_string().contains("exceeds the maximum"));
        assert!(!err.to_string().contains("non-negative"));

        let max = i64::from(u32::MAX);
        assert!(run(Strategy::Flooding, &mut pair(), "A", "r1", max, &mut rng).is_ok());
    }

    #[test]
    fn test_run_rejects_unknown_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = run(Strategy::RandomWalk, &mut pair(), "Z", "r1", 3, &mut rng).unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_run_dispatches_every_strategy() {
        for strategy in Strategy::ALL {
            let mut rng = StdRng::seed_from_u64(7);
            let mut topology = pair();
            let outcome = run(strategy, &mut topology, "A", "r1", 1, &mut rng).unwrap();
            assert_eq!(outcome.strategy, strategy);
            // only informed strategies write to caches
            assert_eq!(!topology.cached_nodes("r1").is_empty(), strategy.is_informed());
            assert_eq!(outcome.messages, 2);
            assert_eq!(outcome.nodes_touched, 2);
            assert_eq!(outcome.found_at.as_deref(), Some("B"));
            assert_eq!(outcome.history.is_some(), strategy.is_walk());
        }
    }
}
