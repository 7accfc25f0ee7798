//! Random-walk strategies.
//!
//! A single pointer advances one neighbor per step for at most `ttl + 1`
//! steps. Each step counts one message. Success is evaluated before the
//! step is recorded, so every history entry carries its final found flag.

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{SearchOutcome, Strategy, Visit};
use crate::topology::Topology;

/// Accumulated state of one walk
#[derive(Debug, Default)]
struct Walk {
    messages: usize,
    visited: HashSet<String>,
    /// Distinct nodes in first-visit order
    visit_order: Vec<String>,
    history: Vec<Visit>,
}

impl Walk {
    /// Count a message for `node` and record it. Returns whether it satisfied the search.
    fn step(&mut self, topology: &Topology, node: &str, target: &str) -> bool {
        self.messages += 1;
        if self.visited.insert(node.to_string()) {
            self.visit_order.push(node.to_string());
        }

        let found = topology.satisfies(node, target);
        debug!(
            "[{}] Visiting '{}': resource {}",
            self.messages,
            node,
            if found { "found" } else { "not found" }
        );
        self.history.push(Visit {
            node: node.to_string(),
            found,
        });
        found
    }

    fn finish(self, strategy: Strategy, found_at: Option<String>) -> (SearchOutcome, Vec<String>) {
        let outcome = SearchOutcome {
            strategy,
            messages: self.messages,
            nodes_touched: self.visited.len(),
            found_at,
            history: Some(self.history),
        };
        (outcome, self.visit_order)
    }
}

/// Random walk that never revisits a node.
///
/// Ends early at a dead end, i.e. when every neighbor of the current node has
/// already been visited, even if that leaves budget unused.
pub fn random_walk<R: Rng + ?Sized>(
    topology: &Topology,
    start: &str,
    target: &str,
    ttl: u32,
    rng: &mut R,
) -> SearchOutcome {
    let mut walk = Walk::default();
    let mut current = start.to_string();

    for _ in 0..=ttl {
        if walk.step(topology, &current, target) {
            return walk.finish(Strategy::RandomWalk, Some(current)).0;
        }

        let candidates: Vec<&String> = topology
            .neighbors(&current)
            .iter()
            .filter(|n| !walk.visited.contains(n.as_str()))
            .collect();

        match candidates.choose(rng) {
            Some(next) => {
                debug!("-> Walking to neighbor '{}'", next);
                current = (*next).clone();
            }
            None => {
                debug!("No unvisited neighbors left at '{}'; stopping", current);
                break;
            }
        }
    }

    walk.finish(Strategy::RandomWalk, None).0
}

/// Random walk that may revisit nodes and prefers cache-hinted neighbors.
///
/// Neighbors are shuffled, then the first one whose cache holds `target` is
/// taken, falling back to the first shuffled neighbor. On success every node
/// visited during the walk learns `target` in its cache.
pub fn informed_random_walk<R: Rng + ?Sized>(
    topology: &mut Topology,
    start: &str,
    target: &str,
    ttl: u32,
    rng: &mut R,
) -> SearchOutcome {
    let mut walk = Walk::default();
    let mut current = start.to_string();

    for _ in 0..=ttl {
        if walk.step(topology, &current, target) {
            let (outcome, visited) = walk.finish(Strategy::InformedRandomWalk, Some(current));
            debug!("Caching '{}' on {} visited nodes", target, visited.len());
            topology.remember(&visited, target);
            return outcome;
        }

        let mut neighbors: Vec<&String> = topology.neighbors(&current).iter().collect();
        neighbors.shuffle(rng);

        let next = neighbors
            .iter()
            .find(|n| topology.has_cached(n.as_str(), target))
            .or_else(|| neighbors.first());

        match next {
            Some(next) => {
                debug!("-> Walking to neighbor '{}'", next);
                current = (*next).clone();
            }
            None => {
                debug!("'{}' has no neighbors; stopping", current);
                break;
            }
        }
    }

    walk.finish(Strategy::InformedRandomWalk, None).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::informed_flooding;
    use crate::topology::{build_template, place_resource, NodeState, Template};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn topology_with(template: Template, list: &[&str], holder: &str) -> Topology {
        let mut config = build_template(template, &names(list));
        place_resource(&mut config, holder, "r1");
        Topology::from_config(&config).unwrap()
    }

    #[test]
    fn test_random_walk_on_path() {
        let topology = topology_with(Template::Chain, &["A", "B", "C", "D"], "D");
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = random_walk(&topology, "A", "r1", 3, &mut rng);

        assert_eq!(outcome.found_at.as_deref(), Some("D"));
        assert_eq!(outcome.messages, 4);
        assert_eq!(outcome.nodes_touched, 4);

        let history = outcome.history.unwrap();
        let trail: Vec<&str> = history.iter().map(|v| v.node.as_str()).collect();
        assert_eq!(trail, vec!["A", "B", "C", "D"]);
        assert_eq!(history.iter().filter(|v| v.found).count(), 1);
        assert!(history.last().unwrap().found);
    }

    #[test]
    fn test_random_walk_budget_is_ttl_plus_one() {
        let topology = topology_with(Template::Chain, &["A", "B", "C", "D"], "D");
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = random_walk(&topology, "A", "r1", 2, &mut rng);
        assert!(!outcome.found());
        assert_eq!(outcome.messages, 3);

        let outcome = random_walk(&topology, "A", "r1", 0, &mut rng);
        assert_eq!((outcome.messages, outcome.nodes_touched), (1, 1));
    }

    #[test]
    fn test_random_walk_stops_at_dead_end() {
        let topology = topology_with(Template::Chain, &["A", "B", "C", "D"], "D");
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = random_walk(&topology, "A", "missing", 50, &mut rng);
        assert!(!outcome.found());
        assert_eq!(outcome.messages, 4);
    }

    #[test]
    fn test_random_walk_never_revisits() {
        let topology = topology_with(Template::Mesh, &["A", "B", "C", "D", "E", "F"], "F");
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = random_walk(&topology, "A", "missing", 20, &mut rng);
            let history = outcome.history.unwrap();
            assert_eq!(history.len(), outcome.nodes_touched);
            assert_eq!(history.len(), outcome.messages);
            assert_eq!(outcome.nodes_touched, 6);
        }
    }

    #[test]
    fn test_random_walk_is_reproducible_with_seed() {
        let topology = topology_with(Template::Mesh, &["A", "B", "C", "D", "E", "F"], "E");
        let first = random_walk(&topology, "A", "r1", 5, &mut StdRng::seed_from_u64(9));
        let second = random_walk(&topology, "A", "r1", 5, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn test_informed_walk_short_circuits_to_cached_leaf() {
        let leaves = ["H", "L1", "L2", "L3", "L4", "L5"];
        let mut topology = topology_with(Template::Star, &leaves, "L3");

        // Warm L3 only: an informed flood started at the holder succeeds immediately
        let warmup = informed_flooding(&mut topology, "L3", "r1", 2);
        assert_eq!(warmup.messages, 1);
        assert_eq!(topology.cached_nodes("r1"), vec!["L3"]);

        for seed in 0..16 {
            let mut trial = topology.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = informed_random_walk(&mut trial, "H", "r1", 4, &mut rng);
            assert_eq!(outcome.messages, 2);
            assert_eq!(outcome.found_at.as_deref(), Some("L3"));
            let trail: Vec<String> = outcome.history.unwrap().into_iter().map(|v| v.node).collect();
            assert_eq!(trail, names(&["H", "L3"]));
            assert_eq!(trial.cached_nodes("r1"), vec!["H", "L3"]);
        }
    }

    #[test]
    fn test_informed_walk_may_revisit() {
        let mut topology = topology_with(Template::Chain, &["A", "B"], "B");
        topology.add_node("C", NodeState::default());
        topology.add_edge("A", "C").unwrap();
        // A-B and A-C, nothing anywhere matches "missing"
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = informed_random_walk(&mut topology, "A", "missing", 6, &mut rng);

        assert!(!outcome.found());
        assert_eq!(outcome.messages, 7);
        assert!(outcome.nodes_touched <= 3);
        // every other step returns to the hub
        let history = outcome.history.unwrap();
        assert!(history.iter().step_by(2).all(|v| v.node == "A"));
        assert!(topology.cached_nodes("missing").is_empty());
    }

    #[test]
    fn test_informed_walk_single_node_dead_end() {
        let mut topology = Topology::new();
        topology.add_node("solo", NodeState::default());
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = informed_random_walk(&mut topology, "solo", "r1", 10, &mut rng);
        assert_eq!((outcome.messages, outcome.nodes_touched), (1, 1));
    }
}
