//! Flooding strategies.
//!
//! Both variants drain a work queue of (node, remaining TTL) entries. An
//! entry whose TTL is negative or whose node was already processed is
//! discarded without counting a message. Neighbors are scheduled whether or
//! not they were visited; the dequeue-time check filters them.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use super::{SearchOutcome, Strategy};
use crate::topology::Topology;

/// A node scheduled for visitation with its remaining TTL
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrontierEntry {
    node: String,
    ttl: i64,
}

/// Where a newly scheduled neighbor goes in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Front,
    Back,
}

/// Breadth-first flooding bounded by `ttl` hops.
///
/// Stops at the first node (in BFS order) that hosts or has cached `target`.
pub fn flooding(topology: &Topology, start: &str, target: &str, ttl: u32) -> SearchOutcome {
    let (outcome, _) = flood(topology, start, target, ttl, Strategy::Flooding, |_, _| {
        Placement::Back
    });
    outcome
}

/// Flooding that schedules cache-hinted neighbors at the front of the queue.
///
/// On success every node visited during this search learns `target` in its
/// cache, not just the nodes on the path to the winner.
pub fn informed_flooding(topology: &mut Topology, start: &str, target: &str, ttl: u32) -> SearchOutcome {
    let (outcome, visited) = flood(
        topology,
        start,
        target,
        ttl,
        Strategy::InformedFlooding,
        |topology, neighbor| {
            if topology.has_cached(neighbor, target) {
                Placement::Front
            } else {
                Placement::Back
            }
        },
    );

    if outcome.found() {
        debug!("Caching '{}' on {} visited nodes", target, visited.len());
        topology.remember(&visited, target);
    }
    outcome
}

/// Shared queue discipline. Returns the outcome and the visited nodes.
fn flood<F>(
    topology: &Topology,
    start: &str,
    target: &str,
    ttl: u32,
    strategy: Strategy,
    place: F,
) -> (SearchOutcome, Vec<String>)
where
    F: Fn(&Topology, &str) -> Placement,
{
    let mut queue = VecDeque::new();
    queue.push_back(FrontierEntry {
        node: start.to_string(),
        ttl: i64::from(ttl),
    });

    let mut visited: HashSet<String> = HashSet::new();
    let mut visit_order: Vec<String> = Vec::new();
    let mut messages = 0usize;
    let mut found_at = None;

    while let Some(FrontierEntry { node: current, ttl: t }) = queue.pop_front() {
        if t < 0 || visited.contains(&current) {
            continue;
        }

        visited.insert(current.clone());
        visit_order.push(current.clone());
        messages += 1;

        if topology.satisfies(&current, target) {
            debug!("[{}] Visiting '{}': resource found", messages, current);
            found_at = Some(current);
            break;
        }
        debug!("[{}] Visiting '{}': resource not found", messages, current);

        for neighbor in topology.neighbors(&current) {
            trace!("-> Scheduling '{}' (TTL={})", neighbor, t - 1);
            let entry = FrontierEntry {
                node: neighbor.clone(),
                ttl: t - 1,
            };
            match place(topology, neighbor.as_str()) {
                Placement::Front => queue.push_front(entry),
                Placement::Back => queue.push_back(entry),
            }
        }
    }

    let outcome = SearchOutcome {
        strategy,
        messages,
        nodes_touched: visited.len(),
        found_at,
        history: None,
    };
    (outcome, visit_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{build_template, place_resource, Template};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn path_with_resource_at_end() -> Topology {
        let mut config = build_template(Template::Chain, &names(&["A", "B", "C", "D"]));
        place_resource(&mut config, "D", "r1");
        Topology::from_config(&config).unwrap()
    }

    #[test]
    fn test_flooding_path_within_ttl() {
        let topology = path_with_resource_at_end();
        let outcome = flooding(&topology, "A", "r1", 3);
        assert_eq!(outcome.found_at.as_deref(), Some("D"));
        assert_eq!(outcome.messages, 4);
        assert_eq!(outcome.nodes_touched, 4);
    }

    #[test]
    fn test_flooding_path_ttl_too_short() {
        let topology = path_with_resource_at_end();
        let outcome = flooding(&topology, "A", "r1", 2);
        assert!(!outcome.found());
        assert_eq!(outcome.nodes_touched, 3);
        assert_eq!(outcome.messages, 3);
    }

    #[test]
    fn test_ttl_zero_evaluates_only_start() {
        let topology = path_with_resource_at_end();
        let outcome = flooding(&topology, "A", "r1", 0);
        assert_eq!((outcome.messages, outcome.nodes_touched), (1, 1));

        let hit = flooding(&topology, "D", "r1", 0);
        assert_eq!(hit.found_at.as_deref(), Some("D"));
        assert_eq!(hit.messages, 1);
    }

    #[test]
    fn test_flooding_does_not_touch_caches() {
        let topology = path_with_resource_at_end();
        let before = topology.clone();
        let outcome = flooding(&topology, "A", "r1", 3);
        assert!(outcome.found());
        assert_eq!(topology, before);
    }

    #[test]
    fn test_flooding_finds_nearest_holder() {
        let mut config = build_template(Template::Ring, &names(&["A", "B", "C", "D", "E", "F"]));
        place_resource(&mut config, "C", "r1");
        place_resource(&mut config, "F", "r1");
        let topology = Topology::from_config(&config).unwrap();

        // F is one hop from A, C is two
        let outcome = flooding(&topology, "A", "r1", 5);
        assert_eq!(outcome.found_at.as_deref(), Some("F"));
    }

    #[test]
    fn test_flooding_mesh_never_double_counts() {
        let config = build_template(Template::Mesh, &names(&["A", "B", "C", "D", "E"]));
        let topology = Topology::from_config(&config).unwrap();
        let outcome = flooding(&topology, "A", "missing", 10);
        assert!(!outcome.found());
        assert_eq!(outcome.messages, 5);
        assert_eq!(outcome.nodes_touched, 5);
    }

    #[test]
    fn test_informed_flooding_warms_visited_caches() {
        let mut topology = path_with_resource_at_end();
        let outcome = informed_flooding(&mut topology, "A", "r1", 3);
        assert_eq!(outcome.found_at.as_deref(), Some("D"));
        assert_eq!(outcome.strategy, Strategy::InformedFlooding);
        assert_eq!(topology.cached_nodes("r1"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_informed_flooding_failure_leaves_caches_cold() {
        let mut topology = path_with_resource_at_end();
        let outcome = informed_flooding(&mut topology, "A", "r1", 2);
        assert!(!outcome.found());
        assert!(topology.cached_nodes("r1").is_empty());
    }

    #[test]
    fn test_informed_flooding_prefers_cached_neighbor() {
        // Star with hub H; the resource lives at L3
        let mut config = build_template(Template::Star, &names(&["H", "L1", "L2", "L3", "L4"]));
        place_resource(&mut config, "L3", "r1");
        let mut topology = Topology::from_config(&config).unwrap();

        let cold = flooding(&topology, "H", "r1", 1);
        assert_eq!(cold.messages, 4);

        topology.node_mut("L4").unwrap().cache.insert("r1".to_string());
        let warm = informed_flooding(&mut topology, "H", "r1", 1);
        assert_eq!(warm.found_at.as_deref(), Some("L4"));
        assert_eq!(warm.messages, 2);
    }

    #[test]
    fn test_second_informed_run_is_not_more_expensive() {
        let mut topology = path_with_resource_at_end();
        let first = informed_flooding(&mut topology, "A", "r1", 3);
        let second = informed_flooding(&mut topology, "A", "r1", 3);
        assert!(first.found() && second.found());
        assert!(second.messages <= first.messages);
        assert_eq!(second.messages, 1);
    }
}
