//! Repeated search trials.
//!
//! Isolated trials each run on a fresh clone of the topology with their own
//! seeded random source, so they can execute in parallel and never see each
//! other's cache writes. Sequences run on a single topology and carry cache
//! state from one search to the next.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::search::{self, SearchError, SearchOutcome, Strategy};
use crate::topology::Topology;

/// Parameters shared by every search in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub strategy: Strategy,
    pub start: String,
    pub target: String,
    pub ttl: i64,
}

/// Min/max/mean of one metric over a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl MetricStats {
    fn from_values(values: &[usize]) -> Self {
        if values.is_empty() {
            return Self {
                min: 0,
                max: 0,
                mean: 0.0,
            };
        }
        Self {
            min: values.iter().copied().min().unwrap_or(0),
            max: values.iter().copied().max().unwrap_or(0),
            mean: values.iter().sum::<usize>() as f64 / values.len() as f64,
        }
    }
}

/// Aggregate of a batch of isolated trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub params: SearchParams,
    pub trials: usize,
    pub base_seed: u64,
    pub successes: usize,
    pub success_rate: f64,
    pub messages: MetricStats,
    pub nodes_touched: MetricStats,
}

/// Seed used for trial `index` of a batch
pub fn trial_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Run `trials` isolated searches in parallel and summarize them.
///
/// Trial `i` uses `StdRng::seed_from_u64(base_seed + i)` and a clone of
/// `topology`, so results do not depend on scheduling order.
pub fn run_trials(
    topology: &Topology,
    params: &SearchParams,
    trials: usize,
    base_seed: u64,
) -> Result<TrialSummary, SearchError> {
    info!(
        "Running {} isolated {} trials from '{}' for '{}'",
        trials, params.strategy, params.start, params.target
    );

    let outcomes: Vec<SearchOutcome> = (0..trials)
        .into_par_iter()
        .map(|i| {
            let mut trial = topology.clone();
            let mut rng = StdRng::seed_from_u64(trial_seed(base_seed, i));
            search::run(
                params.strategy,
                &mut trial,
                &params.start,
                &params.target,
                params.ttl,
                &mut rng,
            )
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    Ok(summarize(params, base_seed, &outcomes))
}

/// Run `runs` searches one after another on the same topology.
///
/// Cache writes by informed strategies persist between runs, so later runs
/// observe the learning effect of earlier ones.
pub fn run_sequence(
    topology: &mut Topology,
    params: &SearchParams,
    runs: usize,
    seed: u64,
) -> Result<Vec<SearchOutcome>, SearchError> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..runs)
        .map(|_| {
            search::run(
                params.strategy,
                topology,
                &params.start,
                &params.target,
                params.ttl,
                &mut rng,
            )
        })
        .collect()
}

/// Summarize a batch of outcomes
pub fn summarize(params: &SearchParams, base_seed: u64, outcomes: &[SearchOutcome]) -> TrialSummary {
    let messages: Vec<usize> = outcomes.iter().map(|o| o.messages).collect();
    let nodes: Vec<usize> = outcomes.iter().map(|o| o.nodes_touched).collect();
    let successes = outcomes.iter().filter(|o| o.found()).count();

    TrialSummary {
        params: params.clone(),
        trials: outcomes.len(),
        base_seed,
        successes,
        success_rate: if outcomes.is_empty() {
            0.0
        } else {
            successes as f64 / outcomes.len() as f64
        },
        messages: MetricStats::from_values(&messages),
        nodes_touched: MetricStats::from_values(&nodes),
    }
}
