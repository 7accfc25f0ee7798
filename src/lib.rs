//! # P2PSim - Resource-discovery strategy simulator for unstructured P2P overlays
//!
//! This library measures how many messages and how many distinct nodes a
//! search touches while looking for a resource in a static peer-to-peer
//! overlay under a bounded time-to-live (TTL).
//!
//! ## Overview
//!
//! Each node of the overlay hosts a fixed set of resources and keeps a cache
//! of resources it learned about from earlier informed searches. A search is
//! a sequential trace of a hypothetical message exchange; there is no real
//! transport and no concurrency between simulated nodes.
//!
//! ## Strategies
//!
//! - **Flooding**: breadth-first broadcast, each node processed at most once
//! - **Informed Flooding**: cache-hinted neighbors jump the queue; caches are
//!   warmed on success
//! - **Random Walk**: one random unvisited neighbor per step
//! - **Informed Random Walk**: revisits allowed, cache-hinted neighbors preferred
//!
//! ## Architecture
//!
//! - `config`: Declared network document (nodes, edges, resource vocabulary)
//! - `config_loader`: YAML/JSON loading and CLI overrides
//! - `topology`: Graph-with-state model and overlay templates
//! - `utils`: Topology validation
//! - `search`: The four strategies and the checked entry point
//! - `trials`: Repeated isolated trials and cache-carrying sequences
//! - `report`: Text, JSON and GraphViz DOT output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use p2psim::{config_loader, search, topology::Topology, utils::validate_topology};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("network.yaml"))?;
//! let mut topology = Topology::from_config(&config)?;
//! validate_topology(&topology, &config)?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let outcome = search::run(
//!     search::Strategy::Flooding,
//!     &mut topology,
//!     "A",
//!     "r1",
//!     3,
//!     &mut rng,
//! )?;
//! println!("{} messages, {} nodes", outcome.messages, outcome.nodes_touched);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! resources: [r1, r2]
//! min_degree: 1        # optional, defaults to 1
//! nodes:
//!   A: []
//!   B: [r2]
//!   C: []
//!   D: [r1]
//! edges:
//!   - [A, B]
//!   - [B, C]
//!   - [C, D]
//! ```
//!
//! ## Error Handling
//!
//! Library operations return typed `thiserror` errors
//! ([`topology::TopologyError`], [`search::SearchError`],
//! [`config::ConfigError`]); file I/O and the binary use `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod utils;
pub mod search;
pub mod trials;
pub mod report;
