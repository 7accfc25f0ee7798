//! Overlay topology module.
//!
//! This module contains the graph-with-state model the search strategies run
//! over, and templates for generating common overlay shapes.

pub mod types;
pub mod templates;

// Re-export key types and functions for easier access
pub use types::{NodeState, Topology, TopologyError};
pub use templates::{build_template, place_resource, Template};
