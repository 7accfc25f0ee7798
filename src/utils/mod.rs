//! Shared utilities: topology validation.

pub mod validation;

pub use validation::{validate_connectivity, validate_min_degree, validate_resources, validate_topology};
