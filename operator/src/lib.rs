//! Provides API for the operator and related tooling.
#![warn(missing_docs)]

/// Benchmark module for managing storage benchmark resources.
pub mod benchmark;
/// Labels module for managing resource labels.
#[cfg(feature = "controller")]
pub(crate) mod labels;
/// Utils module for shared utility functions.
#[cfg(feature = "controller")]
pub mod utils;

/// A list of constants used in various K8s resources
#[cfg(feature = "controller")]
const CONTROLLER_NAME: &str = "fiobench";
