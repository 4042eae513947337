//! Benchmark is a k8s custom resource that defines one distributed storage benchmark run.

// Export all spec types
mod spec;
pub use spec::*;

/// Rules module for matching job_params rules against requested jobs.
pub mod rules;
/// Template module for expanding workload_args placeholders.
pub mod template;
/// Validate module for checking benchmark spec shape.
pub mod validate;

// All other mods are behind the controller flag to keep the deps to a minimum
#[cfg(feature = "controller")]
pub(crate) mod controller;
#[cfg(feature = "controller")]
pub(crate) mod job;

#[cfg(feature = "controller")]
pub use controller::run;
