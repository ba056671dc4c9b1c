//! Prometheus metrics module
//!
//! Provides the owned metrics registry and its text exposition.

mod registry;

pub use registry::Metrics;
