//! HTTP surface: the metrics endpoint and its auth middleware.

pub mod middleware;
pub mod services;
