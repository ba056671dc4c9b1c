//! asterisk-exporter - Prometheus exporter for the Asterisk telephony server
//!
//! Scrapes the asterisk administrative CLI on a fixed cadence, normalizes its
//! loosely formatted output into labeled gauges, and serves them at
//! `GET /metrics` behind HTTP Basic authentication.
//!
//! # Architecture
//! - `collector`: command invocation, line parsers, collection cycle
//! - `metrics`: owned Prometheus registry and text exposition
//! - `api`: HTTP handler and auth middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: server startup
//! - `system`: logging setup and host identity

pub mod api;
pub mod collector;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod runtime;
pub mod system;
