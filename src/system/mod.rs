//! Platform glue: logging setup and host identity.

pub mod logging;

pub use logging::init_logging;

/// Hostname used as the `host` label on every metric.
pub fn hostname() -> String {
    sysinfo::System::host_name()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}
