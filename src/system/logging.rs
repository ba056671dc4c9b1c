//! Logging system initialization
//!
//! Sets up tracing output based on the loaded configuration. Call once during
//! startup; the returned guard must stay alive for the life of the process so
//! non-blocking writes are flushed.

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let log_to_file = config.file.as_ref().is_some_and(|f| !f.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = if log_to_file {
        let path = config.file.as_deref().unwrap_or_default();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Failed to open log file");
        Box::new(file)
    } else {
        Box::new(std::io::stdout())
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(!log_to_file);

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}
