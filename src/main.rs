use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use asterisk_exporter::collector::{Collector, CommandSet, ShellRunner};
use asterisk_exporter::config::AppConfig;
use asterisk_exporter::metrics::Metrics;
use asterisk_exporter::runtime::run_server;
use asterisk_exporter::system;

#[derive(Parser, Debug)]
#[command(name = "asterisk-exporter", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref());
    let _log_guard = system::init_logging(&config.logging);
    config.validate()?;

    let host = system::hostname();
    info!("Collecting asterisk metrics for host '{}'", host);

    let metrics = Arc::new(Metrics::new()?);

    let runner = Arc::new(ShellRunner::new(Duration::from_secs(
        config.collector.command_timeout_secs,
    )));
    let commands = CommandSet::for_binary(&config.collector.asterisk_binary);
    let interval = Duration::from_secs(config.collector.interval_secs);

    if !std::path::Path::new(&config.collector.asterisk_binary).exists() {
        warn!(
            "asterisk binary not found at {}; every collection step will fail until it appears",
            config.collector.asterisk_binary
        );
    }

    let collector = Collector::new(metrics.clone(), runner, commands, host);
    collector.spawn(interval);

    run_server(config, metrics).await
}
