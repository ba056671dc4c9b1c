//! Collection cycle
//!
//! One long-lived task walks the command set at a fixed cadence and writes
//! the parsed results into the metrics registry. Steps are isolated: a failed
//! command or unparseable output logs a warning, bumps the failure counter
//! and the cycle moves on. The fixed interval is the retry mechanism; there
//! is no backoff and no terminal state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::command::{CommandRunner, CommandSet};
use super::parsers;
use crate::errors::Result;
use crate::metrics::Metrics;

pub struct Collector {
    metrics: Arc<Metrics>,
    runner: Arc<dyn CommandRunner>,
    commands: CommandSet,
    host: String,
}

impl Collector {
    pub fn new(
        metrics: Arc<Metrics>,
        runner: Arc<dyn CommandRunner>,
        commands: CommandSet,
        host: String,
    ) -> Self {
        Self {
            metrics,
            runner,
            commands,
            host,
        }
    }

    /// Spawn the steady-state collection loop. Runs until process exit.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.collect_once().await;
            }
        })
    }

    /// Run one full cycle, every step isolated from the others.
    pub async fn collect_once(&self) {
        self.run_step("channels", self.collect_channels()).await;
        self.run_step("uptime", self.collect_uptime()).await;
        self.run_step("peer_summary", self.collect_peer_summary()).await;
        self.run_step("threads", self.collect_threads()).await;
        self.run_step("status_unknown", self.collect_status_unknown())
            .await;
        self.run_step("status_qualified", self.collect_status_qualified())
            .await;
        self.run_step("peer_detail", self.collect_peer_detail()).await;

        self.metrics.scrape_cycles_total.inc();
    }

    async fn run_step(&self, step: &str, fut: impl Future<Output = Result<()>>) {
        if let Err(e) = fut.await {
            warn!("[{}] step '{}' failed: {}", e.code(), step, e);
            self.metrics
                .scrape_step_failures_total
                .with_label_values(&[step])
                .inc();
        }
    }

    async fn collect_channels(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.channels).await?;
        let Some(summary) = parsers::parse_channel_summary(&output)? else {
            debug!("channel summary shorter than 4 lines, skipping update");
            return Ok(());
        };

        let _gate = self.metrics.write_batch();
        self.metrics
            .total_active_channels
            .with_label_values(&[&self.host, "active channels"])
            .set(summary.active_channels);
        self.metrics
            .total_active_calls
            .with_label_values(&[&self.host, "active calls"])
            .set(summary.active_calls);
        self.metrics
            .total_calls_processed
            .with_label_values(&[&self.host, "calls processed"])
            .set(summary.calls_processed);
        Ok(())
    }

    async fn collect_uptime(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.uptime).await?;
        let Some(uptime) = parsers::parse_uptime(&output)? else {
            debug!("uptime output shorter than 2 lines, skipping update");
            return Ok(());
        };

        let _gate = self.metrics.write_batch();
        self.metrics
            .system_uptime_seconds
            .with_label_values(&[&self.host, "system uptime seconds"])
            .set(uptime.system_uptime_secs);
        self.metrics
            .last_reload_seconds
            .with_label_values(&[&self.host, "last reload seconds"])
            .set(uptime.last_reload_secs);
        Ok(())
    }

    async fn collect_peer_summary(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.peer_summary).await?;
        let counts = parsers::parse_peer_counts(&output);

        let _gate = self.metrics.write_batch();
        self.metrics
            .total_sip_peers
            .with_label_values(&[&self.host, "total sip peers"])
            .set(counts.total);
        self.metrics
            .total_monitored_online
            .with_label_values(&[&self.host, "total monitored online"])
            .set(counts.monitored_online);
        self.metrics
            .total_monitored_offline
            .with_label_values(&[&self.host, "total monitored offline"])
            .set(counts.monitored_offline);
        self.metrics
            .total_unmonitored_online
            .with_label_values(&[&self.host, "total unmonitored online"])
            .set(counts.unmonitored_online);
        self.metrics
            .total_unmonitored_offline
            .with_label_values(&[&self.host, "total unmonitored offline"])
            .set(counts.unmonitored_offline);
        Ok(())
    }

    async fn collect_threads(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.threads).await?;
        let Some(count) = parsers::parse_count(&output) else {
            debug!("thread count not numeric, skipping update");
            return Ok(());
        };

        let _gate = self.metrics.write_batch();
        self.metrics
            .total_threads
            .with_label_values(&[&self.host, "total threads listed"])
            .set(count);
        Ok(())
    }

    async fn collect_status_unknown(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.status_unknown).await?;
        let Some(count) = parsers::parse_count(&output) else {
            debug!("status-unknown count not numeric, skipping update");
            return Ok(());
        };

        let _gate = self.metrics.write_batch();
        self.metrics
            .total_sip_status_unknown
            .with_label_values(&[&self.host, "total sip status unknown"])
            .set(count);
        Ok(())
    }

    async fn collect_status_qualified(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.status_qualified).await?;
        let Some(count) = parsers::parse_count(&output) else {
            debug!("status-qualified count not numeric, skipping update");
            return Ok(());
        };

        let _gate = self.metrics.write_batch();
        self.metrics
            .total_sip_status_qualified
            .with_label_values(&[&self.host, "total sip status qualified"])
            .set(count);
        Ok(())
    }

    /// Peers absent from the current listing must disappear from the next
    /// scrape, so the three per-peer gauges are reset and repopulated under
    /// one write-batch guard.
    async fn collect_peer_detail(&self) -> Result<()> {
        let output = self.runner.run(&self.commands.peer_detail).await?;

        let _gate = self.metrics.write_batch();
        self.metrics.reset_peer_metrics();

        for line in output.lines() {
            // Blank and summary lines are not peer rows
            if line.trim().is_empty() || line.contains("sip peers") {
                continue;
            }

            let Some(record) = parsers::parse_peer_line(line) else {
                continue;
            };

            let labels = [self.host.as_str(), record.name.as_str(), record.host.as_str()];
            self.metrics
                .sip_peer_status
                .with_label_values(&labels)
                .set(record.status.as_gauge_value());
            self.metrics
                .sip_peer_latency_ms
                .with_label_values(&labels)
                .set(record.latency_ms);
            self.metrics
                .sip_peer_port
                .with_label_values(&labels)
                .set(record.port);
        }

        Ok(())
    }
}
