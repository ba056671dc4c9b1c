//! Collector cycle tests
//!
//! Drives `Collector::collect_once` with canned command output and checks the
//! registry contents: step isolation, stale-aggregate semantics, and the
//! reset-then-repopulate pass over the per-peer gauges.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use asterisk_exporter::collector::{Collector, CommandRunner, CommandSet};
use asterisk_exporter::errors::{ExporterError, Result};
use asterisk_exporter::metrics::Metrics;

const HOST: &str = "testhost";

/// Serves canned output keyed by command string; unknown commands fail like a
/// missing binary would.
struct MockRunner {
    responses: HashMap<String, Result<String>>,
}

impl MockRunner {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn with(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_string(), Ok(output.to_string()));
        self
    }

    fn failing(mut self, command: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            Err(ExporterError::command_failed("exit status 1")),
        );
        self
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &str) -> Result<String> {
        match self.responses.get(command) {
            Some(result) => result.clone(),
            None => Err(ExporterError::command_failed(format!(
                "no canned output for: {command}"
            ))),
        }
    }
}

const PEER_LISTING: &str = "\
Name/username    Host            Dyn Forcerport Comedia    ACL Port     Status
1000             192.168.1.5      D   N  5060     OK (23 ms)
2000/voip        10.0.0.9         D   N   A    UNKNOWN
2 sip peers [Monitored: 1 online, 1 offline Unmonitored: 0 online, 0 offline]
";

fn commands() -> CommandSet {
    CommandSet::for_binary("/usr/sbin/asterisk")
}

/// All steps succeed with plausible output.
fn healthy_runner() -> MockRunner {
    let c = commands();
    MockRunner::new()
        .with(&c.channels, "Channel\n3\n1\n42\n")
        .with(&c.uptime, "86400\n3600\n")
        .with(
            &c.peer_summary,
            "2 sip peers [Monitored: 1 online, 1 offline Unmonitored: 0 online, 0 offline]\n",
        )
        .with(&c.threads, "55\n")
        .with(&c.status_unknown, "1\n")
        .with(&c.status_qualified, "1\n")
        .with(&c.peer_detail, PEER_LISTING)
}

fn collector(metrics: Arc<Metrics>, runner: MockRunner) -> Collector {
    Collector::new(metrics, Arc::new(runner), commands(), HOST.to_string())
}

// =============================================================================
// Full cycle
// =============================================================================

#[tokio::test]
async fn test_full_cycle_populates_every_family() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let collector = collector(metrics.clone(), healthy_runner());

    collector.collect_once().await;

    let m = &metrics;
    assert_eq!(
        m.total_active_channels
            .with_label_values(&[HOST, "active channels"])
            .get(),
        3
    );
    assert_eq!(
        m.total_active_calls
            .with_label_values(&[HOST, "active calls"])
            .get(),
        1
    );
    assert_eq!(
        m.total_calls_processed
            .with_label_values(&[HOST, "calls processed"])
            .get(),
        42
    );
    assert_eq!(
        m.system_uptime_seconds
            .with_label_values(&[HOST, "system uptime seconds"])
            .get(),
        86400
    );
    assert_eq!(
        m.last_reload_seconds
            .with_label_values(&[HOST, "last reload seconds"])
            .get(),
        3600
    );
    assert_eq!(
        m.total_sip_peers
            .with_label_values(&[HOST, "total sip peers"])
            .get(),
        2
    );
    assert_eq!(
        m.total_monitored_online
            .with_label_values(&[HOST, "total monitored online"])
            .get(),
        1
    );
    assert_eq!(
        m.total_threads
            .with_label_values(&[HOST, "total threads listed"])
            .get(),
        55
    );
    assert_eq!(
        m.total_sip_status_unknown
            .with_label_values(&[HOST, "total sip status unknown"])
            .get(),
        1
    );
    assert_eq!(
        m.total_sip_status_qualified
            .with_label_values(&[HOST, "total sip status qualified"])
            .get(),
        1
    );

    // Per-peer gauges from the two data rows
    assert_eq!(
        m.sip_peer_status
            .with_label_values(&[HOST, "1000", "192.168.1.5"])
            .get(),
        1
    );
    assert_eq!(
        m.sip_peer_latency_ms
            .with_label_values(&[HOST, "1000", "192.168.1.5"])
            .get(),
        23
    );
    assert_eq!(
        m.sip_peer_port
            .with_label_values(&[HOST, "1000", "192.168.1.5"])
            .get(),
        5060
    );
    assert_eq!(
        m.sip_peer_status
            .with_label_values(&[HOST, "2000", "10.0.0.9"])
            .get(),
        0
    );
    assert_eq!(
        m.sip_peer_port
            .with_label_values(&[HOST, "2000", "10.0.0.9"])
            .get(),
        0
    );
}

#[tokio::test]
async fn test_cycle_is_idempotent_for_peer_metrics() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let collector = collector(metrics.clone(), healthy_runner());

    collector.collect_once().await;
    let first = metrics.export().unwrap();
    collector.collect_once().await;
    let second = metrics.export().unwrap();

    // Same listing twice yields the same peer points, no duplicates
    assert_eq!(
        first.matches("peer_name=\"1000\"").count(),
        second.matches("peer_name=\"1000\"").count()
    );
    assert_eq!(
        metrics
            .sip_peer_latency_ms
            .with_label_values(&[HOST, "1000", "192.168.1.5"])
            .get(),
        23
    );
}

// =============================================================================
// Step isolation and staleness
// =============================================================================

#[tokio::test]
async fn test_failed_step_does_not_block_others() {
    let c = commands();
    let runner = healthy_runner().failing(&c.channels);
    let metrics = Arc::new(Metrics::new().unwrap());
    let collector = collector(metrics.clone(), runner);

    collector.collect_once().await;

    // Channels never written, uptime written, failure counted
    let output = metrics.export().unwrap();
    assert!(!output.contains("asterisk_total_active_channels{"));
    assert_eq!(
        metrics
            .system_uptime_seconds
            .with_label_values(&[HOST, "system uptime seconds"])
            .get(),
        86400
    );
    assert_eq!(
        metrics
            .scrape_step_failures_total
            .with_label_values(&["channels"])
            .get(),
        1
    );
    assert_eq!(metrics.scrape_cycles_total.get(), 1);
}

#[tokio::test]
async fn test_aggregate_metrics_stay_stale_on_failure() {
    let metrics = Arc::new(Metrics::new().unwrap());

    let collector_ok = collector(metrics.clone(), healthy_runner());
    collector_ok.collect_once().await;

    // Second cycle: peer summary command fails, previous values stay visible
    let c = commands();
    let collector_bad = collector(metrics.clone(), healthy_runner().failing(&c.peer_summary));
    collector_bad.collect_once().await;

    assert_eq!(
        metrics
            .total_sip_peers
            .with_label_values(&[HOST, "total sip peers"])
            .get(),
        2
    );
}

#[tokio::test]
async fn test_short_channel_output_skips_without_zeroing() {
    let metrics = Arc::new(Metrics::new().unwrap());

    let collector_ok = collector(metrics.clone(), healthy_runner());
    collector_ok.collect_once().await;

    let c = commands();
    let runner = healthy_runner().with(&c.channels, "Channel\n3\n");
    let collector_short = collector(metrics.clone(), runner);
    collector_short.collect_once().await;

    // No data is not zero observed: the previous value survives
    assert_eq!(
        metrics
            .total_active_channels
            .with_label_values(&[HOST, "active channels"])
            .get(),
        3
    );
}

// =============================================================================
// Clear-then-repopulate
// =============================================================================

#[tokio::test]
async fn test_vanished_peers_disappear_from_next_snapshot() {
    let metrics = Arc::new(Metrics::new().unwrap());

    let collector_ok = collector(metrics.clone(), healthy_runner());
    collector_ok.collect_once().await;
    assert!(metrics.export().unwrap().contains("peer_name=\"1000\""));

    // Next cycle the listing is empty: every per-peer point must vanish,
    // aggregates keep their last written values
    let c = commands();
    let runner = healthy_runner().with(&c.peer_detail, "");
    let collector_empty = collector(metrics.clone(), runner);
    collector_empty.collect_once().await;

    let output = metrics.export().unwrap();
    assert!(!output.contains("peer_name="));
    assert!(output.contains("asterisk_total_sip_peers{"));
}

#[tokio::test]
async fn test_failed_peer_detail_keeps_previous_peers() {
    let metrics = Arc::new(Metrics::new().unwrap());

    let collector_ok = collector(metrics.clone(), healthy_runner());
    collector_ok.collect_once().await;

    // Command failure is not an empty listing: nothing is cleared
    let c = commands();
    let collector_bad = collector(metrics.clone(), healthy_runner().failing(&c.peer_detail));
    collector_bad.collect_once().await;

    assert!(metrics.export().unwrap().contains("peer_name=\"1000\""));
}

#[tokio::test]
async fn test_malformed_rows_dropped_rest_of_batch_processed() {
    let listing = "\
Name/username    Host            Dyn Forcerport Comedia    ACL Port     Status
garbage line
1000             192.168.1.5      D   N  5060     OK (23 ms)
9999  short OK
2000/voip        10.0.0.9         D   N   A    UNKNOWN
";
    let c = commands();
    let runner = healthy_runner().with(&c.peer_detail, listing);
    let metrics = Arc::new(Metrics::new().unwrap());
    let collector = collector(metrics.clone(), runner);

    collector.collect_once().await;

    let output = metrics.export().unwrap();
    assert!(output.contains("peer_name=\"1000\""));
    assert!(output.contains("peer_name=\"2000\""));
    assert!(!output.contains("peer_name=\"9999\""));
}
