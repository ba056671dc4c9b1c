//! Exporter metrics registry
//!
//! Defines all Prometheus metrics exposed by the exporter. The registry is an
//! explicitly owned object shared via `Arc` between the collector task and
//! the HTTP handlers, not a process-wide global.

use parking_lot::{Mutex, MutexGuard};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::errors::Result;

/// Labels shared by every aggregate gauge
const HOST_TYPE_LABELS: &[&str] = &["host", "type"];
/// Labels on the per-peer gauges
const PEER_LABELS: &[&str] = &["host", "peer_name", "peer_host"];

/// Exporter metrics container
pub struct Metrics {
    /// Internal Prometheus registry
    registry: Registry,

    /// Serializes whole write batches against snapshot reads, so a scrape
    /// never observes the per-peer gauges between reset and repopulation.
    write_gate: Mutex<()>,

    // ===== Channel and call metrics =====
    pub total_active_channels: IntGaugeVec,
    pub total_active_calls: IntGaugeVec,
    pub total_calls_processed: IntGaugeVec,

    // ===== System metrics =====
    pub system_uptime_seconds: IntGaugeVec,
    pub last_reload_seconds: IntGaugeVec,
    pub total_threads: IntGaugeVec,

    // ===== SIP aggregate metrics =====
    pub total_sip_peers: IntGaugeVec,
    pub total_monitored_online: IntGaugeVec,
    pub total_monitored_offline: IntGaugeVec,
    pub total_unmonitored_online: IntGaugeVec,
    pub total_unmonitored_offline: IntGaugeVec,
    pub total_sip_status_unknown: IntGaugeVec,
    pub total_sip_status_qualified: IntGaugeVec,

    // ===== Per-peer metrics (reset and repopulated every cycle) =====
    pub sip_peer_status: IntGaugeVec,
    pub sip_peer_latency_ms: IntGaugeVec,
    pub sip_peer_port: IntGaugeVec,

    // ===== Exporter self-observation =====
    pub build_info: IntGaugeVec,
    pub scrape_cycles_total: IntCounter,
    pub scrape_step_failures_total: IntCounterVec,
}

fn gauge_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> Result<IntGaugeVec> {
    let gauge = IntGaugeVec::new(Opts::new(name, help), labels)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let total_active_channels = gauge_vec(
            &registry,
            "asterisk_total_active_channels",
            "Total current active channels",
            HOST_TYPE_LABELS,
        )?;
        let total_active_calls = gauge_vec(
            &registry,
            "asterisk_total_active_calls",
            "Total current active calls",
            HOST_TYPE_LABELS,
        )?;
        let total_calls_processed = gauge_vec(
            &registry,
            "asterisk_total_calls_processed",
            "Total current calls processed",
            HOST_TYPE_LABELS,
        )?;

        let system_uptime_seconds = gauge_vec(
            &registry,
            "asterisk_system_uptime_seconds",
            "System uptime in seconds",
            HOST_TYPE_LABELS,
        )?;
        let last_reload_seconds = gauge_vec(
            &registry,
            "asterisk_last_reload_seconds",
            "Seconds since last reload",
            HOST_TYPE_LABELS,
        )?;
        let total_threads = gauge_vec(
            &registry,
            "asterisk_total_threads",
            "Total threads listed",
            HOST_TYPE_LABELS,
        )?;

        let total_sip_peers = gauge_vec(
            &registry,
            "asterisk_total_sip_peers",
            "Total SIP peers",
            HOST_TYPE_LABELS,
        )?;
        let total_monitored_online = gauge_vec(
            &registry,
            "asterisk_total_monitored_online",
            "Total monitored online peers",
            HOST_TYPE_LABELS,
        )?;
        let total_monitored_offline = gauge_vec(
            &registry,
            "asterisk_total_monitored_offline",
            "Total monitored offline peers",
            HOST_TYPE_LABELS,
        )?;
        let total_unmonitored_online = gauge_vec(
            &registry,
            "asterisk_total_unmonitored_online",
            "Total unmonitored online peers",
            HOST_TYPE_LABELS,
        )?;
        let total_unmonitored_offline = gauge_vec(
            &registry,
            "asterisk_total_unmonitored_offline",
            "Total unmonitored offline peers",
            HOST_TYPE_LABELS,
        )?;
        let total_sip_status_unknown = gauge_vec(
            &registry,
            "asterisk_total_sip_status_unknown",
            "Total SIP peers with unknown status",
            HOST_TYPE_LABELS,
        )?;
        let total_sip_status_qualified = gauge_vec(
            &registry,
            "asterisk_total_sip_status_qualified",
            "Total SIP peers with qualified status",
            HOST_TYPE_LABELS,
        )?;

        let sip_peer_status = gauge_vec(
            &registry,
            "asterisk_sip_peer_status",
            "Status of SIP peer (1=OK, 0=not OK)",
            PEER_LABELS,
        )?;
        let sip_peer_latency_ms = gauge_vec(
            &registry,
            "asterisk_sip_peer_latency_ms",
            "SIP peer latency in milliseconds",
            PEER_LABELS,
        )?;
        let sip_peer_port = gauge_vec(
            &registry,
            "asterisk_sip_peer_port",
            "SIP peer port number",
            PEER_LABELS,
        )?;

        let build_info = gauge_vec(
            &registry,
            "asterisk_exporter_build_info",
            "Build information of the exporter",
            &["version"],
        )?;
        build_info
            .with_label_values(&[env!("CARGO_PKG_VERSION")])
            .set(1);

        let scrape_cycles_total = IntCounter::new(
            "asterisk_exporter_scrape_cycles_total",
            "Collection cycles completed since startup",
        )?;
        registry.register(Box::new(scrape_cycles_total.clone()))?;

        let scrape_step_failures_total = IntCounterVec::new(
            Opts::new(
                "asterisk_exporter_scrape_step_failures_total",
                "Collection steps that failed, by step",
            ),
            &["step"],
        )?;
        registry.register(Box::new(scrape_step_failures_total.clone()))?;

        Ok(Self {
            registry,
            write_gate: Mutex::new(()),
            total_active_channels,
            total_active_calls,
            total_calls_processed,
            system_uptime_seconds,
            last_reload_seconds,
            total_threads,
            total_sip_peers,
            total_monitored_online,
            total_monitored_offline,
            total_unmonitored_online,
            total_unmonitored_offline,
            total_sip_status_unknown,
            total_sip_status_qualified,
            sip_peer_status,
            sip_peer_latency_ms,
            sip_peer_port,
            build_info,
            scrape_cycles_total,
            scrape_step_failures_total,
        })
    }

    /// Acquire the write gate for one batch of mutations.
    ///
    /// The collector holds the returned guard across the reset-then-set pass
    /// over the per-peer gauges; `export` takes the same lock, so a scrape
    /// sees either the previous cycle's peers or the current one's, never the
    /// gap in between.
    pub fn write_batch(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock()
    }

    /// Remove every point currently stored under the three per-peer metrics.
    ///
    /// Call only while holding the `write_batch` guard.
    pub fn reset_peer_metrics(&self) {
        self.sip_peer_status.reset();
        self.sip_peer_latency_ms.reset();
        self.sip_peer_port.reset();
    }

    /// Export a consistent snapshot in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let _gate = self.write_gate.lock();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| crate::errors::ExporterError::output_parse(e.to_string()))
    }
}
