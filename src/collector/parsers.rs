//! Line parsers for asterisk CLI output
//!
//! Pure functions, no I/O and no shared state. The CLI output is not a stable
//! schema, so every parser here either returns a documented default or tells
//! the caller to skip the update; none of them panic on garbage input.
//!
//! Skip policies are deliberately distinct:
//! - `Ok(None)` — too little output, skip the write and keep any stale value;
//! - `Err(_)` — output present but malformed, the step fails and is logged;
//! - per-line `None` — one bad row in a listing, dropped without affecting
//!   the rest of the batch.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ExporterError, Result};

/// Decimal substrings anywhere in the peer summary line
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));

/// Parenthesized latency after the peer status, e.g. "(23 ms)"
static LATENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\s*ms\)").expect("static regex"));

/// Parsed `core show channels` block (first column only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSummary {
    pub active_channels: i64,
    pub active_calls: i64,
    pub calls_processed: i64,
}

/// Parsed `core show uptime seconds` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeSummary {
    pub system_uptime_secs: i64,
    pub last_reload_secs: i64,
}

/// Aggregate counts from the `sip show peers` summary line.
///
/// Defaults to all zeros when the summary cannot be parsed; a zeroed peer
/// count is visibly anomalous on a dashboard, a crashed collector is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeerCounts {
    pub total: i64,
    pub monitored_online: i64,
    pub monitored_offline: i64,
    pub unmonitored_online: i64,
    pub unmonitored_offline: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    Ok,
    Unknown,
}

impl PeerStatus {
    /// Gauge encoding: 1 = OK, 0 = not OK
    pub fn as_gauge_value(self) -> i64 {
        match self {
            PeerStatus::Ok => 1,
            PeerStatus::Unknown => 0,
        }
    }
}

/// One row of the `sip show peers` listing.
///
/// Constructed from a single line, consumed immediately into the per-peer
/// gauges, never retained across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub name: String,
    pub host: String,
    pub status: PeerStatus,
    pub latency_ms: i64,
    pub port: i64,
}

/// Parse the `core show channels` block (post-processed to one value per
/// line; line 1 is a header, lines 2-4 carry the three counters).
///
/// Returns `Ok(None)` when fewer than 4 lines are present: no data is not
/// the same as zero observed, so the previous values stay visible.
pub fn parse_channel_summary(output: &str) -> Result<Option<ChannelSummary>> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() < 4 {
        return Ok(None);
    }

    let parse = |line: &str| -> Result<i64> {
        line.trim().parse::<i64>().map_err(|_| {
            ExporterError::output_parse(format!("expected integer, got {:?}", line.trim()))
        })
    };

    Ok(Some(ChannelSummary {
        active_channels: parse(lines[1])?,
        active_calls: parse(lines[2])?,
        calls_processed: parse(lines[3])?,
    }))
}

/// Parse the `core show uptime seconds` block (uptime on line 1, seconds
/// since reload on line 2). Same skip contract as the channel summary.
pub fn parse_uptime(output: &str) -> Result<Option<UptimeSummary>> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() < 2 {
        return Ok(None);
    }

    let parse = |line: &str| -> Result<i64> {
        line.trim().parse::<i64>().map_err(|_| {
            ExporterError::output_parse(format!("expected integer, got {:?}", line.trim()))
        })
    };

    Ok(Some(UptimeSummary {
        system_uptime_secs: parse(lines[0])?,
        last_reload_secs: parse(lines[1])?,
    }))
}

/// Extract the five aggregate counts from the peer summary line.
///
/// Deliberately a loose scan for the first 5 decimal substrings rather than a
/// column parse; the exact wording of the summary line varies between
/// asterisk versions. Fewer than 5 numbers yields the all-zero default,
/// never a partial result.
pub fn parse_peer_counts(output: &str) -> PeerCounts {
    let mut numbers = [0i64; 5];
    let mut found = 0;

    for m in NUMBER_RE.find_iter(output).take(5) {
        match m.as_str().parse::<i64>() {
            Ok(n) => {
                numbers[found] = n;
                found += 1;
            }
            Err(_) => return PeerCounts::default(),
        }
    }

    if found < 5 {
        return PeerCounts::default();
    }

    PeerCounts {
        total: numbers[0],
        monitored_online: numbers[1],
        monitored_offline: numbers[2],
        unmonitored_online: numbers[3],
        unmonitored_offline: numbers[4],
    }
}

/// Parse command output that should be a single non-negative number
/// (thread count, grep|wc pipelines). Anything else means skip the write.
pub fn parse_count(output: &str) -> Option<i64> {
    let trimmed = output.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse one row of the `sip show peers` listing.
///
/// Returns `None` for anything that is not a peer data row: headers,
/// separator decoration, the summary line, or rows whose status is neither
/// `OK` nor `UNKNOWN`. A malformed row never aborts the batch.
pub fn parse_peer_line(line: &str) -> Option<PeerRecord> {
    // Header and separator decoration
    if line.contains("Name/username") || line.contains("--------") {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();

    // Minimum required fields for a real data row
    if parts.len() < 6 {
        return None;
    }

    let status_index = parts.iter().position(|p| *p == "OK" || *p == "UNKNOWN")?;
    let status = if parts[status_index] == "OK" {
        PeerStatus::Ok
    } else {
        PeerStatus::Unknown
    };

    // Name up to any channel-technology suffix, host verbatim
    let name = parts[0].split('/').next()?.to_string();
    let host = parts[1].to_string();

    // The port, when listed, sits immediately before the status. Scan at
    // most 2 tokens right-to-left and never token 0; widening this would
    // start reclassifying unrelated digits as ports.
    let mut port = 0;
    let scan_from = status_index.saturating_sub(2).max(1);
    for i in (scan_from..status_index).rev() {
        if parts[i].bytes().all(|b| b.is_ascii_digit()) {
            port = parts[i].parse().ok()?;
            break;
        }
    }

    // Qualified peers report round-trip latency after the status
    let mut latency_ms = 0;
    if status == PeerStatus::Ok && parts.len() > status_index + 1 {
        let tail = parts[status_index..].join(" ");
        if let Some(caps) = LATENCY_RE.captures(&tail) {
            latency_ms = caps.get(1)?.as_str().parse().ok()?;
        }
    }

    Some(PeerRecord {
        name,
        host,
        status,
        latency_ms,
        port,
    })
}
