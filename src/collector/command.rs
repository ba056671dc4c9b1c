//! Bounded-time external command invocation
//!
//! The asterisk CLI is reached through `sh -c` so the default command set can
//! keep its awk/grep post-processing. Every invocation runs under a timeout;
//! a hung command costs one cycle step, never the process.

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::{ExporterError, Result};

/// Runs one administrative command and captures its stdout.
///
/// Behind a trait so the collector can be driven by canned output in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<String>;
}

/// Production runner: `sh -c <command>` with a per-invocation time budget.
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<String> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new("sh")
                .arg("-c")
                .arg(command)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            ExporterError::command_timeout(format!(
                "command exceeded {}s budget: {}",
                self.timeout.as_secs(),
                command
            ))
        })??;

        if !output.status.success() {
            return Err(ExporterError::command_failed(format!(
                "exit status {:?}: {}",
                output.status.code(),
                command
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The administrative subcommands one cycle walks through, with their shell
/// post-processing. Built from the configured asterisk binary path.
#[derive(Debug, Clone)]
pub struct CommandSet {
    pub channels: String,
    pub uptime: String,
    pub peer_summary: String,
    pub threads: String,
    pub status_unknown: String,
    pub status_qualified: String,
    pub peer_detail: String,
}

impl CommandSet {
    pub fn for_binary(binary: &str) -> Self {
        Self {
            channels: format!("{binary} -rx 'core show channels' | awk '{{print $1}}'"),
            uptime: format!("{binary} -rx 'core show uptime seconds' | awk '{{print $3}}'"),
            peer_summary: format!(
                "{binary} -rx 'sip show peers' | grep 'sip peers' | grep 'Monitored' | grep 'Unmonitored'"
            ),
            threads: format!("{binary} -rx 'core show threads' | tail -1 | cut -d' ' -f1"),
            status_unknown: format!(
                "{binary} -rx 'sip show peers' | grep -P '^\\d{{3,}}.*UNKNOWN\\s' | wc -l"
            ),
            status_qualified: format!(
                "{binary} -rx 'sip show peers' | grep -P '^\\d{{3,}}.*OK\\s\\(\\d+' | wc -l"
            ),
            peer_detail: format!("{binary} -rx 'sip show peers'"),
        }
    }
}
