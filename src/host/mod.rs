// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host operations consumed by the bootstrap client.
//!
//! Only privileged command execution is needed here; disk, reboot and log
//! upload operations live with the orchestrator.

pub mod log_writer;
pub mod process;
pub mod recording;

pub use log_writer::LogWriter;
pub use process::ProcessExecutor;
pub use recording::{RecordedCommand, RecordingExecutor};

use async_trait::async_trait;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `code` is `None` when the process was killed by a signal
    #[error("{command} exited with code {}: {stderr}", .code.unwrap_or(-1))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Executes commands on the host with elevated privileges.
#[async_trait]
pub trait HostOps: Send + Sync {
    /// Run `command` with `args`, streaming stdout into `log_sink` as it
    /// arrives. Returns the captured stdout.
    async fn exec_privileged(
        &self,
        log_sink: &mut (dyn Write + Send),
        command: &str,
        args: &[String],
    ) -> Result<String, ExecError>;
}
