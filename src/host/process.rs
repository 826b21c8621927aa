// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host command execution backed by real OS processes

use super::{ExecError, HostOps};
use crate::constants::admin::NSENTER_PREFIX;
use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Runs commands as child processes. In privileged mode the command is
/// wrapped in `nsenter` so it executes inside the host's namespaces.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    prefix: Vec<String>,
}

impl ProcessExecutor {
    /// Enter the host's mount and IPC namespaces (PID 1) before running
    pub fn privileged() -> Self {
        Self {
            prefix: NSENTER_PREFIX.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Run the command as is, in the current namespaces
    pub fn direct() -> Self {
        Self { prefix: Vec::new() }
    }

    /// Full program and argument list that will be spawned
    pub fn command_line(&self, command: &str, args: &[String]) -> (String, Vec<String>) {
        let mut full: Vec<String> = self.prefix.clone();
        full.push(command.to_string());
        full.extend(args.iter().cloned());
        let program = full.remove(0);
        (program, full)
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::privileged()
    }
}

async fn pump_stdout<R: AsyncRead + Unpin>(
    mut reader: R,
    sink: &mut (dyn Write + Send),
) -> std::io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        sink.write_all(&chunk[..n])?;
        captured.extend_from_slice(&chunk[..n]);
    }
    sink.flush()?;
    Ok(captured)
}

#[async_trait]
impl HostOps for ProcessExecutor {
    #[instrument(skip(self, log_sink, args))]
    async fn exec_privileged(
        &self,
        log_sink: &mut (dyn Write + Send),
        command: &str,
        args: &[String],
    ) -> Result<String, ExecError> {
        let (program, full_args) = self.command_line(command, args);
        debug!("Executing {} {:?}", program, full_args);

        let mut child = Command::new(&program)
            .args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let io_err = |source| ExecError::Io {
            command: command.to_string(),
            source,
        };

        let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(io_err(std::io::Error::other("child pipes were not captured")));
        };

        let read_stderr = async {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let (stdout_bytes, stderr_bytes) =
            tokio::try_join!(pump_stdout(stdout, log_sink), read_stderr).map_err(io_err)?;
        let status = child.wait().await.map_err(io_err)?;

        if !status.success() {
            return Err(ExecError::Failed {
                command: command.to_string(),
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr_bytes).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout_bytes).into_owned())
    }
}
