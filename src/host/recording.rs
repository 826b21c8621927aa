// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory host executor that records invocations instead of running them

use super::{ExecError, HostOps};
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(String),
    Failure { code: Option<i32>, stderr: String },
}

/// Records every command and answers with a scripted result.
/// Clones share the same recording.
#[derive(Debug, Clone)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<RecordedCommand>>>,
    response: Scripted,
}

impl RecordingExecutor {
    /// Every invocation succeeds with `stdout`
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Scripted::Output(stdout.to_string()),
        }
    }

    /// Every invocation fails with the given exit code and stderr
    pub fn failing(code: i32, stderr: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Scripted::Failure {
                code: Some(code),
                stderr: stderr.to_string(),
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCommand>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.lock().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCommand> {
        self.lock().last().cloned()
    }
}

#[async_trait]
impl HostOps for RecordingExecutor {
    async fn exec_privileged(
        &self,
        log_sink: &mut (dyn Write + Send),
        command: &str,
        args: &[String],
    ) -> Result<String, ExecError> {
        self.lock().push(RecordedCommand {
            command: command.to_string(),
            args: args.to_vec(),
        });

        match &self.response {
            Scripted::Output(stdout) => {
                log_sink
                    .write_all(stdout.as_bytes())
                    .and_then(|_| log_sink.flush())
                    .map_err(|source| ExecError::Io {
                        command: command.to_string(),
                        source,
                    })?;
                Ok(stdout.clone())
            }
            Scripted::Failure { code, stderr } => Err(ExecError::Failed {
                command: command.to_string(),
                code: *code,
                stderr: stderr.clone(),
            }),
        }
    }
}
