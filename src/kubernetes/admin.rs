// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Runs the cluster administration tool on the host with the bootstrap kubeconfig

use crate::constants::admin::COMMAND;
use crate::error::Result;
use crate::host::{HostOps, LogWriter};
use tracing::{info, instrument};

/// `args` with `--kubeconfig=<path>` in front
pub fn admin_command_args(args: &[String], kubeconfig_path: &str) -> Vec<String> {
    std::iter::once(format!("--kubeconfig={}", kubeconfig_path))
        .chain(args.iter().cloned())
        .collect()
}

/// Run the admin tool through `executor`, streaming its output into the log.
/// Executor failures are returned as they are.
#[instrument(skip(executor))]
pub async fn run_admin_command(
    args: &[String],
    kubeconfig_path: &str,
    executor: &dyn HostOps,
) -> Result<String> {
    info!("Running {} command with args {:?}", COMMAND, args);

    let full_args = admin_command_args(args, kubeconfig_path);
    let mut sink = LogWriter::new();
    let output = executor.exec_privileged(&mut sink, COMMAND, &full_args).await?;

    Ok(output)
}
