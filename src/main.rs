// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use clusterboot::config::Config;
use clusterboot::host::ProcessExecutor;
use clusterboot::kubernetes::csr::is_pending;
use clusterboot::{BootstrapClient, ClusterClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting clusterboot diagnostics");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: kubeconfig={}, retry_attempts={}",
        config.kubeconfig_path.display(),
        config.retry.max_attempts
    );

    let client = ClusterClient::connect(&config.kubeconfig_path)
        .await
        .context("Failed to connect to the bootstrap cluster")?
        .with_retry(config.retry.clone());

    let nodes = client.list_all_nodes().await.context("Failed to list nodes")?;
    let masters = client
        .list_master_nodes()
        .await
        .context("Failed to list master nodes")?;
    info!(
        "Cluster has {} nodes, {} of them masters",
        nodes.items.len(),
        masters.items.len()
    );

    let csrs = client.list_csrs().await.context("Failed to list csrs")?;
    let pending = csrs.items.iter().filter(|csr| is_pending(csr)).count();
    info!("{} csrs, {} pending approval", csrs.items.len(), pending);

    match client.etcd_override_state().await {
        Ok(state) => info!("etcd override state: {:?}", state),
        Err(e) if e.is_not_found() => warn!("No etcd operator resource in this cluster"),
        Err(e) => error!("Failed to read etcd override state: {}", e),
    }

    let executor = if config.privileged_exec {
        ProcessExecutor::privileged()
    } else {
        ProcessExecutor::direct()
    };
    let kubeconfig = config.kubeconfig_path.to_string_lossy();
    match client
        .run_admin_command(&["get".to_string(), "nodes".to_string()], &kubeconfig, &executor)
        .await
    {
        Ok(_) => info!("Admin command completed"),
        Err(e) => warn!("Admin command failed: {}", e),
    }

    Ok(())
}
