// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bootstrap cluster connection and the client facade

use crate::error::{ClientError, EtcdPatchAction, Result};
use crate::host::HostOps;
use crate::kubernetes::{admin, csr, etcd, nodes, pods, NodeFilter};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::etcd::{Etcd, EtcdOverrideState};
use async_trait::async_trait;
use k8s_openapi::api::certificates::v1::CertificateSigningRequest;
use k8s_openapi::api::core::v1::{ConfigMap, Node, Pod};
use kube::{
    api::ObjectList,
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config as KConfig,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use tracing::{info, instrument};

const STAGE_LOAD: &str = "loading kubeconfig";
const STAGE_CLIENT: &str = "creating a Kubernetes client";
const STAGE_OPERATOR_CLIENT: &str = "creating an operator client";

/// Everything the bootstrap orchestrator needs from the cluster.
#[async_trait]
pub trait BootstrapClient: Send + Sync {
    async fn list_nodes(&self, filter: NodeFilter) -> Result<ObjectList<Node>>;

    async fn list_master_nodes(&self) -> Result<ObjectList<Node>> {
        self.list_nodes(NodeFilter::MasterRoleOnly).await
    }

    async fn list_all_nodes(&self) -> Result<ObjectList<Node>> {
        self.list_nodes(NodeFilter::All).await
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap>;

    /// Pods in `namespace`, restricted to those carrying every label in `label_match`
    async fn list_pods(
        &self,
        namespace: &str,
        label_match: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<Pod>>;

    /// Logs of `pod_name`; `since_seconds <= 0` means the whole log
    async fn get_pod_logs(&self, namespace: &str, pod_name: &str, since_seconds: i64)
        -> Result<String>;

    async fn list_csrs(&self) -> Result<ObjectList<CertificateSigningRequest>>;

    /// Approve a CSR snapshot obtained from `list_csrs`. Never retried.
    async fn approve_csr(&self, csr: &CertificateSigningRequest)
        -> Result<CertificateSigningRequest>;

    async fn enable_unsafe_etcd_override(&self) -> Result<()>;

    async fn disable_unsafe_etcd_override(&self) -> Result<()>;

    async fn etcd_override_state(&self) -> Result<EtcdOverrideState>;

    async fn run_admin_command(
        &self,
        args: &[String],
        kubeconfig_path: &str,
        executor: &dyn HostOps,
    ) -> Result<String>;
}

/// Connection to the API server through the bootstrap kubeconfig.
///
/// Holds a general resource client and an operator resource client built from
/// the same credentials, plus the CSR api derived from the general client.
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
    operator_client: Client,
    csrs: Api<CertificateSigningRequest>,
    retry: RetryPolicy,
}

impl ClusterClient {
    /// Connect using the kubeconfig at `config_path`. Fails as a whole if any
    /// stage fails; the error names the stage.
    #[instrument(skip_all, fields(kubeconfig = %config_path.as_ref().display()))]
    pub async fn connect(config_path: impl AsRef<Path>) -> Result<Self> {
        let config = load_config(config_path.as_ref()).await?;

        let client =
            Client::try_from(config.clone()).map_err(|e| ClientError::config(STAGE_CLIENT, e))?;
        let operator_client =
            Client::try_from(config).map_err(|e| ClientError::config(STAGE_OPERATOR_CLIENT, e))?;

        info!("Connected to Kubernetes cluster");
        Ok(Self::from_clients(client, operator_client))
    }

    pub fn from_clients(client: Client, operator_client: Client) -> Self {
        let csrs = Api::all(client.clone());
        Self {
            client,
            operator_client,
            csrs,
            retry: RetryPolicy::none(),
        }
    }

    /// Retry policy for idempotent calls
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn etcds(&self) -> Api<Etcd> {
        Api::all(self.operator_client.clone())
    }

    async fn retrying<T, F, Fut>(&self, operation: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        retry_with_backoff(&self.retry, operation, ClientError::is_transient, op).await
    }
}

/// Reads through kube's own loader so relative certificate paths resolve
/// against the kubeconfig's directory and multi-document files are merged.
async fn load_config(path: &Path) -> Result<KConfig> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| ClientError::config(STAGE_LOAD, e))?;

    KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| ClientError::config(STAGE_LOAD, e))
}

#[async_trait]
impl BootstrapClient for ClusterClient {
    async fn list_nodes(&self, filter: NodeFilter) -> Result<ObjectList<Node>> {
        self.retrying("list nodes", || nodes::list_nodes(&self.client, filter))
            .await
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap> {
        self.retrying("get configmap", || {
            nodes::get_config_map(&self.client, namespace, name)
        })
        .await
    }

    async fn list_pods(
        &self,
        namespace: &str,
        label_match: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<Pod>> {
        self.retrying("list pods", || pods::list_pods(&self.client, namespace, label_match))
            .await
    }

    async fn get_pod_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        since_seconds: i64,
    ) -> Result<String> {
        self.retrying("get pod logs", || {
            pods::get_pod_logs(&self.client, namespace, pod_name, since_seconds)
        })
        .await
    }

    async fn list_csrs(&self) -> Result<ObjectList<CertificateSigningRequest>> {
        self.retrying("list csrs", || csr::list_csrs(&self.csrs)).await
    }

    async fn approve_csr(
        &self,
        csr: &CertificateSigningRequest,
    ) -> Result<CertificateSigningRequest> {
        csr::approve_csr(&self.csrs, csr).await
    }

    async fn enable_unsafe_etcd_override(&self) -> Result<()> {
        let api = self.etcds();
        self.retrying("patch etcd", || etcd::patch_etcd(&api, EtcdPatchAction::Enable))
            .await?;
        Ok(())
    }

    async fn disable_unsafe_etcd_override(&self) -> Result<()> {
        let api = self.etcds();
        self.retrying("unpatch etcd", || etcd::patch_etcd(&api, EtcdPatchAction::Disable))
            .await?;
        Ok(())
    }

    async fn etcd_override_state(&self) -> Result<EtcdOverrideState> {
        let api = self.etcds();
        self.retrying("get etcd override state", || etcd::override_state(&api))
            .await
    }

    async fn run_admin_command(
        &self,
        args: &[String],
        kubeconfig_path: &str,
        executor: &dyn HostOps,
    ) -> Result<String> {
        admin::run_admin_command(args, kubeconfig_path, executor).await
    }
}
