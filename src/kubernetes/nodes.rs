// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Node and ConfigMap queries

use crate::constants::labels::MASTER_ROLE;
use crate::error::{ClientError, Result};
use k8s_openapi::api::core::v1::{ConfigMap, Node};
use kube::{
    api::{ListParams, ObjectList},
    Api, Client,
};
use tracing::{debug, error, instrument};

/// Which nodes a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFilter {
    All,
    /// Only nodes carrying the master role label
    MasterRoleOnly,
}

impl NodeFilter {
    pub fn list_params(self) -> ListParams {
        match self {
            NodeFilter::All => ListParams::default(),
            NodeFilter::MasterRoleOnly => ListParams::default().labels(MASTER_ROLE),
        }
    }
}

#[instrument(skip(client))]
pub async fn list_nodes(client: &Client, filter: NodeFilter) -> Result<ObjectList<Node>> {
    let nodes: Api<Node> = Api::all(client.clone());

    let list = nodes.list(&filter.list_params()).await.map_err(|e| {
        error!("Failed to list nodes ({:?}): {}", filter, e);
        ClientError::query("list nodes", e)
    })?;

    debug!("Found {} nodes", list.items.len());
    Ok(list)
}

#[instrument(skip(client))]
pub async fn get_config_map(client: &Client, namespace: &str, name: &str) -> Result<ConfigMap> {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);

    config_maps.get(name).await.map_err(|e| {
        error!("Failed to get configmap {}/{}: {}", namespace, name, e);
        ClientError::query(format!("get configmap {}/{}", namespace, name), e)
    })
}
