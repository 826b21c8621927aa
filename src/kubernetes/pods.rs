// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod listing and log retrieval

use crate::error::{ClientError, Result};
use futures::{AsyncRead, AsyncReadExt};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{ListParams, LogParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, error, instrument};

/// Render a label set as an equality selector (`k1=v1,k2=v2`, keys sorted)
pub fn label_selector(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn pod_list_params(label_match: Option<&BTreeMap<String, String>>) -> ListParams {
    match label_match {
        Some(labels) if !labels.is_empty() => ListParams::default().labels(&label_selector(labels)),
        _ => ListParams::default(),
    }
}

/// Non-positive windows mean "no limit"
pub fn log_params(since_seconds: i64) -> LogParams {
    LogParams {
        since_seconds: (since_seconds > 0).then_some(since_seconds),
        ..Default::default()
    }
}

#[instrument(skip(client))]
pub async fn list_pods(
    client: &Client,
    namespace: &str,
    label_match: Option<&BTreeMap<String, String>>,
) -> Result<Vec<Pod>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);

    let list = pods.list(&pod_list_params(label_match)).await.map_err(|e| {
        error!("Failed to list pods in {}: {}", namespace, e);
        ClientError::query(format!("list pods in {}", namespace), e)
    })?;

    debug!("Found {} pods in {}", list.items.len(), namespace);
    Ok(list.items)
}

#[instrument(skip(client))]
pub async fn get_pod_logs(
    client: &Client,
    namespace: &str,
    pod_name: &str,
    since_seconds: i64,
) -> Result<String> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);

    let stream = pods
        .log_stream(pod_name, &log_params(since_seconds))
        .await
        .map_err(|e| {
            error!("Failed to open log stream of pod {}/{}: {}", namespace, pod_name, e);
            ClientError::query(format!("get logs of pod {}/{}", namespace, pod_name), e)
        })?;

    drain_logs(stream, pod_name).await
}

/// Read the whole stream into memory. The stream is dropped before returning,
/// and a partial read yields an error rather than truncated logs.
async fn drain_logs<R: AsyncRead>(stream: R, pod_name: &str) -> Result<String> {
    let mut stream = Box::pin(stream);
    let mut buf = Vec::new();

    let read = stream.read_to_end(&mut buf).await;
    drop(stream);

    read.map_err(|source| {
        error!("Failed to read logs of pod {}: {}", pod_name, source);
        ClientError::LogRead {
            pod: pod_name.to_string(),
            source,
        }
    })?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
