// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Temporary unsafe non-HA override on the etcd operator.
//!
//! Used while a cluster has fewer control-plane members than etcd quorum
//! needs. Both directions are JSON merge patches that only touch
//! `spec.unsupportedConfigOverrides`, so re-applying either one is harmless.
//! The calls return once the API server accepts the patch, not once etcd
//! has reconciled.

use crate::constants::etcd::{RESOURCE_NAME, UNSAFE_NON_HA_KEY};
use crate::error::{ClientError, EtcdPatchAction, Result};
use crate::types::etcd::{Etcd, EtcdOverrideState};
use kube::{
    api::{Patch, PatchParams},
    Api,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

/// Merge patch body for `action`
pub fn override_patch(action: EtcdPatchAction) -> Value {
    match action {
        EtcdPatchAction::Enable => json!({
            "spec": { "unsupportedConfigOverrides": { UNSAFE_NON_HA_KEY: true } }
        }),
        EtcdPatchAction::Disable => json!({
            "spec": { "unsupportedConfigOverrides": null }
        }),
    }
}

#[instrument(skip(api))]
pub async fn patch_etcd(api: &Api<Etcd>, action: EtcdPatchAction) -> Result<Etcd> {
    match action {
        EtcdPatchAction::Enable => info!("Patching etcd"),
        EtcdPatchAction::Disable => info!("UnPatching etcd"),
    }

    let patch = override_patch(action);
    let etcd = api
        .patch(RESOURCE_NAME, &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .map_err(|e| {
            error!("{}: {}", action, e);
            ClientError::Patch { action, source: e }
        })?;

    info!(
        "etcd override is now {:?} (resourceVersion {:?})",
        etcd.override_state(),
        etcd.metadata.resource_version
    );
    Ok(etcd)
}

pub async fn override_state(api: &Api<Etcd>) -> Result<EtcdOverrideState> {
    let etcd = api.get(RESOURCE_NAME).await.map_err(|e| {
        error!("Failed to get etcd operator resource: {}", e);
        ClientError::query("get etcd operator resource", e)
    })?;

    let state = etcd.override_state();
    debug!("etcd override state: {:?}", state);
    Ok(state)
}
