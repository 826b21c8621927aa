// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::etcd::UNSAFE_NON_HA_KEY;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The cluster-scoped etcd operator configuration (`etcds.operator.openshift.io`).
/// Only the fields the bootstrap flow reads are modelled; anything else the
/// server returns is ignored and never written back.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "operator.openshift.io", version = "v1", kind = "Etcd", plural = "etcds")]
#[serde(rename_all = "camelCase")]
pub struct EtcdSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported_config_overrides: Option<Value>,
}

/// Whether the unsafe non-HA override is in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtcdOverrideState {
    Normal,
    Overridden,
}

impl Etcd {
    pub fn override_state(&self) -> EtcdOverrideState {
        let enabled = self
            .spec
            .unsupported_config_overrides
            .as_ref()
            .and_then(|o| o.get(UNSAFE_NON_HA_KEY))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if enabled {
            EtcdOverrideState::Overridden
        } else {
            EtcdOverrideState::Normal
        }
    }
}
