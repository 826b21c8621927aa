// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Certificate signing request listing and approval

use crate::constants::csr::{APPROVAL_SUBRESOURCE, APPROVED, APPROVE_MESSAGE, APPROVE_REASON, DENIED};
use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use k8s_openapi::api::certificates::v1::{
    CertificateSigningRequest, CertificateSigningRequestCondition,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::{
    api::{ListParams, ObjectList, PostParams},
    Api, ResourceExt,
};
use tracing::{debug, error, info, instrument};

fn has_condition(csr: &CertificateSigningRequest, condition_type: &str) -> bool {
    csr.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| conditions.iter().any(|c| c.type_ == condition_type))
}

pub fn is_approved(csr: &CertificateSigningRequest) -> bool {
    has_condition(csr, APPROVED)
}

/// Neither approved nor denied yet
pub fn is_pending(csr: &CertificateSigningRequest) -> bool {
    !has_condition(csr, APPROVED) && !has_condition(csr, DENIED)
}

pub fn approval_condition(now: DateTime<Utc>) -> CertificateSigningRequestCondition {
    CertificateSigningRequestCondition {
        type_: APPROVED.to_string(),
        status: "True".to_string(),
        reason: Some(APPROVE_REASON.to_string()),
        message: Some(APPROVE_MESSAGE.to_string()),
        last_update_time: Some(Time(now)),
        ..Default::default()
    }
}

/// Copy of `csr` with the approval condition appended after any existing ones
pub fn with_approval_condition(
    csr: &CertificateSigningRequest,
    now: DateTime<Utc>,
) -> CertificateSigningRequest {
    let mut approved = csr.clone();
    approved
        .status
        .get_or_insert_with(Default::default)
        .conditions
        .get_or_insert_with(Vec::new)
        .push(approval_condition(now));
    approved
}

#[instrument(skip(api))]
pub async fn list_csrs(
    api: &Api<CertificateSigningRequest>,
) -> Result<ObjectList<CertificateSigningRequest>> {
    let csrs = api.list(&ListParams::default()).await.map_err(|e| {
        error!("Failed to get list of csrs: {}", e);
        ClientError::query("list csrs", e)
    })?;

    debug!("Found {} csrs", csrs.items.len());
    Ok(csrs)
}

/// Approve `csr` through the approval subresource. `csr` should be a fresh
/// snapshot from `list_csrs`; a stale resource version comes back as a conflict.
#[instrument(skip(api, csr), fields(csr = %csr.name_any()))]
pub async fn approve_csr(
    api: &Api<CertificateSigningRequest>,
    csr: &CertificateSigningRequest,
) -> Result<CertificateSigningRequest> {
    let Some(name) = csr.metadata.name.clone() else {
        return Err(ClientError::InvalidCsr(
            "certificate signing request has no name".to_string(),
        ));
    };

    let approved = with_approval_condition(csr, Utc::now());
    let data = serde_json::to_vec(&approved)?;

    let result = api
        .replace_subresource(APPROVAL_SUBRESOURCE, &name, &PostParams::default(), data)
        .await
        .map_err(|e| {
            error!("Failed to approve csr {}: {}", name, e);
            ClientError::Approval {
                csr: name.clone(),
                source: e,
            }
        })?;

    info!("Approved csr {}", name);
    Ok(result)
}
