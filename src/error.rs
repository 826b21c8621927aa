// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::host::ExecError;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of the etcd override transition failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtcdPatchAction {
    Enable,
    Disable,
}

impl fmt::Display for EtcdPatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtcdPatchAction::Enable => f.write_str("Failed to patch etcd"),
            EtcdPatchAction::Disable => f.write_str("Failed to unpatch etcd"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{stage}: {source}")]
    Config {
        stage: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Failed to {operation}: {source}")]
    Query {
        operation: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to read logs of pod {pod}: {source}")]
    LogRead {
        pod: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to approve csr {csr}: {source}")]
    Approval {
        csr: String,
        #[source]
        source: kube::Error,
    },

    #[error("Invalid csr: {0}")]
    InvalidCsr(String),

    #[error("{action}: {source}")]
    Patch {
        action: EtcdPatchAction,
        #[source]
        source: kube::Error,
    },

    #[error(transparent)]
    Execution(#[from] ExecError),

    #[error("Failed to encode request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn config(stage: &'static str, source: impl Into<BoxError>) -> Self {
        ClientError::Config {
            stage,
            source: source.into(),
        }
    }

    pub(crate) fn query(operation: impl Into<String>, source: kube::Error) -> Self {
        ClientError::Query {
            operation: operation.into(),
            source,
        }
    }

    fn kube_source(&self) -> Option<&kube::Error> {
        match self {
            ClientError::Query { source, .. }
            | ClientError::Approval { source, .. }
            | ClientError::Patch { source, .. } => Some(source),
            _ => None,
        }
    }

    fn api_code(&self) -> Option<u16> {
        match self.kube_source() {
            Some(kube::Error::Api(resp)) => Some(resp.code),
            _ => None,
        }
    }

    /// The API server rejected the write because the object changed underneath it
    pub fn is_conflict(&self) -> bool {
        self.api_code() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.api_code() == Some(404)
    }

    /// Errors worth another attempt while the API server is still converging
    pub fn is_transient(&self) -> bool {
        match self.kube_source() {
            Some(kube::Error::Api(resp)) => resp.code == 429 || resp.code >= 500,
            Some(kube::Error::HyperError(_)) | Some(kube::Error::Service(_)) => true,
            _ => matches!(self, ClientError::LogRead { .. }),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
