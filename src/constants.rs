// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Node label selectors
pub mod labels {
    /// Presence selector matching control-plane nodes
    pub const MASTER_ROLE: &str = "node-role.kubernetes.io/master";
}

/// CSR approval condition fields
pub mod csr {
    pub const APPROVED: &str = "Approved";
    pub const DENIED: &str = "Denied";
    pub const APPROVE_REASON: &str = "NodeCSRApprove";
    pub const APPROVE_MESSAGE: &str = "This CSR was approved by the assisted-installer-controller";
    /// Subresource the approval condition has to be written through
    pub const APPROVAL_SUBRESOURCE: &str = "approval";
}

/// etcd operator override
pub mod etcd {
    /// Name of the singleton etcd operator resource
    pub const RESOURCE_NAME: &str = "cluster";
    pub const UNSAFE_NON_HA_KEY: &str = "useUnsupportedUnsafeNonHANonProductionUnstableEtcd";
}

/// Privileged command execution
pub mod admin {
    /// Administration tool invoked through the host executor
    pub const COMMAND: &str = "oc";
    /// Prefix that enters the host's mount and IPC namespaces
    pub const NSENTER_PREFIX: &[&str] = &["nsenter", "-t", "1", "-m", "-i", "--"];
}

/// Retry defaults
pub mod retry {
    pub const MAX_ATTEMPTS: u32 = 1;
    pub const INITIAL_DELAY_MS: u64 = 500;
    pub const MAX_DELAY_MS: u64 = 10_000;
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
}
