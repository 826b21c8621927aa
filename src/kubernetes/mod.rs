// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes operations used during cluster bootstrap: node and pod queries,
//! CSR approval, the etcd override and the admin command bridge.

pub mod admin;
pub mod client;
pub mod csr;
pub mod etcd;
pub mod nodes;
pub mod pods;

pub use admin::run_admin_command;
pub use client::{BootstrapClient, ClusterClient};
pub use nodes::NodeFilter;
