// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod kubernetes;
pub mod retry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use error::{ClientError, Result};
pub use kubernetes::{BootstrapClient, ClusterClient, NodeFilter};
