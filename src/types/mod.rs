// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types the bootstrap client talks to.

pub mod etcd;

pub use etcd::{Etcd, EtcdOverrideState, EtcdSpec};
