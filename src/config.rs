// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::retry::{INITIAL_DELAY_MS, MAX_ATTEMPTS, MAX_DELAY_MS};
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Bootstrap client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the bootstrap kubeconfig
    pub kubeconfig_path: PathBuf,
    pub retry: RetryPolicy,
    /// Run host commands inside the host namespaces via nsenter
    pub privileged_exec: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kubeconfig_path = lookup("KUBECONFIG")
            .map(PathBuf::from)
            .context("KUBECONFIG environment variable not set")?;

        let retry = RetryPolicy {
            max_attempts: parse_var(&lookup, "RETRY_MAX_ATTEMPTS", MAX_ATTEMPTS)?,
            initial_delay: Duration::from_millis(parse_var(
                &lookup,
                "RETRY_INITIAL_DELAY_MS",
                INITIAL_DELAY_MS,
            )?),
            max_delay: Duration::from_millis(parse_var(&lookup, "RETRY_MAX_DELAY_MS", MAX_DELAY_MS)?),
            ..RetryPolicy::none()
        };

        let privileged_exec: bool = lookup("PRIVILEGED_EXEC")
            .unwrap_or("true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Config {
            kubeconfig_path,
            retry,
            privileged_exec,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, value)),
        None => Ok(default),
    }
}
