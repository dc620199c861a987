// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "/etc/gateway-supervisor/gateway.yaml";

pub const DEFAULT_READY_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    18080
}

fn default_ready_timeout_ms() -> u64 {
    DEFAULT_READY_TIMEOUT_MS
}

fn default_stop_timeout_ms() -> u64 {
    DEFAULT_STOP_TIMEOUT_MS
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Bind port handed to the gateway via `GATEWAY_PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    /// How long `start()` waits for the readiness sentinel.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    /// Grace period between SIGTERM and SIGKILL during `stop()`.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub environment_file: Option<String>,
    pub working_dir: Option<String>,
    pub runtime: RuntimeConfig,
}

/// Resolution policy as data: artifact locations plus a ranked interpreter
/// candidate list, evaluated by existence-check at every `start()`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    pub compiled_artifact: PathBuf,
    pub source_artifact: PathBuf,
    /// Host executable names that can run the source artifact directly.
    #[serde(default)]
    pub source_runtimes: Vec<String>,
    #[serde(default)]
    pub candidates: Vec<RuntimeCandidate>,
    /// Interpreter name looked up on PATH as the last resort.
    pub fallback_runtime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeCandidate {
    pub path: PathBuf,
    /// Whether this interpreter runs the source artifact (vs the compiled one).
    #[serde(default)]
    pub runs_source: bool,
}

impl GatewayConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

pub fn config_path() -> PathBuf {
    std::env::var("GATEWAY_SUPERVISOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_config(path: &Path) -> Result<GatewayConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: GatewayConfig =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}
