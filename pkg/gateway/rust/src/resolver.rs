// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::RuntimeConfig;
use crate::error::SupervisorError;
use log::debug;
use std::path::PathBuf;

/// Chosen executable plus the artifact it runs. Recomputed on every start;
/// the filesystem can change between restarts (e.g. a compiled artifact
/// appearing after a build), so resolutions are never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeResolution {
    pub program: PathBuf,
    pub args: Vec<PathBuf>,
}

pub struct RuntimeResolver {
    config: RuntimeConfig,
    host_exe: PathBuf,
}

impl RuntimeResolver {
    pub fn new(config: RuntimeConfig) -> Self {
        let host_exe = std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("gateway-supervisord"));
        Self { config, host_exe }
    }

    /// Resolve against an explicit host executable instead of
    /// `current_exe()`.
    pub fn with_host_exe(config: RuntimeConfig, host_exe: PathBuf) -> Self {
        Self { config, host_exe }
    }

    /// Preference order: the host binary running the source directly, the
    /// compiled artifact, the ranked interpreter candidates, then a PATH
    /// lookup. Fails naming every path searched.
    pub fn resolve(&self) -> Result<RuntimeResolution, SupervisorError> {
        let rt = &self.config;
        let mut searched: Vec<String> = Vec::new();

        if self.host_runs_source() {
            if rt.source_artifact.exists() {
                debug!(
                    "resolved gateway runtime: host executable runs {}",
                    rt.source_artifact.display()
                );
                return Ok(RuntimeResolution {
                    program: self.host_exe.clone(),
                    args: vec![rt.source_artifact.clone()],
                });
            }
            searched.push(rt.source_artifact.display().to_string());
        }

        if rt.compiled_artifact.exists() {
            debug!(
                "resolved gateway runtime: compiled artifact {}",
                rt.compiled_artifact.display()
            );
            return Ok(RuntimeResolution {
                program: self.host_exe.clone(),
                args: vec![rt.compiled_artifact.clone()],
            });
        }
        searched.push(rt.compiled_artifact.display().to_string());

        for cand in &rt.candidates {
            let artifact = if cand.runs_source {
                &rt.source_artifact
            } else {
                &rt.compiled_artifact
            };
            if cand.path.exists() && artifact.exists() {
                debug!(
                    "resolved gateway runtime: {} {}",
                    cand.path.display(),
                    artifact.display()
                );
                return Ok(RuntimeResolution {
                    program: cand.path.clone(),
                    args: vec![artifact.clone()],
                });
            }
            searched.push(cand.path.display().to_string());
        }

        if let Some(ref name) = rt.fallback_runtime {
            if rt.source_artifact.exists()
                && let Some(found) = search_path(name)
            {
                debug!("resolved gateway runtime: {} (PATH)", found.display());
                return Ok(RuntimeResolution {
                    program: found,
                    args: vec![rt.source_artifact.clone()],
                });
            }
            searched.push(format!("{name} (PATH)"));
        }

        Err(SupervisorError::RuntimeNotFound { searched })
    }

    fn host_runs_source(&self) -> bool {
        let Some(name) = self.host_exe.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.config.source_runtimes.iter().any(|r| r == name)
    }
}

fn search_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|p| p.is_file())
}
