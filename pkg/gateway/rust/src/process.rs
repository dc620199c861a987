// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::GatewayConfig;
use crate::env;
use crate::error::SupervisorError;
use crate::resolver::RuntimeResolution;
use log::warn;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Bind port override consumed by the gateway.
pub const PORT_ENV: &str = "GATEWAY_PORT";
/// Marks the gateway as launched in embedded/supervised mode.
pub const EMBEDDED_ENV: &str = "GATEWAY_EMBEDDED";

/// Spawn the gateway with stdout/stderr piped and stdin disconnected.
/// Env precedence on collision: environment_file < `env:` map < supervisor
/// overrides.
pub fn launch(
    resolution: &RuntimeResolution,
    config: &GatewayConfig,
) -> Result<Child, SupervisorError> {
    let mut cmd = Command::new(&resolution.program);
    cmd.args(&resolution.args);

    if let Some(ref file) = config.environment_file {
        match env::load_environment_file(file) {
            Ok(vars) => {
                for (k, v) in vars {
                    cmd.env(k, v);
                }
            }
            Err(e) => warn!("[gateway] ignoring environment file {file}: {e:#}"),
        }
    }
    for (k, v) in &config.env {
        cmd.env(k, v);
    }
    cmd.env(PORT_ENV, config.port.to_string());
    cmd.env(EMBEDDED_ENV, "1");

    if let Some(ref dir) = config.working_dir {
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    cmd.spawn().map_err(|source| SupervisorError::LaunchFailed {
        command: resolution.program.display().to_string(),
        source,
    })
}

/// Signals go by PID; the Child handle lives with the exit watcher.
pub fn send_signal(pid: u32, sig: Signal) {
    if let Err(e) = signal::kill(Pid::from_raw(pid as i32), sig) {
        warn!("[gateway] failed to send {sig} to pid {pid}: {e}");
    }
}
