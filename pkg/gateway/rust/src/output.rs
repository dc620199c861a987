// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout};
use tokio::sync::watch;

/// Fixed substring the gateway prints on stdout once it accepts traffic.
/// The only wire-level contract with the child; must stay stable across
/// gateway versions.
pub const READY_SENTINEL: &str = "gateway listening";

/// Forward every stdout line to the log and flip the readiness channel on
/// the first sentinel match. Later matches are no-ops.
pub fn watch_stdout(stdout: ChildStdout, ready_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        let mut ready = false;
        while let Ok(Some(line)) = lines.next_line().await {
            info!("[gateway] {line}");
            if !ready && line.contains(READY_SENTINEL) {
                ready = true;
                info!("gateway signaled readiness");
                let _ = ready_tx.send(true);
            }
        }
    });
}

/// Stderr lines are logged at error level and never examined for the
/// sentinel.
pub fn watch_stderr(stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            error!("[gateway] {line}");
        }
    });
}
