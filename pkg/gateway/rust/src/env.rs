// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use log::warn;

/// Parse a systemd-style environment file for the gateway child process.
/// Supports `KEY=VALUE`, `KEY="VALUE"`, `KEY='VALUE'`, an optional `export `
/// prefix, comments (#), and blank lines. Malformed lines are logged and
/// skipped rather than failing the launch.
pub fn load_environment_file(path: &str) -> Result<Vec<(String, String)>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading environment file: {path}"))?;

    let mut vars = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let assignment = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        match assignment.split_once('=') {
            Some((key, raw_val)) => {
                let val = raw_val
                    .trim()
                    .trim_matches('"')
                    .trim_matches('\'')
                    .to_string();
                vars.push((key.trim().to_string(), val));
            }
            None => warn!(
                "{path}:{}: skipping line without KEY=VALUE: {trimmed}",
                line_num + 1
            ),
        }
    }
    Ok(vars)
}
