// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use thiserror::Error;

/// Failures surfaced by `start()`. Readiness timeouts and unsolicited exits
/// are reported through logs and `status()`, not through this enum.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("no usable gateway runtime found (searched: {})", searched.join(", "))]
    RuntimeNotFound { searched: Vec<String> },

    #[error("failed to launch gateway ({command}): {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
