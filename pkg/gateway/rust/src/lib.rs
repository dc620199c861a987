// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Lifecycle supervisor for an embedded network-proxy ("gateway") child
//! process: runtime resolution with fallback, launch with environment
//! overrides, stdout-sentinel readiness detection, and graceful-then-forced
//! shutdown.

pub mod config;
pub mod env;
pub mod error;
pub mod output;
pub mod process;
pub mod resolver;
pub mod supervisor;

pub use config::{GatewayConfig, RuntimeCandidate, RuntimeConfig};
pub use error::SupervisorError;
pub use supervisor::{GatewayStatus, GatewaySupervisor};
