// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::Result;
use gateway_supervisor::{GatewaySupervisor, config};
use log::info;
use tokio::signal::unix::{SignalKind, signal};

#[tokio::main]
async fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    info!(
        "gateway-supervisord starting (version {})",
        env!("CARGO_PKG_VERSION")
    );

    let path = config::config_path();
    let config = config::load_config(&path)?;
    let supervisor = GatewaySupervisor::new(config);
    supervisor.start().await?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }

    supervisor.stop().await;
    info!("gateway-supervisord shutting down");
    Ok(())
}
