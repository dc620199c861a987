// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::GatewayConfig;
use crate::error::SupervisorError;
use crate::output;
use crate::process;
use crate::resolver::RuntimeResolver;
use log::{debug, info, warn};
use nix::sys::signal::Signal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::process::Child;
use tokio::sync::watch;
use tokio::time::{Duration, timeout};

/// Hard cap on the post-SIGKILL wait. SIGKILL cannot be caught, so a child
/// still alive after this is not going to be reaped by waiting longer.
const SIGKILL_TIMEOUT: Duration = Duration::from_secs(10);

/// Point-in-time lifecycle snapshot. `running` tracks the process handle,
/// `ready` the sentinel observation; the two differ for a gateway that was
/// spawned but has not (or never) signaled readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayStatus {
    pub running: bool,
    pub port: u16,
    pub ready: bool,
}

#[derive(Default)]
struct ProcState {
    /// Set on spawn, cleared only by the exit watcher.
    pid: Option<u32>,
    /// True between a stop() signaling the child and the observed exit.
    stopping: bool,
    ready_rx: Option<watch::Receiver<bool>>,
    exited_rx: Option<watch::Receiver<bool>>,
}

/// Owns the lifecycle of one gateway child process. Independent instances
/// are safely constructible; production wiring uses exactly one.
pub struct GatewaySupervisor {
    config: GatewayConfig,
    resolver: RuntimeResolver,
    state: Arc<Mutex<ProcState>>,
    /// Serializes start/stop/restart so two callers cannot race a spawn
    /// against a teardown on the same port.
    lifecycle: tokio::sync::Mutex<()>,
}

impl GatewaySupervisor {
    pub fn new(config: GatewayConfig) -> Self {
        let resolver = RuntimeResolver::new(config.runtime.clone());
        Self {
            config,
            resolver,
            state: Arc::new(Mutex::new(ProcState::default())),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Resolve the runtime, launch the gateway, and wait (bounded) for the
    /// readiness sentinel. No-op when a gateway is already running or when
    /// auto_start is off. Readiness timeout is not an error; resolution and
    /// launch failures are.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        let _guard = self.lifecycle.lock().await;
        self.do_start().await
    }

    /// Graceful SIGTERM, SIGKILL after the escalation timeout. Resolves only
    /// once the exit is observed; immediately if nothing is running.
    pub async fn stop(&self) {
        let _guard = self.lifecycle.lock().await;
        self.do_stop().await;
    }

    /// stop() fully awaited, then start(); strictly sequential so two
    /// gateways never race to bind the port.
    pub async fn restart(&self) -> Result<(), SupervisorError> {
        let _guard = self.lifecycle.lock().await;
        self.do_stop().await;
        self.do_start().await
    }

    /// True only for a gateway that is both spawned and ready; callers care
    /// about usability, not mere existence.
    pub fn is_running(&self) -> bool {
        let st = self.state_lock();
        st.pid.is_some() && st.ready_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    pub fn status(&self) -> GatewayStatus {
        let st = self.state_lock();
        GatewayStatus {
            running: st.pid.is_some(),
            port: self.config.port,
            ready: st.ready_rx.as_ref().is_some_and(|rx| *rx.borrow()),
        }
    }

    async fn do_start(&self) -> Result<(), SupervisorError> {
        if !self.config.auto_start {
            info!("auto_start=false, leaving gateway down");
            return Ok(());
        }
        {
            let st = self.state_lock();
            if let Some(pid) = st.pid {
                warn!("[gateway] already running (pid={pid}), ignoring start");
                return Ok(());
            }
        }

        let resolution = self.resolver.resolve()?;
        info!(
            "[gateway] starting: {} {:?}",
            resolution.program.display(),
            resolution.args
        );

        let mut child = process::launch(&resolution, &self.config)?;
        let pid = child.id().unwrap_or(0);

        let (ready_tx, ready_rx) = watch::channel(false);
        let (exit_tx, exited_rx) = watch::channel(false);

        if let Some(stdout) = child.stdout.take() {
            output::watch_stdout(stdout, ready_tx);
        }
        if let Some(stderr) = child.stderr.take() {
            output::watch_stderr(stderr);
        }

        {
            let mut st = self.state_lock();
            st.pid = Some(pid);
            st.stopping = false;
            st.ready_rx = Some(ready_rx.clone());
            st.exited_rx = Some(exited_rx.clone());
        }

        // Wired before the readiness wait: a crash during the wait clears
        // state instead of leaving a stale handle.
        self.spawn_exit_watcher(child, pid, exit_tx);
        info!("[gateway] spawned (pid={pid}, port={})", self.config.port);

        self.wait_for_ready(pid, ready_rx, exited_rx).await;
        Ok(())
    }

    async fn wait_for_ready(
        &self,
        pid: u32,
        mut ready_rx: watch::Receiver<bool>,
        mut exited_rx: watch::Receiver<bool>,
    ) {
        tokio::select! {
            r = ready_rx.wait_for(|v| *v) => match r {
                Ok(_) => info!("[gateway] ready (pid={pid}, port={})", self.config.port),
                Err(_) => warn!("[gateway] output stream closed before readiness (pid={pid})"),
            },
            _ = exited_rx.wait_for(|v| *v) => {
                warn!("[gateway] exited before signaling readiness (pid={pid})");
            }
            _ = tokio::time::sleep(self.config.ready_timeout()) => {
                warn!(
                    "[gateway] not ready after {}ms, continuing without readiness (pid={pid})",
                    self.config.ready_timeout_ms
                );
            }
        }
    }

    async fn do_stop(&self) {
        let (pid, mut exited_rx) = {
            let mut st = self.state_lock();
            match (st.pid, st.exited_rx.clone()) {
                (Some(pid), Some(rx)) => {
                    st.stopping = true;
                    (pid, rx)
                }
                _ => {
                    debug!("stop requested but gateway is not running");
                    return;
                }
            }
        };

        info!("[gateway] sending SIGTERM (pid={pid})");
        process::send_signal(pid, Signal::SIGTERM);

        if timeout(self.config.stop_timeout(), exited_rx.wait_for(|v| *v))
            .await
            .is_err()
        {
            warn!(
                "[gateway] stop timeout ({}ms) reached, sending SIGKILL (pid={pid})",
                self.config.stop_timeout_ms
            );
            process::send_signal(pid, Signal::SIGKILL);
            if timeout(SIGKILL_TIMEOUT, exited_rx.wait_for(|v| *v))
                .await
                .is_err()
            {
                warn!("[gateway] still running after SIGKILL, giving up (pid={pid})");
            }
        }
    }

    /// The single place that clears the handle, for every exit path: stop(),
    /// crash, or external kill. State is reset before the exited channel
    /// fires so waiters observe the cleared handle.
    fn spawn_exit_watcher(&self, mut child: Child, pid: u32, exit_tx: watch::Sender<bool>) {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = child.wait().await;
            let stopping = {
                let mut st = state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let stopping = st.stopping;
                st.pid = None;
                st.stopping = false;
                st.ready_rx = None;
                st.exited_rx = None;
                stopping
            };
            match result {
                Ok(status) if stopping => info!("[gateway] exited with {status} (pid={pid})"),
                Ok(status) => warn!("[gateway] exited unexpectedly with {status} (pid={pid})"),
                Err(e) => warn!("[gateway] wait failed (pid={pid}): {e}"),
            }
            let _ = exit_tx.send(true);
        });
    }

    fn state_lock(&self) -> MutexGuard<'_, ProcState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
