//! Lifecycle controller for the bridge gateway.
//!
//! ## Lifecycle States
//!
//! ```text
//!                 ┌─→ Disabled                 (bridging turned off)
//! Uninitialized ──┤
//!                 └─→ Constructed ─→ Started ─→ Stopped
//!                          └──────────────────────↗
//! ```
//!
//! - **Constructed**: handle allocated, not listening
//! - **Started**: socket bound, accepting connections
//! - **Stopped**: socket closed, handle released; terminal for that handle,
//!   but a fresh one may be initialized afterwards
//!
//! The controller is the only component that creates, starts or stops a
//! [`GatewayHandle`]. All transitions are serialized through one async mutex,
//! so racing `start`/`stop` calls (e.g. from signal handlers) resolve in some
//! order without double binds or double closes.
//!
//! Stopping drains gracefully: the listener closes immediately and in-flight
//! requests run to completion before `stop` returns. The handle is released
//! before the drain, so a slow request never holds up another `stop`.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::LifecycleError;
use crate::server::{AppState, build_app};

// ============================================================================
// Lifecycle State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// `initialize` has not run yet
    Uninitialized,
    /// Configuration turned bridging off
    Disabled,
    /// Handle allocated, not listening
    Constructed,
    /// Accepting connections
    Started,
    /// Listener closed, handle released
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Disabled => write!(f, "disabled"),
            Self::Constructed => write!(f, "constructed"),
            Self::Started => write!(f, "started"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

// ============================================================================
// GatewayHandle
// ============================================================================

/// Live representation of one gateway instance.
///
/// Cloning is cheap and shares the instance. Clones only observe; the
/// controller that created the handle drives it.
#[derive(Clone)]
pub struct GatewayHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    config: BridgeConfig,
    app: AppState,
    status: watch::Sender<HandleStatus>,
}

#[derive(Debug, Clone, Copy)]
struct HandleStatus {
    state: LifecycleState,
    local_addr: Option<SocketAddr>,
}

impl GatewayHandle {
    fn new(config: BridgeConfig, app: AppState) -> Self {
        let (status, _) = watch::channel(HandleStatus {
            state: LifecycleState::Constructed,
            local_addr: None,
        });
        Self {
            inner: Arc::new(HandleInner {
                config,
                app,
                status,
            }),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// `Constructed`, `Started` or `Stopped`.
    pub fn state(&self) -> LifecycleState {
        self.inner.status.borrow().state
    }

    /// Bound address while started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.status.borrow().local_addr
    }

    /// Base URL callers should use, while started.
    pub fn base_url(&self) -> Option<String> {
        self.local_addr().map(|addr| format!("http://{}", addr))
    }

    fn set_status(&self, state: LifecycleState, local_addr: Option<SocketAddr>) {
        self.inner
            .status
            .send_replace(HandleStatus { state, local_addr });
    }
}

impl fmt::Debug for GatewayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayHandle")
            .field("config", &self.inner.config)
            .field("state", &self.state())
            .field("local_addr", &self.local_addr())
            .finish()
    }
}

// ============================================================================
// LifecycleController
// ============================================================================

/// Owns at most one [`GatewayHandle`] and drives its transitions.
pub struct LifecycleController {
    slot: Mutex<Slot>,
    state: watch::Sender<LifecycleState>,
}

#[derive(Default)]
struct Slot {
    handle: Option<GatewayHandle>,
    server: Option<RunningServer>,
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleController {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Uninitialized);
        Self {
            slot: Mutex::new(Slot::default()),
            state,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// The current handle, if one is constructed or started.
    pub async fn handle(&self) -> Option<GatewayHandle> {
        self.slot.lock().await.handle.clone()
    }

    /// Construct a gateway from `config`, starting it if `auto_start` is set.
    ///
    /// Returns `Ok(None)` when bridging is disabled; nothing is bound then.
    /// If auto-start fails to bind, the new handle is released and the error
    /// returned.
    pub async fn initialize(
        &self,
        config: &BridgeConfig,
        app: AppState,
    ) -> Result<Option<GatewayHandle>, LifecycleError> {
        let mut slot = self.slot.lock().await;
        if slot.handle.is_some() {
            return Err(LifecycleError::AlreadyInitialized);
        }

        if !config.enabled {
            debug!("Bridging disabled by configuration");
            self.state.send_replace(LifecycleState::Disabled);
            return Ok(None);
        }
        config.validate()?;

        let handle = GatewayHandle::new(config.clone(), app);
        slot.handle = Some(handle.clone());
        self.state.send_replace(LifecycleState::Constructed);
        debug!(port = config.port, "Bridge server constructed");

        if config.auto_start {
            if let Err(e) = self.start_locked(&mut slot).await {
                self.release_locked(&mut slot);
                return Err(e);
            }
        }

        Ok(Some(handle))
    }

    /// Bind the listener and begin serving.
    ///
    /// Fails with `NotInitialized` when there is no handle and with
    /// `AlreadyListening` when the handle is already started.
    pub async fn start(&self) -> Result<SocketAddr, LifecycleError> {
        let mut slot = self.slot.lock().await;
        self.start_locked(&mut slot).await
    }

    /// Close the listener and release the handle.
    ///
    /// Safe to call at any time and from any number of tasks at once. Returns
    /// `true` if this call released a handle, `false` if there was nothing to
    /// stop. The release happens before the drain, so concurrent callers see
    /// `Stopped` at once while this call waits for in-flight requests.
    pub async fn stop(&self) -> bool {
        let server = {
            let mut slot = self.slot.lock().await;
            let Some(handle) = slot.handle.clone() else {
                debug!("Bridge server already stopped");
                return false;
            };

            let server = slot.server.take();
            if let Some(server) = &server {
                server.shutdown.cancel();
            }
            debug!(config = ?handle.config(), "Releasing bridge handle");
            self.release_locked(&mut slot);
            server
        };

        if let Some(server) = server {
            match server.task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Bridge server exited with error"),
                Err(e) => warn!(error = %e, "Bridge server task failed"),
            }
            info!(addr = %server.local_addr, "Bridge server stopped");
        }
        true
    }

    async fn start_locked(&self, slot: &mut Slot) -> Result<SocketAddr, LifecycleError> {
        let Some(handle) = slot.handle.clone() else {
            return Err(LifecycleError::NotInitialized);
        };
        if let Some(server) = &slot.server {
            return Err(LifecycleError::AlreadyListening(server.local_addr));
        }

        let config = handle.config();
        let bind_err = |source| LifecycleError::Bind {
            addr: config.bind_addr(),
            source,
        };
        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        let shutdown = CancellationToken::new();
        let app = build_app(handle.inner.app.clone());
        let signal = shutdown.clone().cancelled_owned();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await
        });

        info!(addr = %local_addr, "Bridge server listening");
        slot.server = Some(RunningServer {
            local_addr,
            shutdown,
            task,
        });
        handle.set_status(LifecycleState::Started, Some(local_addr));
        self.state.send_replace(LifecycleState::Started);
        Ok(local_addr)
    }

    fn release_locked(&self, slot: &mut Slot) {
        if let Some(handle) = slot.handle.take() {
            handle.set_status(LifecycleState::Stopped, None);
        }
        self.state.send_replace(LifecycleState::Stopped);
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        // Cannot await the drain here; stop accepting at least.
        if let Some(server) = &self.slot.get_mut().server {
            server.shutdown.cancel();
        }
    }
}
