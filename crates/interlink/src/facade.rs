//! Integration facade: the host's single entry and exit point for bridging.
//!
//! The host calls [`BridgeFacade::initialize_for_host`] once at startup. When
//! that produces a gateway, the facade also registers Ctrl+C and SIGTERM
//! handlers that run [`BridgeFacade::shutdown`]; the host awaits
//! [`BridgeFacade::wait_for_shutdown`] before it exits, so the listening
//! socket never outlives the process.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::LifecycleError;
use crate::lifecycle::{GatewayHandle, LifecycleController, LifecycleState};
use crate::prompt::{ProcessEnvironment, SystemPromptBuilder};
use crate::server::AppState;
use crate::tools::ToolLookup;

/// Owns the lifecycle controller and the handle it produced.
///
/// Hold it in an `Arc` so signal tasks can reach it.
#[derive(Default)]
pub struct BridgeFacade {
    controller: LifecycleController,
    handle: RwLock<Option<GatewayHandle>>,
    signals: Mutex<Option<JoinHandle<bool>>>,
}

impl BridgeFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the bridge with the host's tools and the default prompt and
    /// environment collaborators.
    ///
    /// If a gateway is produced, termination-signal handlers are installed
    /// before this returns.
    pub async fn initialize_for_host(
        self: &Arc<Self>,
        config: &Config,
        tools: Arc<dyn ToolLookup>,
    ) -> Result<Option<GatewayHandle>, LifecycleError> {
        let environment = Arc::new(ProcessEnvironment);
        let prompts = Arc::new(SystemPromptBuilder::new(environment.clone()));
        let handle = self
            .initialize_with(config, AppState::new(tools, prompts, environment))
            .await?;
        if handle.is_some() {
            self.install_signal_handlers().await;
        }
        Ok(handle)
    }

    /// Wire the bridge with explicit collaborators.
    pub async fn initialize_with(
        &self,
        config: &Config,
        app: AppState,
    ) -> Result<Option<GatewayHandle>, LifecycleError> {
        let handle = self.controller.initialize(&config.bridge, app).await?;

        match &handle {
            Some(handle) => {
                let port = handle
                    .local_addr()
                    .map_or(handle.config().port, |addr| addr.port());
                info!("Bridge server enabled on port {}", port);
            }
            None => info!("Bridge server disabled"),
        }

        *self.handle.write().await = handle.clone();
        Ok(handle)
    }

    /// Start a constructed gateway, for hosts that leave `autoStart` off.
    pub async fn start(&self) -> Result<SocketAddr, LifecycleError> {
        self.controller.start().await
    }

    /// Stop the gateway and forget the handle. Idempotent.
    pub async fn shutdown(&self) -> bool {
        let stopped = self.controller.stop().await;
        self.handle.write().await.take();
        if stopped {
            info!("Bridge server shut down");
        }
        stopped
    }

    pub fn is_running(&self) -> bool {
        self.controller.state() == LifecycleState::Started
    }

    pub async fn handle(&self) -> Option<GatewayHandle> {
        self.handle.read().await.clone()
    }

    pub fn controller(&self) -> &LifecycleController {
        &self.controller
    }

    /// Shut down once `signal` resolves.
    ///
    /// The returned task yields whether that shutdown released a handle. It
    /// does not keep the facade alive; if the facade is gone by then, it
    /// yields `false`.
    pub fn shutdown_on<F>(self: &Arc<Self>, signal: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let facade: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            signal.await;
            match facade.upgrade() {
                Some(facade) => facade.shutdown().await,
                None => false,
            }
        })
    }

    /// Shut down on Ctrl+C or SIGTERM.
    ///
    /// SIGTERM is registered before this returns. A no-op while handlers from
    /// an earlier call are still waiting.
    pub async fn install_signal_handlers(self: &Arc<Self>) {
        let mut signals = self.signals.lock().await;
        if signals.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        *signals = Some(self.shutdown_on(shutdown_signal()));
    }

    /// Wait for the signal-driven shutdown to finish.
    ///
    /// Returns `None` when no handlers are installed.
    pub async fn wait_for_shutdown(&self) -> Option<bool> {
        let task = self.signals.lock().await.take()?;
        match task.await {
            Ok(released) => Some(released),
            Err(e) => {
                warn!(error = %e, "Signal task failed");
                None
            }
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
///
/// SIGTERM is registered when this is called, so it must run inside a Tokio
/// runtime. A handler that cannot be installed is logged and never fires.
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    #[cfg(unix)]
    let sigterm = {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())
            .inspect_err(|e| warn!(error = %e, "Failed to install SIGTERM handler"))
            .ok()
    };

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match sigterm {
                Some(mut sigterm) => {
                    sigterm.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
            _ = terminate => info!("Received SIGTERM, shutting down"),
        }
    }
}
