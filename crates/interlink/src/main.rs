use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use interlink::tools::builtin;
use interlink::{BridgeFacade, Config, LifecycleState, shutdown_signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Local HTTP bridge for host tools and commands", long_about = None)]
struct Cli {
    /// Host configuration file
    #[arg(long, value_name = "PATH", default_value = "interlink.yaml")]
    config: PathBuf,

    /// Override `bridge.port`
    #[arg(long)]
    port: Option<u16>,

    /// Override `bridge.host`
    #[arg(long)]
    host: Option<String>,

    /// Enable and start the bridge regardless of configuration
    #[arg(long)]
    enable: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.bridge.port = port;
    }
    if let Some(host) = cli.host {
        config.bridge.host = host;
    }
    if cli.enable {
        config.bridge.enabled = true;
        config.bridge.auto_start = true;
    }

    let facade = Arc::new(BridgeFacade::new());
    let Some(handle) = facade
        .initialize_for_host(&config, Arc::new(builtin::registry()))
        .await?
    else {
        info!("Nothing to serve, exiting");
        return Ok(());
    };

    if handle.state() == LifecycleState::Constructed {
        facade.start().await?;
    }
    if let Some(url) = handle.base_url() {
        info!(url = %url, "Bridge ready");
    }

    // A second signal while in-flight requests drain exits without them.
    let mut state = facade.controller().subscribe();
    tokio::select! {
        released = facade.wait_for_shutdown() => {
            info!(released = ?released, "Bridge stopped, exiting");
        }
        _ = async {
            let _ = state.wait_for(|s| *s == LifecycleState::Stopped).await;
            shutdown_signal().await;
        } => {
            warn!("Second signal received, exiting without draining");
        }
    }
    Ok(())
}
