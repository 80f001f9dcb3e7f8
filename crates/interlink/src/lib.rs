//! Interlink - a local HTTP bridge that lets a second runtime reach host tools,
//! prompt context and the command interpreters during a staged migration.

pub mod commands;
pub mod config;
pub mod error;
pub mod facade;
pub mod handlers;
pub mod lifecycle;
pub mod prompt;
pub mod response;
pub mod server;
pub mod tools;

#[cfg(test)]
mod testing;

pub use config::{BridgeConfig, Config, ConfigError};
pub use error::LifecycleError;
pub use facade::{BridgeFacade, shutdown_signal};
pub use lifecycle::{GatewayHandle, LifecycleController, LifecycleState};
pub use server::{AppState, build_app};
