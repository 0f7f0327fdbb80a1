//! Error types for tinker-core

use thiserror::Error;

use crate::pty::BridgeError;

/// Top-level error type for tinker-core
#[derive(Error, Debug)]
pub enum TinkerError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Extension has been deactivated")]
    Deactivated,

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
