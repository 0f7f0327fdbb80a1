//! PTY and session bridge error types

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtyError {
    #[error("Failed to create PTY: {0}")]
    CreateFailed(String),

    #[error("Failed to spawn process: {0}")]
    SpawnFailed(String),

    #[error("PTY I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised while creating or driving the Tinker session
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error("Unable to resolve a shell program: {0}")]
    ShellNotFound(String),

    #[error("Unable to locate Laravel project.")]
    ProjectNotFound,

    #[error("Host error: {0}")]
    Host(String),

    #[error("Session initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Timed out after {0:?} waiting for the session to initialize")]
    InitTimeout(Duration),

    #[error("Session was disposed before it became ready")]
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pty_error_spawn_failed_displays_correctly() {
        let error = PtyError::SpawnFailed("no such file".to_string());
        assert_eq!(error.to_string(), "Failed to spawn process: no such file");
    }

    #[test]
    fn bridge_error_is_transparent_over_pty_error() {
        let error: BridgeError = PtyError::CreateFailed("openpty".to_string()).into();
        assert_eq!(error.to_string(), "Failed to create PTY: openpty");
    }

    #[test]
    fn project_not_found_matches_user_message() {
        assert_eq!(
            BridgeError::ProjectNotFound.to_string(),
            "Unable to locate Laravel project."
        );
    }

    #[test]
    fn init_timeout_mentions_duration() {
        let error = BridgeError::InitTimeout(Duration::from_secs(3));
        assert!(error.to_string().contains("3s"));
    }
}
