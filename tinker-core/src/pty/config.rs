//! Session bridge configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::project::ProjectMarkers;

/// Command submitted to the shell once the PTY is up
pub const DEFAULT_BOOTSTRAP_COMMAND: &str = "php artisan tinker";

/// Fixed terminal geometry of the Tinker session
pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 30;

/// Configuration for the Tinker session bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Shell override (can be set via TINKER_PTY_SHELL env var); resolved
    /// from the environment when `None`
    pub shell: Option<PathBuf>,
    /// REPL bootstrap command, submitted with a trailing carriage return
    pub bootstrap_command: String,
    /// Terminal columns
    pub cols: u16,
    /// Terminal rows
    pub rows: u16,
    /// Value of TERM in the spawned shell
    pub term_name: String,
    /// Name given to the terminal surface
    pub terminal_name: String,
    /// How long concurrent callers wait for an in-flight initialization
    pub init_timeout: Duration,
    /// Project detection markers
    pub markers: ProjectMarkers,
    /// Mock mode - don't spawn a real PTY (for testing)
    /// Enabled via TINKER_MOCK_PTY=1 env var
    pub mock_mode: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let mock_mode = std::env::var("TINKER_MOCK_PTY")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let shell = std::env::var_os("TINKER_PTY_SHELL")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        tracing::debug!(shell = ?shell, mock_mode = mock_mode, "BridgeConfig initialized");

        Self {
            shell,
            bootstrap_command: DEFAULT_BOOTSTRAP_COMMAND.to_string(),
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            term_name: "xterm-color".to_string(),
            terminal_name: "Tinker".to_string(),
            init_timeout: Duration::from_secs(30),
            markers: ProjectMarkers::default(),
            mock_mode,
        }
    }
}
