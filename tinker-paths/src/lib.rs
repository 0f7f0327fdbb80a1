//! XDG Base Directory paths for tinker.
//!
//! The CLI host keeps its configuration, diagnostic output log and tracing
//! log under XDG paths on every platform, the same way gh or kubectl do.

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "tinker";

/// Get the tinker config directory.
///
/// Returns `$XDG_CONFIG_HOME/tinker` if set, otherwise `~/.config/tinker`.
///
/// # Examples
///
/// ```
/// use tinker_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    resolve(
        std::env::var_os("XDG_CONFIG_HOME"),
        dirs::home_dir(),
        ".config",
    )
}

/// Get the tinker data directory.
///
/// Returns `$XDG_DATA_HOME/tinker` if set, otherwise `~/.local/share/tinker`.
/// Log files live here.
pub fn data_dir() -> PathBuf {
    resolve(
        std::env::var_os("XDG_DATA_HOME"),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Default location of the diagnostic output log.
pub fn output_log_path() -> PathBuf {
    data_dir().join("output.log")
}

/// Default location of the tracing log written by the CLI.
pub fn trace_log_path() -> PathBuf {
    data_dir().join("tinker.log")
}

fn resolve(xdg: Option<OsString>, home: Option<PathBuf>, fallback: &str) -> PathBuf {
    match (xdg.filter(|v| !v.is_empty()), home) {
        (Some(base), _) => PathBuf::from(base).join(APP_DIR),
        (None, Some(home)) => home.join(fallback).join(APP_DIR),
        (None, None) => PathBuf::from(fallback).join(APP_DIR),
    }
}
