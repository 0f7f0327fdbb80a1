//! Default shell resolution

use std::path::{Path, PathBuf};

use super::BridgeError;

#[cfg(unix)]
const SHELL_VAR: &str = "SHELL";
#[cfg(windows)]
const SHELL_VAR: &str = "COMSPEC";

#[cfg(unix)]
const PATH_CANDIDATES: &[&str] = &["bash", "zsh", "sh"];
#[cfg(windows)]
const PATH_CANDIDATES: &[&str] = &["pwsh.exe", "powershell.exe", "cmd.exe"];

#[cfg(unix)]
const LAST_RESORT: &str = "/bin/sh";
#[cfg(windows)]
const LAST_RESORT: &str = "cmd.exe";

/// Resolve the shell to run inside the PTY.
///
/// An explicit override must exist (as a path or on `PATH`). Otherwise the
/// user's login shell from the environment wins, then the first well-known
/// shell found on `PATH`.
pub fn resolve_shell(explicit: Option<&Path>) -> Result<PathBuf, BridgeError> {
    if let Some(shell) = explicit {
        return which::which(shell)
            .map_err(|e| BridgeError::ShellNotFound(format!("{}: {}", shell.display(), e)));
    }

    Ok(default_shell(std::env::var_os(SHELL_VAR).map(PathBuf::from)))
}

fn default_shell(from_env: Option<PathBuf>) -> PathBuf {
    if let Some(shell) = from_env.filter(|s| !s.as_os_str().is_empty()) {
        return shell;
    }

    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .unwrap_or_else(|| PathBuf::from(LAST_RESORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_shell_wins() {
        let shell = default_shell(Some(PathBuf::from("/usr/bin/fish")));
        assert_eq!(shell, PathBuf::from("/usr/bin/fish"));
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let shell = default_shell(Some(PathBuf::new()));
        assert!(!shell.as_os_str().is_empty());
    }

    #[test]
    fn missing_explicit_shell_is_an_error() {
        let result = resolve_shell(Some(Path::new("/nonexistent/shell-binary")));
        assert!(matches!(result, Err(BridgeError::ShellNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn explicit_shell_found_on_path() {
        let shell = resolve_shell(Some(Path::new("sh"))).unwrap();
        assert!(shell.is_absolute());
    }
}
