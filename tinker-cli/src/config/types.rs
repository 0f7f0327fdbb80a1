use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use tinker_core::ProjectMarkers;
use tinker_core::pty::{BridgeConfig, DEFAULT_BOOTSTRAP_COMMAND, DEFAULT_COLS, DEFAULT_ROWS};

/// Default name of the terminal surface
pub const DEFAULT_TERMINAL_NAME: &str = "Tinker";

/// Default bound on waiting for another caller's session setup
pub const DEFAULT_INIT_TIMEOUT_SECS: u64 = 30;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTinkerConfig {
    #[serde(default)]
    pub session: RawSessionConfig,

    #[serde(default)]
    pub project: RawProjectConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Session config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSessionConfig {
    pub shell: Option<PathBuf>,
    pub bootstrap_command: Option<String>,
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    pub init_timeout_secs: Option<u64>,
    pub terminal_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProjectConfig {
    pub marker_file: Option<String>,
    pub framework_package: Option<String>,
    pub folders: Option<Vec<PathBuf>>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TinkerConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Shell to run Tinker in; the login shell when unset
    pub shell: Option<PathBuf>,

    /// Command that starts the REPL
    pub bootstrap_command: String,

    pub cols: u16,

    pub rows: u16,

    /// Seconds a run waits for a session another run is starting
    pub init_timeout_secs: u64,

    /// Name of the terminal surface
    pub terminal_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shell: None,
            bootstrap_command: DEFAULT_BOOTSTRAP_COMMAND.to_string(),
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            init_timeout_secs: DEFAULT_INIT_TIMEOUT_SECS,
            terminal_name: DEFAULT_TERMINAL_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// File whose presence marks a Laravel root
    pub marker_file: String,

    /// composer.json requirement that marks a Laravel root
    pub framework_package: String,

    /// Workspace folders searched when none are given on the command line
    #[serde(default)]
    pub folders: Vec<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let markers = ProjectMarkers::default();
        Self {
            marker_file: markers.marker_file,
            framework_package: markers.framework_package,
            folders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogConfig {
    /// Diagnostic output log; defaults to the data directory
    pub file: Option<PathBuf>,
}

impl LogConfig {
    pub fn output_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(tinker_paths::output_log_path)
    }
}

impl TinkerConfig {
    pub fn markers(&self) -> ProjectMarkers {
        ProjectMarkers {
            marker_file: self.project.marker_file.clone(),
            framework_package: self.project.framework_package.clone(),
        }
    }

    /// Bridge settings. The TINKER_PTY_SHELL env var wins over the file.
    pub fn bridge_config(&self) -> BridgeConfig {
        let env = BridgeConfig::default();
        BridgeConfig {
            shell: env.shell.or_else(|| self.session.shell.clone()),
            bootstrap_command: self.session.bootstrap_command.clone(),
            cols: self.session.cols,
            rows: self.session.rows,
            terminal_name: self.session.terminal_name.clone(),
            init_timeout: Duration::from_secs(self.session.init_timeout_secs),
            markers: self.markers(),
            ..env
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = TinkerConfig::default();
        assert_eq!(config.session.bootstrap_command, "php artisan tinker");
        assert_eq!((config.session.cols, config.session.rows), (80, 30));
        assert_eq!(config.session.init_timeout_secs, 30);
        assert_eq!(config.session.terminal_name, "Tinker");
        assert!(config.session.shell.is_none());
        assert_eq!(config.project.marker_file, "artisan");
        assert_eq!(config.project.framework_package, "laravel/framework");
        assert!(config.project.folders.is_empty());
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TinkerConfig {
            session: SessionConfig {
                shell: Some(PathBuf::from("/bin/zsh")),
                bootstrap_command: "sail artisan tinker".to_string(),
                cols: 120,
                ..Default::default()
            },
            project: ProjectConfig {
                folders: vec![PathBuf::from("/srv/app")],
                ..Default::default()
            },
            log: LogConfig {
                file: Some(PathBuf::from("/tmp/tinker.log")),
            },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: TinkerConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.session.shell, Some(PathBuf::from("/bin/zsh")));
        assert_eq!(parsed.session.bootstrap_command, "sail artisan tinker");
        assert_eq!(parsed.session.cols, 120);
        assert_eq!(parsed.project.folders, vec![PathBuf::from("/srv/app")]);
        assert_eq!(parsed.log.file, Some(PathBuf::from("/tmp/tinker.log")));
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[session]
rows = 50
"#;
        let raw: RawTinkerConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.session.rows, Some(50));
        assert!(raw.session.cols.is_none());
        assert!(raw.project.folders.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawTinkerConfig = toml::from_str("").unwrap();

        assert!(raw.session.shell.is_none());
        assert!(raw.session.bootstrap_command.is_none());
        assert!(raw.project.marker_file.is_none());
        assert!(raw.log.file.is_none());
    }

    #[test]
    fn test_bridge_config_carries_file_settings() {
        let config = TinkerConfig {
            session: SessionConfig {
                bootstrap_command: "php artisan tinker --execute".to_string(),
                cols: 100,
                rows: 40,
                init_timeout_secs: 5,
                terminal_name: "REPL".to_string(),
                ..Default::default()
            },
            project: ProjectConfig {
                marker_file: "console".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let bridge = config.bridge_config();

        assert_eq!(bridge.bootstrap_command, "php artisan tinker --execute");
        assert_eq!((bridge.cols, bridge.rows), (100, 40));
        assert_eq!(bridge.init_timeout, Duration::from_secs(5));
        assert_eq!(bridge.terminal_name, "REPL");
        assert_eq!(bridge.markers.marker_file, "console");
        assert_eq!(bridge.term_name, "xterm-color");
    }

    #[test]
    fn test_log_path_defaults_to_data_dir() {
        let path = LogConfig::default().output_path();
        assert!(path.ends_with("tinker/output.log"));
    }
}
