use super::types::{
    LogConfig, ProjectConfig, RawProjectConfig, RawSessionConfig, RawTinkerConfig,
    SessionConfig, TinkerConfig,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<TinkerConfig> {
        let mut raw = RawTinkerConfig::default();

        // Layer 1: User config
        let user_path = Self::user_config_path();
        if user_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        tinker_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with TINKER_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("TINKER_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".tinker/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawTinkerConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawTinkerConfig, overlay: RawTinkerConfig) -> RawTinkerConfig {
        RawTinkerConfig {
            session: RawSessionConfig {
                shell: overlay.session.shell.or(base.session.shell),
                bootstrap_command: overlay
                    .session
                    .bootstrap_command
                    .or(base.session.bootstrap_command),
                cols: overlay.session.cols.or(base.session.cols),
                rows: overlay.session.rows.or(base.session.rows),
                init_timeout_secs: overlay
                    .session
                    .init_timeout_secs
                    .or(base.session.init_timeout_secs),
                terminal_name: overlay.session.terminal_name.or(base.session.terminal_name),
            },
            project: RawProjectConfig {
                marker_file: overlay.project.marker_file.or(base.project.marker_file),
                framework_package: overlay
                    .project
                    .framework_package
                    .or(base.project.framework_package),
                folders: overlay.project.folders.or(base.project.folders),
            },
            log: LogConfig {
                file: overlay.log.file.or(base.log.file),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawTinkerConfig) -> TinkerConfig {
        let session = SessionConfig::default();
        let project = ProjectConfig::default();

        TinkerConfig {
            session: SessionConfig {
                shell: raw.session.shell,
                bootstrap_command: raw
                    .session
                    .bootstrap_command
                    .unwrap_or(session.bootstrap_command),
                cols: raw.session.cols.unwrap_or(session.cols),
                rows: raw.session.rows.unwrap_or(session.rows),
                init_timeout_secs: raw
                    .session
                    .init_timeout_secs
                    .unwrap_or(session.init_timeout_secs),
                terminal_name: raw.session.terminal_name.unwrap_or(session.terminal_name),
            },
            project: ProjectConfig {
                marker_file: raw.project.marker_file.unwrap_or(project.marker_file),
                framework_package: raw
                    .project
                    .framework_package
                    .unwrap_or(project.framework_package),
                folders: raw.project.folders.unwrap_or_default(),
            },
            log: raw.log,
        }
    }

    /// Load config from a specific path (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<TinkerConfig> {
        if path.exists() {
            Ok(Self::finalize(Self::read_raw(path)?))
        } else {
            Ok(TinkerConfig::default())
        }
    }
}
