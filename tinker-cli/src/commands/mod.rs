pub mod config;
pub mod locate;
pub mod log;
pub mod normalize;
pub mod run;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::TinkerConfig;

/// Read source from FILE, or from stdin when FILE is absent or `-`
pub(crate) fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Workspace folders: explicit flags, then config, then the current directory
pub(crate) fn workspace_folders(explicit: &[PathBuf], config: &TinkerConfig) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    if !config.project.folders.is_empty() {
        return Ok(config.project.folders.clone());
    }
    Ok(vec![
        std::env::current_dir().context("Failed to read current directory")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_folders_win() {
        let config = TinkerConfig::default();
        let folders = workspace_folders(&[PathBuf::from("/a"), PathBuf::from("/b")], &config).unwrap();
        assert_eq!(folders, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn configured_folders_before_cwd() {
        let mut config = TinkerConfig::default();
        config.project.folders = vec![PathBuf::from("/srv/app")];
        assert_eq!(
            workspace_folders(&[], &config).unwrap(),
            vec![PathBuf::from("/srv/app")]
        );
    }

    #[test]
    fn falls_back_to_current_dir() {
        let folders = workspace_folders(&[], &TinkerConfig::default()).unwrap();
        assert_eq!(folders, vec![std::env::current_dir().unwrap()]);
    }

    #[test]
    fn read_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.php");
        std::fs::write(&path, "<?php echo 1;").unwrap();
        assert_eq!(read_source(Some(&path)).unwrap(), "<?php echo 1;");
    }

    #[test]
    fn read_source_missing_file_names_it() {
        let err = read_source(Some(Path::new("/nonexistent/snippet.php"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snippet.php"));
    }
}
