//! Laravel project detection
//!
//! A workspace folder is a project root when it has an `artisan` script at
//! its top level, or a `composer.json` that requires `laravel/framework`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

/// What identifies a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMarkers {
    /// File whose presence alone marks a root
    pub marker_file: String,
    /// Package key looked up in composer.json's `require` map
    pub framework_package: String,
}

impl Default for ProjectMarkers {
    fn default() -> Self {
        Self {
            marker_file: "artisan".to_string(),
            framework_package: "laravel/framework".to_string(),
        }
    }
}

/// Why a `composer.json` could not be inspected
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ComposerManifest {
    // An empty `require` is serialized as `[]` by some tools, so keep it loose.
    #[serde(default)]
    require: serde_json::Value,
}

/// First candidate that looks like a Laravel project, using the default markers
pub async fn locate_project_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    locate_with_markers(candidates, &ProjectMarkers::default()).await
}

/// First candidate matching `markers`. Candidates with an unreadable or
/// malformed `composer.json` are logged and skipped.
pub async fn locate_with_markers(
    candidates: &[PathBuf],
    markers: &ProjectMarkers,
) -> Option<PathBuf> {
    for root in candidates {
        if fs::try_exists(root.join(&markers.marker_file))
            .await
            .unwrap_or(false)
        {
            tracing::debug!(root = %root.display(), marker = %markers.marker_file, "Project root found");
            return Some(root.clone());
        }

        match requires_framework(root, &markers.framework_package).await {
            Ok(true) => {
                tracing::debug!(root = %root.display(), "Project root found via composer.json");
                return Some(root.clone());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Skipping workspace folder");
            }
        }
    }

    None
}

/// Whether `<root>/composer.json` requires `package`. A missing file is `false`.
pub async fn requires_framework(root: &Path, package: &str) -> Result<bool, ProjectError> {
    let path = root.join("composer.json");

    let contents = match fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(source) => return Err(ProjectError::Read { path, source }),
    };

    let manifest: ComposerManifest =
        serde_json::from_str(&contents).map_err(|source| ProjectError::Parse { path, source })?;

    Ok(manifest.require.get(package).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn folder_with(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn empty_candidate_list_finds_nothing() {
        assert_eq!(locate_project_root(&[]).await, None);
    }

    #[tokio::test]
    async fn artisan_alone_marks_root() {
        let dir = folder_with(&[("artisan", "#!/usr/bin/env php")]);
        let root = locate_project_root(&[dir.path().to_path_buf()]).await;
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[tokio::test]
    async fn composer_requiring_framework_marks_root() {
        let dir = folder_with(&[(
            "composer.json",
            r#"{"require": {"php": "^8.2", "laravel/framework": "^11.0"}}"#,
        )]);
        let root = locate_project_root(&[dir.path().to_path_buf()]).await;
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[tokio::test]
    async fn folder_with_neither_is_not_a_root() {
        let dir = folder_with(&[("composer.json", r#"{"require": {"symfony/console": "^7"}}"#)]);
        assert_eq!(locate_project_root(&[dir.path().to_path_buf()]).await, None);

        let empty = tempfile::tempdir().unwrap();
        assert_eq!(locate_project_root(&[empty.path().to_path_buf()]).await, None);
    }

    #[tokio::test]
    async fn composer_without_require_section_is_not_a_root() {
        let dir = folder_with(&[("composer.json", r#"{"name": "acme/app"}"#)]);
        assert_eq!(locate_project_root(&[dir.path().to_path_buf()]).await, None);
    }

    #[tokio::test]
    async fn empty_require_array_is_not_a_root() {
        let dir = folder_with(&[("composer.json", r#"{"require": []}"#)]);
        assert_eq!(locate_project_root(&[dir.path().to_path_buf()]).await, None);
    }

    #[tokio::test]
    async fn first_matching_candidate_wins() {
        let plain = tempfile::tempdir().unwrap();
        let first = folder_with(&[("artisan", "")]);
        let second = folder_with(&[("artisan", "")]);

        let candidates = vec![
            plain.path().to_path_buf(),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ];
        assert_eq!(
            locate_project_root(&candidates).await.as_deref(),
            Some(first.path())
        );
    }

    #[tokio::test]
    async fn malformed_composer_is_skipped() {
        let broken = folder_with(&[("composer.json", "{ not json")]);
        let good = folder_with(&[("artisan", "")]);

        let candidates = vec![broken.path().to_path_buf(), good.path().to_path_buf()];
        assert_eq!(
            locate_project_root(&candidates).await.as_deref(),
            Some(good.path())
        );
    }

    #[tokio::test]
    async fn requires_framework_reports_parse_errors() {
        let broken = folder_with(&[("composer.json", "[1, 2")]);
        let result = requires_framework(broken.path(), "laravel/framework").await;
        assert!(matches!(result, Err(ProjectError::Parse { .. })));
    }

    #[tokio::test]
    async fn custom_markers_are_honoured() {
        let dir = folder_with(&[("composer.json", r#"{"require": {"acme/framework": "1.0"}}"#)]);
        let markers = ProjectMarkers {
            marker_file: "console".to_string(),
            framework_package: "acme/framework".to_string(),
        };
        let root = locate_with_markers(&[dir.path().to_path_buf()], &markers).await;
        assert_eq!(root.as_deref(), Some(dir.path()));
    }
}
