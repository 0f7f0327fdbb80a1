use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tinker_core::locate_with_markers;

use super::workspace_folders;
use crate::config::TinkerConfig;

#[derive(Args)]
pub struct LocateArgs {
    /// Folders to search, in order (configured folders or the current directory when omitted)
    pub folders: Vec<PathBuf>,
}

pub async fn run(args: LocateArgs, config: &TinkerConfig) -> Result<()> {
    let folders = workspace_folders(&args.folders, config)?;

    match locate_with_markers(&folders, &config.markers()).await {
        Some(root) => {
            println!("{}", root.display());
            Ok(())
        }
        None => anyhow::bail!("Unable to locate Laravel project."),
    }
}
