//! tinker-core: run editor code in a Laravel Tinker session
//!
//! This crate provides everything behind the `tinker.run` command:
//!
//! - **Extraction** - [`retrieve_content`] pulls the selection (or whole document) from a [`TextEditor`]
//! - **Normalization** - [`minify_php`] strips tags and comments and folds code onto one line
//! - **Project detection** - [`locate_project_root`] finds the Laravel root among workspace folders
//! - **Session bridge** - [`pty::SessionBridge`] owns the single PTY-backed Tinker session
//! - **Host seams** - [`EditorHost`], [`TerminalSurface`] and [`OutputChannel`] are implemented by the embedding editor
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tinker_core::{EditorHost, Extension, MemoryOutputChannel, RUN_COMMAND};
//! use tinker_core::pty::BridgeConfig;
//!
//! async fn example(host: Arc<dyn EditorHost>) -> Result<(), Box<dyn std::error::Error>> {
//!     let output = Arc::new(MemoryOutputChannel::new());
//!     let extension = Extension::activate(host, output, BridgeConfig::default());
//!
//!     // Runs the active editor's code, starting Tinker on first use
//!     let outcome = extension.execute(RUN_COMMAND).await?;
//!     println!("{outcome:?}");
//!
//!     extension.deactivate();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  text  ┌─────────────┐ payload ┌───────────────────────┐
//! │ TextEditor │───────▶│ run_command │────────▶│     SessionBridge     │
//! └────────────┘        │ minify_php  │         │ ┌───────┐  ┌───────┐  │
//!                       └─────────────┘         │ │  PTY  │◀▶│ relay │  │
//!                                               │ │tinker │  └───┬───┘  │
//!                                               │ └───────┘      │      │
//!                                               └────────────────┼──────┘
//!                                                    ┌───────────┴──────────┐
//!                                                    ▼                      ▼
//!                                           ┌─────────────────┐   ┌───────────────┐
//!                                           │ TerminalSurface │   │ OutputChannel │
//!                                           └─────────────────┘   └───────────────┘
//! ```

pub mod command;
pub mod error;
pub mod extension;
pub mod extract;
pub mod host;
pub mod normalize;
pub mod output;
pub mod project;
pub mod pty;

// Re-export key types for convenience
pub use command::{EXTENSION_NAME, RUN_COMMAND, RunOutcome, run_command};
pub use error::TinkerError;
pub use extension::Extension;
pub use extract::{Selection, TextDocument, TextEditor, retrieve_content};
pub use host::{EditorHost, TerminalSurface};
pub use normalize::minify_php;
pub use output::{FileOutputChannel, MemoryOutputChannel, OutputChannel};
pub use project::{
    ProjectError, ProjectMarkers, locate_project_root, locate_with_markers, requires_framework,
};
