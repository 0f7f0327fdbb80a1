//! Collaborators supplied by the host editor
//!
//! The core never renders anything or talks to a real editor. A host (the
//! `tinker` CLI, an editor plugin, a test double) implements these traits.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::extract::TextEditor;
use crate::pty::SurfaceEnd;

/// A terminal surface created by the host for a session
pub trait TerminalSurface: Send + Sync {
    /// Bring the terminal to the front
    fn show(&self);
}

/// Editor services the extension depends on
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// The focused editor, if any
    fn active_editor(&self) -> Option<Box<dyn TextEditor>>;

    /// Workspace root folders, in the host's order
    fn workspace_folders(&self) -> Vec<PathBuf>;

    /// Create a terminal surface driven by `channel`. The host renders what
    /// arrives on the channel and reports keystrokes and closure back.
    fn create_terminal(
        &self,
        name: &str,
        channel: SurfaceEnd,
    ) -> Result<Box<dyn TerminalSurface>, String>;

    async fn show_error_message(&self, message: &str);

    async fn show_information_message(&self, message: &str);

    /// Clear the active terminal's scrollback
    async fn clear_terminal(&self);
}
