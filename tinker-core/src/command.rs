//! The `tinker.run` command

use crate::extract::retrieve_content;
use crate::host::EditorHost;
use crate::normalize::minify_php;
use crate::pty::{BridgeError, SessionBridge};

/// Identifier the run command is registered under
pub const RUN_COMMAND: &str = "tinker.run";

/// Display name used in user-facing messages
pub const EXTENSION_NAME: &str = "Laravel Tinker";

/// How a run request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No editor was focused; the user was told
    NoEditor,
    /// The editor held nothing to run; the user was told
    NoCode,
    /// Code was handed to the session
    Submitted,
}

/// Run the active editor's selection (or whole document) in Tinker
pub async fn run_command(
    host: &dyn EditorHost,
    bridge: &SessionBridge,
) -> Result<RunOutcome, BridgeError> {
    let Some(editor) = host.active_editor() else {
        host.show_error_message("No active editor open.").await;
        return Ok(RunOutcome::NoEditor);
    };

    let Some(code) = retrieve_content(Some(editor.as_ref())) else {
        host.show_error_message("No code to run.").await;
        return Ok(RunOutcome::NoCode);
    };

    let payload = minify_php(&code);
    tracing::debug!(payload = %payload, "Running code in Tinker");
    bridge.run(&payload).await?;

    Ok(RunOutcome::Submitted)
}
