//! Extension lifecycle: activation, command dispatch, deactivation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::{EXTENSION_NAME, RUN_COMMAND, RunOutcome, run_command};
use crate::error::TinkerError;
use crate::host::EditorHost;
use crate::output::OutputChannel;
use crate::pty::{BridgeConfig, PtyBackend, SessionBridge, create_backend};

/// An activated extension. Owns the session bridge and the log it shares.
pub struct Extension {
    host: Arc<dyn EditorHost>,
    output: Arc<dyn OutputChannel>,
    bridge: SessionBridge,
    commands: Vec<&'static str>,
    active: AtomicBool,
}

impl Extension {
    /// Activate with the PTY backend chosen by `config`
    pub fn activate(
        host: Arc<dyn EditorHost>,
        output: Arc<dyn OutputChannel>,
        config: BridgeConfig,
    ) -> Self {
        let backend = create_backend(&config);
        Self::activate_with_backend(host, output, config, backend)
    }

    pub fn activate_with_backend(
        host: Arc<dyn EditorHost>,
        output: Arc<dyn OutputChannel>,
        config: BridgeConfig,
        backend: Arc<dyn PtyBackend>,
    ) -> Self {
        output.append_line(&format!(
            "Congratulations, your extension \"{EXTENSION_NAME}\" is now active!"
        ));
        tracing::info!(commands = ?[RUN_COMMAND], "Extension activated");

        let bridge =
            SessionBridge::with_backend(config, backend, Arc::clone(&host), Arc::clone(&output));

        Self {
            host,
            output,
            bridge,
            commands: vec![RUN_COMMAND],
            active: AtomicBool::new(true),
        }
    }

    /// Registered command identifiers
    pub fn commands(&self) -> &[&'static str] {
        &self.commands
    }

    pub fn bridge(&self) -> &SessionBridge {
        &self.bridge
    }

    pub fn output(&self) -> &Arc<dyn OutputChannel> {
        &self.output
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Dispatch a command by identifier
    pub async fn execute(&self, command_id: &str) -> Result<RunOutcome, TinkerError> {
        if !self.is_active() {
            return Err(TinkerError::Deactivated);
        }

        match command_id {
            RUN_COMMAND => Ok(run_command(self.host.as_ref(), &self.bridge).await?),
            other => {
                tracing::warn!(command = %other, "Unknown command");
                Err(TinkerError::UnknownCommand(other.to_string()))
            }
        }
    }

    /// Dispose the session, then the log. Later calls do nothing.
    pub fn deactivate(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Extension deactivating");
        self.bridge.dispose();
        self.output.dispose();
    }
}

impl Drop for Extension {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{TextDocument, TextEditor};
    use crate::output::MemoryOutputChannel;
    use crate::pty::{MockPtyBackend, SurfaceEnd};
    use crate::host::TerminalSurface;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubHost {
        editor: Option<String>,
        errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EditorHost for StubHost {
        fn active_editor(&self) -> Option<Box<dyn TextEditor>> {
            self.editor
                .as_ref()
                .map(|text| Box::new(TextDocument::new(text.clone())) as Box<dyn TextEditor>)
        }

        fn workspace_folders(&self) -> Vec<PathBuf> {
            Vec::new()
        }

        fn create_terminal(
            &self,
            _name: &str,
            _channel: SurfaceEnd,
        ) -> Result<Box<dyn TerminalSurface>, String> {
            Err("no terminals here".to_string())
        }

        async fn show_error_message(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        async fn show_information_message(&self, _message: &str) {}

        async fn clear_terminal(&self) {}
    }

    fn activate(host: Arc<StubHost>) -> (Extension, Arc<MemoryOutputChannel>) {
        let output = Arc::new(MemoryOutputChannel::new());
        let extension = Extension::activate_with_backend(
            host,
            output.clone(),
            BridgeConfig::default(),
            Arc::new(MockPtyBackend::new()),
        );
        (extension, output)
    }

    #[test]
    fn activation_greets_and_registers_run() {
        let (extension, output) = activate(Arc::new(StubHost::default()));

        assert_eq!(extension.commands(), &["tinker.run"]);
        assert_eq!(
            output.contents(),
            "Congratulations, your extension \"Laravel Tinker\" is now active!\n"
        );
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let (extension, _) = activate(Arc::new(StubHost::default()));

        let result = extension.execute("tinker.other").await;

        assert!(matches!(result, Err(TinkerError::UnknownCommand(id)) if id == "tinker.other"));
    }

    #[tokio::test]
    async fn run_without_editor_notifies_user() {
        let host = Arc::new(StubHost::default());
        let (extension, _) = activate(host.clone());

        let outcome = extension.execute(RUN_COMMAND).await.unwrap();

        assert_eq!(outcome, RunOutcome::NoEditor);
        assert_eq!(*host.errors.lock().unwrap(), vec!["No active editor open."]);
    }

    #[tokio::test]
    async fn run_with_blank_editor_notifies_user() {
        let host = Arc::new(StubHost {
            editor: Some("   \n".to_string()),
            ..StubHost::default()
        });
        let (extension, _) = activate(host.clone());

        let outcome = extension.execute(RUN_COMMAND).await.unwrap();

        assert_eq!(outcome, RunOutcome::NoCode);
        assert_eq!(*host.errors.lock().unwrap(), vec!["No code to run."]);
    }

    #[tokio::test]
    async fn run_outside_a_project_reports_error() {
        let host = Arc::new(StubHost {
            editor: Some("User::count();".to_string()),
            ..StubHost::default()
        });
        let (extension, _) = activate(host.clone());

        let result = extension.execute(RUN_COMMAND).await;

        assert!(matches!(
            result,
            Err(TinkerError::Bridge(crate::pty::BridgeError::ProjectNotFound))
        ));
        assert_eq!(
            *host.errors.lock().unwrap(),
            vec!["Laravel Tinker: Unable to locate Laravel project."]
        );
    }

    #[tokio::test]
    async fn deactivate_disposes_log_and_blocks_commands() {
        let (extension, output) = activate(Arc::new(StubHost::default()));

        extension.deactivate();
        extension.deactivate();

        assert!(output.is_disposed());
        assert!(!extension.is_active());
        assert!(matches!(
            extension.execute(RUN_COMMAND).await,
            Err(TinkerError::Deactivated)
        ));
    }
}
