//! Command-line editor host
//!
//! The "editor" is a file read from disk, the workspace folders come from
//! flags or config, and the terminal surface is the user's own terminal.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::Event;
use tokio::task::JoinHandle;

use tinker_core::pty::{SurfaceEnd, SurfaceInput};
use tinker_core::{EditorHost, TerminalSurface, TextDocument, TextEditor};

use crate::terminal::{self, KeyAction, RawTerminal};

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Host backed by the process's own terminal
pub struct TerminalHost {
    editor: Option<TextDocument>,
    folders: Vec<PathBuf>,
    interactive: bool,
    pump: Mutex<Option<JoinHandle<()>>>,
    keys: Mutex<Option<std::thread::JoinHandle<()>>>,
    stop_keys: Arc<AtomicBool>,
}

impl TerminalHost {
    /// `interactive` attaches the keyboard to the session in raw mode
    pub fn new(editor: Option<TextDocument>, folders: Vec<PathBuf>, interactive: bool) -> Self {
        Self {
            editor,
            folders,
            interactive,
            pump: Mutex::new(None),
            keys: Mutex::new(None),
            stop_keys: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wait until the session's output stream has ended and the keyboard
    /// has been handed back in cooked mode
    pub async fn wait_closed(&self) {
        let pump = self.pump.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(pump) = pump
            && let Err(e) = pump.await
        {
            tracing::warn!(error = %e, "Output pump failed");
        }

        self.stop_keys.store(true, Ordering::SeqCst);
        let keys = self.keys.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(keys) = keys {
            match tokio::task::spawn_blocking(move || keys.join()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => tracing::warn!("Keyboard thread panicked"),
                Err(e) => tracing::warn!(error = %e, "Unable to join keyboard thread"),
            }
        }
    }

    /// Run `read_keys` on its own thread until `stop_keys` is raised
    fn start_keys<F>(&self, read_keys: F) -> std::io::Result<()>
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let stop = Arc::clone(&self.stop_keys);
        let handle = std::thread::Builder::new()
            .name("tinker-keys".to_string())
            .spawn(move || read_keys(stop))?;
        *self.keys.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(())
    }
}

/// Terminal surface that is the process's own terminal
struct ConsoleSurface {
    name: String,
}

impl TerminalSurface for ConsoleSurface {
    fn show(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = crossterm::execute!(stdout, crossterm::terminal::SetTitle(&self.name)) {
            tracing::debug!(error = %e, "Unable to set terminal title");
        }
    }
}

#[async_trait]
impl EditorHost for TerminalHost {
    fn active_editor(&self) -> Option<Box<dyn TextEditor>> {
        self.editor
            .clone()
            .map(|doc| Box::new(doc) as Box<dyn TextEditor>)
    }

    fn workspace_folders(&self) -> Vec<PathBuf> {
        self.folders.clone()
    }

    fn create_terminal(
        &self,
        name: &str,
        mut channel: SurfaceEnd,
    ) -> Result<Box<dyn TerminalSurface>, String> {
        if self.interactive {
            let input = channel.input_sender();
            self.start_keys(move |stop| forward_keys(input, stop))
                .map_err(|e| format!("Unable to read the keyboard: {e}"))?;
        }

        channel.open();
        let pump = tokio::spawn(async move {
            while let Some(chunk) = channel.recv_output().await {
                if let Err(e) = terminal::write_stdout(&chunk) {
                    tracing::warn!(error = %e, "Unable to write to stdout");
                    channel.close();
                    break;
                }
            }
            tracing::debug!("Terminal output ended");
        });
        *self.pump.lock().unwrap_or_else(|e| e.into_inner()) = Some(pump);

        Ok(Box::new(ConsoleSurface {
            name: name.to_string(),
        }))
    }

    async fn show_error_message(&self, message: &str) {
        eprint!("{message}\r\n");
    }

    async fn show_information_message(&self, message: &str) {
        eprint!("{message}\r\n");
    }

    async fn clear_terminal(&self) {
        if let Err(e) = terminal::clear_screen() {
            tracing::warn!(error = %e, "Unable to clear terminal");
        }
    }
}

/// Read keys in raw mode and forward them until detach or shutdown
fn forward_keys(input: SurfaceInput, stop: Arc<AtomicBool>) {
    let raw = match RawTerminal::new() {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Unable to enable raw mode");
            return;
        }
    };

    while !stop.load(Ordering::SeqCst) {
        let event = match raw.read_event(KEY_POLL_INTERVAL) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Keyboard read failed");
                break;
            }
        };

        let Event::Key(key) = event else {
            continue;
        };

        match terminal::encode_key(key) {
            KeyAction::Send(bytes) => {
                if !input.send(bytes) {
                    break;
                }
            }
            KeyAction::Detach => {
                tracing::info!("Detaching from Tinker session");
                input.close();
                break;
            }
            KeyAction::Ignore => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinker_core::pty::{SurfaceEvent, terminal_channel};

    #[test]
    fn editor_is_the_loaded_document() {
        let host = TerminalHost::new(Some(TextDocument::new("User::all();")), Vec::new(), false);
        let editor = host.active_editor().unwrap();
        assert_eq!(editor.document_text(), "User::all();");
    }

    #[test]
    fn no_document_means_no_editor() {
        let host = TerminalHost::new(None, vec![PathBuf::from("/srv/app")], false);
        assert!(host.active_editor().is_none());
        assert_eq!(host.workspace_folders(), vec![PathBuf::from("/srv/app")]);
    }

    #[tokio::test]
    async fn surface_opens_and_ends_with_the_session() {
        let host = TerminalHost::new(None, Vec::new(), false);
        let (mut bridge, surface) = terminal_channel();

        host.create_terminal("Tinker", surface).unwrap();
        assert_eq!(bridge.events.recv().await, Some(SurfaceEvent::Opened));

        drop(bridge);
        tokio::time::timeout(Duration::from_secs(5), host.wait_closed())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_closed_returns_only_after_key_thread_exits() {
        let host = TerminalHost::new(None, Vec::new(), false);
        let restored = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&restored);
        host.start_keys(move |stop| {
            while !stop.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
            // Stands in for the raw-mode guard being dropped mid-poll
            std::thread::sleep(KEY_POLL_INTERVAL);
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();

        tokio::time::timeout(Duration::from_secs(5), host.wait_closed())
            .await
            .unwrap();

        assert!(restored.load(Ordering::SeqCst));
    }
}
