//! The live Tinker session

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::backend::ProcessControl;
use crate::host::TerminalSurface;
use crate::output::OutputChannel;

/// A shell running in a PTY, paired with the terminal surface showing it
///
/// The writer and kill control are cleared when the session is disposed;
/// anything written afterwards is logged and dropped.
pub struct TinkerSession {
    pub id: String,
    pub root: PathBuf,
    pub shell: PathBuf,
    pub created_at: DateTime<Utc>,
    writer: Mutex<Option<Box<dyn Write + Send>>>,
    control: Mutex<Option<Box<dyn ProcessControl>>>,
    surface: Box<dyn TerminalSurface>,
    output: mpsc::UnboundedSender<Vec<u8>>,
    log: Arc<dyn OutputChannel>,
}

/// Parts a session is assembled from
pub(crate) struct SessionParts {
    pub root: PathBuf,
    pub shell: PathBuf,
    pub writer: Box<dyn Write + Send>,
    pub control: Box<dyn ProcessControl>,
    pub surface: Box<dyn TerminalSurface>,
    pub output: mpsc::UnboundedSender<Vec<u8>>,
    pub log: Arc<dyn OutputChannel>,
}

impl TinkerSession {
    pub(crate) fn new(parts: SessionParts) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            root: parts.root,
            shell: parts.shell,
            created_at: Utc::now(),
            writer: Mutex::new(Some(parts.writer)),
            control: Mutex::new(Some(parts.control)),
            surface: parts.surface,
            output: parts.output,
            log: parts.log,
        }
    }

    /// Write raw bytes to the process
    pub fn write(&self, data: &[u8]) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let Some(writer) = writer.as_mut() else {
            self.log.append_line("Unable to write to pty.");
            return;
        };

        if let Err(e) = writer.write_all(data).and_then(|_| writer.flush()) {
            tracing::warn!(session = %self.id, error = %e, "PTY write failed");
            self.log.append_line(&format!("Unable to write to pty: {e}"));
        }
    }

    /// Push bytes straight to the terminal surface, bypassing the process
    pub fn write_to_terminal(&self, data: &[u8]) {
        if self.output.send(data.to_vec()).is_err() {
            tracing::debug!(session = %self.id, "Terminal surface is gone");
        }
    }

    pub fn show(&self) {
        self.surface.show();
    }

    pub fn is_alive(&self) -> bool {
        self.control
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn process_id(&self) -> Option<u32> {
        self.control
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(|control| control.process_id())
    }

    /// Kill the process and drop the writer. Safe to call repeatedly.
    pub(crate) fn kill(&self) {
        self.writer.lock().unwrap_or_else(|e| e.into_inner()).take();

        let control = self.control.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(mut control) = control {
            tracing::info!(session = %self.id, pid = ?control.process_id(), "Killing PTY process");
            if let Err(e) = control.kill() {
                tracing::warn!(session = %self.id, error = %e, "Failed to kill PTY process");
            }
        }
    }
}

impl std::fmt::Debug for TinkerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TinkerSession")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("shell", &self.shell)
            .field("created_at", &self.created_at)
            .field("alive", &self.is_alive())
            .finish()
    }
}
