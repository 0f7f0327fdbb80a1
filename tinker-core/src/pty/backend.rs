//! PTY backend trait and implementations
//!
//! The bridge never touches `portable_pty` directly: it asks a
//! [`PtyBackend`] for a process and gets back its reader, writer and kill
//! control. The mock backend records every spawn and captures every byte
//! written, which is what the bridge tests assert against.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use portable_pty::{Child, CommandBuilder, MasterPty, PtySize, native_pty_system};

use super::{BridgeConfig, PtyError};

/// Everything needed to start the shell inside a PTY
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub cols: u16,
    pub rows: u16,
    /// Extra variables layered over the inherited environment
    pub env: Vec<(String, String)>,
}

/// Kill switch for a spawned process
pub trait ProcessControl: Send {
    fn kill(&mut self) -> io::Result<()>;

    fn process_id(&self) -> Option<u32>;
}

/// A live process attached to a PTY
pub struct PtyProcess {
    pub reader: Box<dyn Read + Send>,
    pub writer: Box<dyn Write + Send>,
    pub control: Box<dyn ProcessControl>,
}

/// Trait for PTY backend implementations
pub trait PtyBackend: Send + Sync {
    fn spawn(&self, request: &SpawnRequest) -> Result<PtyProcess, PtyError>;
}

/// Real PTY backend using portable_pty
#[derive(Debug, Default)]
pub struct RealPtyBackend;

impl RealPtyBackend {
    pub fn new() -> Self {
        Self
    }
}

struct NativeProcess {
    // Dropping the master closes the PTY, so it lives as long as the child.
    _master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
}

impl ProcessControl for NativeProcess {
    fn kill(&mut self) -> io::Result<()> {
        if let Ok(Some(status)) = self.child.try_wait() {
            tracing::debug!(status = ?status, "PTY process already exited");
            return Ok(());
        }
        self.child.kill()?;
        let _ = self.child.try_wait();
        Ok(())
    }

    fn process_id(&self) -> Option<u32> {
        self.child.process_id()
    }
}

impl PtyBackend for RealPtyBackend {
    fn spawn(&self, request: &SpawnRequest) -> Result<PtyProcess, PtyError> {
        tracing::info!(
            program = %request.program.display(),
            cwd = %request.cwd.display(),
            cols = request.cols,
            rows = request.rows,
            "Spawning PTY process"
        );

        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows: request.rows,
                cols: request.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| PtyError::CreateFailed(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&request.program);
        cmd.args(&request.args);
        cmd.cwd(&request.cwd);
        for (key, value) in &request.env {
            cmd.env(key, value);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| PtyError::SpawnFailed(e.to_string()))?;

        // The slave end belongs to the child now; keeping it open here would
        // stop the reader from ever seeing EOF.
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| PtyError::IoError(io::Error::other(e)))?;

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| PtyError::IoError(io::Error::other(e)))?;

        Ok(PtyProcess {
            reader,
            writer,
            control: Box::new(NativeProcess {
                _master: pair.master,
                child,
            }),
        })
    }
}

/// Shared view into what the mock backend has seen
#[derive(Default)]
struct MockState {
    requests: Vec<SpawnRequest>,
    written: Vec<u8>,
    output: Option<mpsc::Sender<Vec<u8>>>,
    kills: usize,
    fail_next: Option<String>,
}

/// Mock PTY backend for testing - spawns no real process.
///
/// Clones share state, so a test keeps one clone and hands another to the
/// bridge.
#[derive(Clone, Default)]
pub struct MockPtyBackend {
    state: Arc<Mutex<MockState>>,
    failure: Option<String>,
}

impl MockPtyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every spawn fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn spawn_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<SpawnRequest> {
        self.lock().requests.clone()
    }

    /// Every byte written to any mock process, in order
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    pub fn written_string(&self) -> String {
        String::from_utf8_lossy(&self.written()).into_owned()
    }

    pub fn kill_count(&self) -> usize {
        self.lock().kills
    }

    /// Fail only the next spawn with the given message
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Make the current mock process emit output. Returns false when no
    /// process is running.
    pub fn emit(&self, data: &[u8]) -> bool {
        match &self.lock().output {
            Some(tx) => tx.send(data.to_vec()).is_ok(),
            None => false,
        }
    }

    /// Simulate the process exiting on its own
    pub fn exit(&self) {
        self.lock().output = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Reader fed through a channel; EOF once the sender is gone
struct MockReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.rx.recv() {
                Ok(chunk) => self.pending = chunk,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

/// Writer that records into the shared mock state
struct MockWriter {
    state: Arc<Mutex<MockState>>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct MockControl {
    state: Arc<Mutex<MockState>>,
}

impl ProcessControl for MockControl {
    fn kill(&mut self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.kills += 1;
        state.output = None;
        Ok(())
    }

    fn process_id(&self) -> Option<u32> {
        None
    }
}

impl PtyBackend for MockPtyBackend {
    fn spawn(&self, request: &SpawnRequest) -> Result<PtyProcess, PtyError> {
        tracing::info!(
            program = %request.program.display(),
            cwd = %request.cwd.display(),
            "Creating mock PTY process (no real process)"
        );

        if let Some(message) = &self.failure {
            return Err(PtyError::SpawnFailed(message.clone()));
        }
        if let Some(message) = self.lock().fail_next.take() {
            return Err(PtyError::SpawnFailed(message));
        }

        let (tx, rx) = mpsc::channel();
        {
            let mut state = self.lock();
            state.requests.push(request.clone());
            state.output = Some(tx);
        }

        Ok(PtyProcess {
            reader: Box::new(MockReader {
                rx,
                pending: Vec::new(),
            }),
            writer: Box::new(MockWriter {
                state: Arc::clone(&self.state),
            }),
            control: Box::new(MockControl {
                state: Arc::clone(&self.state),
            }),
        })
    }
}

/// Create the appropriate backend based on configuration
pub fn create_backend(config: &BridgeConfig) -> Arc<dyn PtyBackend> {
    if config.mock_mode {
        tracing::info!("Using mock PTY backend");
        Arc::new(MockPtyBackend::new())
    } else {
        tracing::info!("Using real PTY backend");
        Arc::new(RealPtyBackend::new())
    }
}
