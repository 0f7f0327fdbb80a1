//! Diagnostic output channel
//!
//! An append-only text sink for status messages and raw PTY output. The
//! host constructs exactly one and injects it wherever it is needed; it is
//! disposed when the extension deactivates.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only log surface
pub trait OutputChannel: Send + Sync {
    fn append_line(&self, message: &str);

    fn append(&self, message: &str);

    fn clear(&self);

    /// Reveal the channel to the user
    fn show(&self);

    /// Release the underlying resource; later writes are dropped
    fn dispose(&self);
}

/// In-memory channel
#[derive(Debug, Default)]
pub struct MemoryOutputChannel {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    buffer: String,
    shown: usize,
    disposed: bool,
}

impl MemoryOutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.lock().buffer.clone()
    }

    pub fn show_count(&self) -> usize {
        self.lock().shown
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OutputChannel for MemoryOutputChannel {
    fn append_line(&self, message: &str) {
        let mut inner = self.lock();
        if !inner.disposed {
            inner.buffer.push_str(message);
            inner.buffer.push('\n');
        }
    }

    fn append(&self, message: &str) {
        let mut inner = self.lock();
        if !inner.disposed {
            inner.buffer.push_str(message);
        }
    }

    fn clear(&self) {
        self.lock().buffer.clear();
    }

    fn show(&self) {
        self.lock().shown += 1;
    }

    fn dispose(&self) {
        self.lock().disposed = true;
    }
}

/// Channel backed by an append-only file
pub struct FileOutputChannel {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileOutputChannel {
    /// Open (or create) the log file, creating parent directories
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, message: &str) {
        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_mut()
            && let Err(e) = file.write_all(message.as_bytes())
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write output log");
        }
    }
}

impl OutputChannel for FileOutputChannel {
    fn append_line(&self, message: &str) {
        self.write(message);
        self.write("\n");
    }

    fn append(&self, message: &str) {
        self.write(message);
    }

    fn clear(&self) {
        let guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_ref()
            && let Err(e) = file.set_len(0)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to clear output log");
        }
    }

    fn show(&self) {
        tracing::info!(path = %self.path.display(), "Output log");
    }

    fn dispose(&self) {
        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut file) = guard.take() {
            let _ = file.flush();
        }
    }
}
