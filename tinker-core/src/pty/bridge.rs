//! The Tinker session bridge
//!
//! Owns at most one [`TinkerSession`] and creates it lazily on the first
//! [`run`](SessionBridge::run). Concurrent callers that arrive while the
//! session is being set up wait on a watch channel and share the outcome.
//!
//! ```text
//!            run()                 setup ok
//!   Absent ───────▶ Initializing ───────────▶ Ready
//!     ▲                  │                      │
//!     │   setup failed,  │                      │ surface closed,
//!     │   disposed       │                      │ process exited,
//!     ├──────────────────┘                      │ dispose()
//!     └─────────────────────────────────────────┘
//! ```
//!
//! Disposing while a session is being set up marks the setup as abandoned.
//! The setup still runs to completion, then kills the process it started
//! instead of publishing it.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, watch};

use super::backend::{PtyBackend, PtyProcess, SpawnRequest};
use super::channel::{BridgeEnd, SurfaceEvent, terminal_channel};
use super::config::BridgeConfig;
use super::error::BridgeError;
use super::relay;
use super::session::{SessionParts, TinkerSession};
use super::shell::resolve_shell;
use crate::command::EXTENSION_NAME;
use crate::host::EditorHost;
use crate::output::OutputChannel;
use crate::project::locate_with_markers;

/// Coarse view of the bridge state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    Absent,
    Initializing,
    Ready,
}

#[derive(Debug, Clone)]
enum InitStatus {
    Pending,
    Ready,
    Failed(String),
}

enum SessionState {
    Absent,
    Initializing {
        status: watch::Receiver<InitStatus>,
        disposed: bool,
    },
    Ready(Arc<TinkerSession>),
}

/// What a caller of [`SessionBridge::session`] must do next
enum Next {
    Wait(watch::Receiver<InitStatus>),
    Start(watch::Sender<InitStatus>),
}

pub(crate) struct BridgeInner {
    config: BridgeConfig,
    backend: Arc<dyn PtyBackend>,
    host: Arc<dyn EditorHost>,
    log: Arc<dyn OutputChannel>,
    state: Mutex<SessionState>,
}

impl BridgeInner {
    pub(crate) fn log(&self) -> &dyn OutputChannel {
        self.log.as_ref()
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Dispose the current session, but only if it is the one named
    pub(crate) fn dispose_session(&self, session_id: &str) {
        let session = {
            let mut state = self.lock_state();
            if !matches!(&*state, SessionState::Ready(session) if session.id == session_id) {
                return;
            }
            std::mem::replace(&mut *state, SessionState::Absent)
        };
        if let SessionState::Ready(session) = session {
            session.kill();
        }
    }
}

/// Resets the bridge if an initialization is abandoned before finishing
struct InitGuard<'a> {
    inner: &'a BridgeInner,
    tx: Option<watch::Sender<InitStatus>>,
}

impl InitGuard<'_> {
    fn finish(mut self, state: SessionState, status: InitStatus) {
        *self.inner.lock_state() = state;
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(status);
        }
    }

    /// Publish the session as Ready unless it was disposed meanwhile.
    /// Returns false when the caller must discard it.
    fn promote(mut self, session: &Arc<TinkerSession>) -> bool {
        let disposed = {
            let mut state = self.inner.lock_state();
            let disposed = matches!(*state, SessionState::Initializing { disposed: true, .. });
            *state = if disposed {
                SessionState::Absent
            } else {
                SessionState::Ready(Arc::clone(session))
            };
            disposed
        };
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(if disposed {
                InitStatus::Failed(BridgeError::Disposed.to_string())
            } else {
                InitStatus::Ready
            });
        }
        !disposed
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            *self.inner.lock_state() = SessionState::Absent;
            let _ = tx.send(InitStatus::Failed(
                "initialization was cancelled".to_string(),
            ));
        }
    }
}

/// Handle to the singleton Tinker session. Clones share the same session.
#[derive(Clone)]
pub struct SessionBridge {
    inner: Arc<BridgeInner>,
}

impl SessionBridge {
    pub fn with_backend(
        config: BridgeConfig,
        backend: Arc<dyn PtyBackend>,
        host: Arc<dyn EditorHost>,
        log: Arc<dyn OutputChannel>,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                config,
                backend,
                host,
                log,
                state: Mutex::new(SessionState::Absent),
            }),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> BridgePhase {
        match &*self.inner.lock_state() {
            SessionState::Absent => BridgePhase::Absent,
            SessionState::Initializing { .. } => BridgePhase::Initializing,
            SessionState::Ready(_) => BridgePhase::Ready,
        }
    }

    /// The ready session, if there is one. Never starts initialization.
    pub fn current(&self) -> Option<Arc<TinkerSession>> {
        match &*self.inner.lock_state() {
            SessionState::Ready(session) => Some(Arc::clone(session)),
            _ => None,
        }
    }

    /// The session, creating it if needed
    pub async fn session(&self) -> Result<Arc<TinkerSession>, BridgeError> {
        loop {
            let next = {
                let mut state = self.inner.lock_state();
                let waiter = match &*state {
                    SessionState::Ready(session) => return Ok(Arc::clone(session)),
                    SessionState::Initializing { status, .. } => Some(status.clone()),
                    SessionState::Absent => None,
                };
                match waiter {
                    Some(rx) => Next::Wait(rx),
                    None => {
                        let (tx, rx) = watch::channel(InitStatus::Pending);
                        *state = SessionState::Initializing {
                            status: rx,
                            disposed: false,
                        };
                        Next::Start(tx)
                    }
                }
            };

            let mut rx = match next {
                Next::Start(tx) => return self.initialize(tx).await,
                Next::Wait(rx) => rx,
            };

            let timeout = self.inner.config.init_timeout;
            tracing::debug!("Waiting for in-flight session initialization");
            let status = match tokio::time::timeout(
                timeout,
                rx.wait_for(|status| !matches!(status, InitStatus::Pending)),
            )
            .await
            {
                Err(_) => return Err(BridgeError::InitTimeout(timeout)),
                Ok(Err(_)) => InitStatus::Failed("initialization was abandoned".to_string()),
                Ok(Ok(status)) => status.clone(),
            };

            if let InitStatus::Failed(message) = status {
                return Err(BridgeError::InitializationFailed(message));
            }
            // Ready: loop round to pick the session up from the state
        }
    }

    /// Submit code to the REPL
    pub async fn run(&self, code: &str) -> Result<(), BridgeError> {
        let session = self.session().await?;

        session.show();
        session.write(b"\r");
        self.inner.host.clear_terminal().await;
        session.write(code.as_bytes());
        session.write(b"\r");

        tracing::debug!(session = %session.id, bytes = code.len(), "Submitted code");
        Ok(())
    }

    /// Write raw bytes to the current session's process
    pub fn write_to_pty(&self, data: &[u8]) {
        match self.current() {
            Some(session) => session.write(data),
            None => self.inner.log.append_line("Unable to write to pty."),
        }
    }

    /// Tear the session down. A setup in flight is abandoned and kills its
    /// process once it completes. Never starts a session.
    pub fn dispose(&self) {
        let state = {
            let mut state = self.inner.lock_state();
            match &mut *state {
                SessionState::Absent => return,
                SessionState::Initializing { disposed, .. } => {
                    tracing::info!("Abandoning Tinker session setup");
                    *disposed = true;
                    return;
                }
                SessionState::Ready(_) => {}
            }
            std::mem::replace(&mut *state, SessionState::Absent)
        };
        if let SessionState::Ready(session) = state {
            tracing::info!(session = %session.id, "Disposing Tinker session");
            session.kill();
        }
    }

    async fn initialize(
        &self,
        tx: watch::Sender<InitStatus>,
    ) -> Result<Arc<TinkerSession>, BridgeError> {
        let guard = InitGuard {
            inner: &self.inner,
            tx: Some(tx),
        };

        tracing::info!("Initializing Tinker session");
        match self.build_session().await {
            Ok((session, events)) => {
                if !guard.promote(&session) {
                    tracing::info!(session = %session.id, "Tinker session disposed during setup");
                    session.kill();
                    return Err(BridgeError::Disposed);
                }
                tokio::spawn(relay::forward_surface_events(
                    Arc::downgrade(&self.inner),
                    Arc::downgrade(&session),
                    session.id.clone(),
                    events,
                ));
                tracing::info!(session = %session.id, root = %session.root.display(), "Tinker session ready");
                Ok(session)
            }
            Err(e) => {
                tracing::error!(error = %e, "Tinker session failed to start");
                guard.finish(SessionState::Absent, InitStatus::Failed(e.to_string()));
                self.inner
                    .host
                    .show_error_message(&format!("{EXTENSION_NAME}: {e}"))
                    .await;
                Err(e)
            }
        }
    }

    async fn build_session(
        &self,
    ) -> Result<(Arc<TinkerSession>, mpsc::UnboundedReceiver<SurfaceEvent>), BridgeError> {
        let inner = &self.inner;
        let config = &inner.config;

        let shell = resolve_shell(config.shell.as_deref())?;

        let folders = inner.host.workspace_folders();
        let root = locate_with_markers(&folders, &config.markers)
            .await
            .ok_or(BridgeError::ProjectNotFound)?;

        let request = SpawnRequest {
            program: shell.clone(),
            args: Vec::new(),
            cwd: root.clone(),
            cols: config.cols,
            rows: config.rows,
            env: vec![("TERM".to_string(), config.term_name.clone())],
        };
        let backend = Arc::clone(&inner.backend);
        let PtyProcess {
            reader,
            writer,
            mut control,
        } = tokio::task::spawn_blocking(move || backend.spawn(&request))
            .await
            .map_err(|e| BridgeError::InitializationFailed(e.to_string()))??;
        tracing::info!(shell = %shell.display(), pid = ?control.process_id(), "Spawned shell");

        let (bridge_end, surface_end) = terminal_channel();
        let BridgeEnd {
            output,
            events,
            event_tx,
        } = bridge_end;

        let surface = match inner.host.create_terminal(&config.terminal_name, surface_end) {
            Ok(surface) => surface,
            Err(message) => {
                let _ = control.kill();
                return Err(BridgeError::Host(message));
            }
        };

        if let Err(e) = relay::spawn_reader(reader, output.clone(), event_tx, Arc::clone(&inner.log))
        {
            let _ = control.kill();
            return Err(BridgeError::InitializationFailed(format!(
                "Unable to start PTY reader: {e}"
            )));
        }

        let session = Arc::new(TinkerSession::new(SessionParts {
            root,
            shell,
            writer,
            control,
            surface,
            output,
            log: Arc::clone(&inner.log),
        }));

        session.write(format!("{}\r", config.bootstrap_command).as_bytes());
        Ok((session, events))
    }
}

impl std::fmt::Debug for SessionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBridge")
            .field("phase", &self.phase())
            .finish()
    }
}
