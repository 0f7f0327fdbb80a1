//! PTY-backed Tinker session
//!
//! Spawns a shell in a pseudo-terminal inside the Laravel project, starts
//! Tinker in it, and relays bytes between the process and a terminal surface.

mod backend;
mod bridge;
mod channel;
mod config;
mod error;
mod relay;
mod session;
mod shell;

pub use backend::{
    MockPtyBackend, ProcessControl, PtyBackend, PtyProcess, RealPtyBackend, SpawnRequest,
    create_backend,
};
pub use bridge::{BridgePhase, SessionBridge};
pub use channel::{BridgeEnd, SurfaceEnd, SurfaceEvent, SurfaceInput, terminal_channel};
pub use config::{BridgeConfig, DEFAULT_BOOTSTRAP_COMMAND, DEFAULT_COLS, DEFAULT_ROWS};
pub use error::{BridgeError, PtyError};
pub use session::TinkerSession;
pub use shell::resolve_shell;
