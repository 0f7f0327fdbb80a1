//! Bidirectional channel between the session bridge and a terminal surface
//!
//! Output flows bridge → surface as raw byte chunks. Everything the
//! surface does (open, keystrokes, close) flows surface → bridge as
//! [`SurfaceEvent`]s. Closing is explicit: the surface sends `Closed`, and
//! the bridge dropping its output sender ends the surface's output stream.

use tokio::sync::mpsc;

/// Events travelling from the terminal surface (or the PTY reader) to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface is ready to render
    Opened,
    /// Keystrokes typed into the surface
    Input(Vec<u8>),
    /// The surface was closed by the user
    Closed,
    /// The PTY process reached end of output
    ProcessExited,
}

/// Bridge side: pushes output, receives surface events
pub struct BridgeEnd {
    pub output: mpsc::UnboundedSender<Vec<u8>>,
    pub events: mpsc::UnboundedReceiver<SurfaceEvent>,
    pub(crate) event_tx: mpsc::UnboundedSender<SurfaceEvent>,
}

/// Surface side: receives output, reports input and lifecycle
pub struct SurfaceEnd {
    output: mpsc::UnboundedReceiver<Vec<u8>>,
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

/// Create a connected pair of channel ends
pub fn terminal_channel() -> (BridgeEnd, SurfaceEnd) {
    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    (
        BridgeEnd {
            output: output_tx,
            events: event_rx,
            event_tx: event_tx.clone(),
        },
        SurfaceEnd {
            output: output_rx,
            events: event_tx,
        },
    )
}

impl SurfaceEnd {
    /// Wait for the next output chunk. `None` once the session is gone.
    pub async fn recv_output(&mut self) -> Option<Vec<u8>> {
        self.output.recv().await
    }

    /// Non-blocking variant of [`recv_output`](Self::recv_output)
    pub fn try_recv_output(&mut self) -> Option<Vec<u8>> {
        self.output.try_recv().ok()
    }

    pub fn open(&self) -> bool {
        self.events.send(SurfaceEvent::Opened).is_ok()
    }

    /// Forward keystrokes to the process. Returns false if the bridge is gone.
    pub fn send_input(&self, data: impl Into<Vec<u8>>) -> bool {
        self.events.send(SurfaceEvent::Input(data.into())).is_ok()
    }

    pub fn close(&self) -> bool {
        self.events.send(SurfaceEvent::Closed).is_ok()
    }

    /// A detached sender for input, for use from another task or thread
    pub fn input_sender(&self) -> SurfaceInput {
        SurfaceInput {
            events: self.events.clone(),
        }
    }
}

/// Cloneable handle that only reports input and closure
#[derive(Clone)]
pub struct SurfaceInput {
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl SurfaceInput {
    pub fn send(&self, data: impl Into<Vec<u8>>) -> bool {
        self.events.send(SurfaceEvent::Input(data.into())).is_ok()
    }

    pub fn close(&self) -> bool {
        self.events.send(SurfaceEvent::Closed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_reaches_surface_in_order() {
        let (bridge, mut surface) = terminal_channel();

        bridge.output.send(b"one".to_vec()).unwrap();
        bridge.output.send(b"two".to_vec()).unwrap();

        assert_eq!(surface.recv_output().await, Some(b"one".to_vec()));
        assert_eq!(surface.recv_output().await, Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn surface_events_reach_bridge() {
        let (mut bridge, surface) = terminal_channel();

        assert!(surface.open());
        assert!(surface.send_input("ls\r"));
        assert!(surface.close());

        assert_eq!(bridge.events.recv().await, Some(SurfaceEvent::Opened));
        assert_eq!(
            bridge.events.recv().await,
            Some(SurfaceEvent::Input(b"ls\r".to_vec()))
        );
        assert_eq!(bridge.events.recv().await, Some(SurfaceEvent::Closed));
    }

    #[tokio::test]
    async fn dropping_bridge_ends_output_stream() {
        let (bridge, mut surface) = terminal_channel();
        drop(bridge);
        assert_eq!(surface.recv_output().await, None);
        assert!(!surface.send_input("x"));
    }

    #[tokio::test]
    async fn input_sender_outlives_borrow_of_surface() {
        let (mut bridge, surface) = terminal_channel();
        let input = surface.input_sender();

        std::thread::spawn(move || {
            input.send("q");
        })
        .join()
        .unwrap();

        assert_eq!(
            bridge.events.recv().await,
            Some(SurfaceEvent::Input(b"q".to_vec()))
        );
    }
}
