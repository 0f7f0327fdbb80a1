//! Pumps between a PTY process, the terminal surface and the log

use std::io::Read;
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use super::bridge::BridgeInner;
use super::channel::SurfaceEvent;
use super::session::TinkerSession;
use crate::output::OutputChannel;

const READ_BUFFER_SIZE: usize = 4096;

/// Decodes PTY output for the log, holding back a multi-byte character
/// that a read split in two until the rest of it arrives
#[derive(Debug, Default)]
struct LogDecoder {
    pending: Vec<u8>,
}

impl LogDecoder {
    fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let complete = complete_utf8_len(&self.pending);
        let text = String::from_utf8_lossy(&self.pending[..complete]).into_owned();
        self.pending.drain(..complete);
        text
    }

    /// Whatever is still held back, decoded lossily
    fn finish(self) -> Option<String> {
        (!self.pending.is_empty()).then(|| String::from_utf8_lossy(&self.pending).into_owned())
    }
}

/// Length of `bytes` without an unfinished UTF-8 sequence at its end
fn complete_utf8_len(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for back in 1..=len.min(3) {
        let byte = bytes[len - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { len - back } else { len };
    }
    len
}

/// Spawn the blocking reader for a PTY. Every chunk is mirrored to the log
/// and forwarded to the surface; end of output is reported as
/// [`SurfaceEvent::ProcessExited`].
pub(crate) fn spawn_reader(
    mut reader: Box<dyn Read + Send>,
    output: mpsc::UnboundedSender<Vec<u8>>,
    events: mpsc::UnboundedSender<SurfaceEvent>,
    log: Arc<dyn OutputChannel>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("tinker-pty-reader".to_string())
        .spawn(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            let mut decoder = LogDecoder::default();
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        let chunk = &buf[..n];
                        let text = decoder.decode(chunk);
                        if !text.is_empty() {
                            log.append(&text);
                        }
                        // The surface may already be gone; keep draining so
                        // the process never blocks on a full PTY buffer.
                        let _ = output.send(chunk.to_vec());
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        // EIO is how Linux reports a closed PTY
                        tracing::debug!(error = %e, "PTY read ended");
                        break;
                    }
                }
            }
            if let Some(rest) = decoder.finish() {
                log.append(&rest);
            }
            tracing::debug!("PTY reader finished");
            let _ = events.send(SurfaceEvent::ProcessExited);
        })
}

/// Handle surface events for one session until the surface or the process
/// goes away. Holds only weak references so it never keeps a disposed
/// session alive.
pub(crate) async fn forward_surface_events(
    bridge: Weak<BridgeInner>,
    session: Weak<TinkerSession>,
    session_id: String,
    mut events: mpsc::UnboundedReceiver<SurfaceEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = bridge.upgrade() else {
            break;
        };

        match event {
            SurfaceEvent::Opened => {
                inner.log().append_line("Terminal Ready");
            }
            SurfaceEvent::Input(data) => match session.upgrade() {
                Some(session) => session.write(&data),
                None => inner.log().append_line("Unable to write to pty."),
            },
            SurfaceEvent::Closed => {
                inner.log().append_line("Terminal Closed");
                inner.dispose_session(&session_id);
                break;
            }
            SurfaceEvent::ProcessExited => {
                if let Some(session) = session.upgrade() {
                    session.write_to_terminal(b"\r\n[process exited]\r\n");
                }
                tracing::info!(session = %session_id, "Tinker process exited");
                inner.dispose_session(&session_id);
                break;
            }
        }
    }
    tracing::debug!(session = %session_id, "Surface event relay stopped");
}
