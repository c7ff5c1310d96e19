//! Transcript output sink.
//!
//! Formatted transcript blocks go through a trait so the acceptor loop
//! doesn't care where they end up; the default implementation writes to
//! stdout under a single lock.

use std::io::{self, Write};
use std::sync::Mutex;

/// Receives already-formatted transcript blocks. Implementations must not
/// interleave partial writes from concurrent sessions.
pub trait TranscriptSink: Send + Sync {
    fn write(&self, block: &[u8]);
}

/// Writes every block to stdout under a single lock, so blocks from
/// concurrent sessions never interleave mid-write.
pub struct StdoutSink {
    lock: Mutex<()>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { lock: Mutex::new(()) }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptSink for StdoutSink {
    fn write(&self, block: &[u8]) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stdout = io::stdout();
        if stdout.write_all(block).is_err() {
            return;
        }
        let _ = stdout.flush();
    }
}
