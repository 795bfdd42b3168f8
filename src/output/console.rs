// src/output/console.rs

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use crate::types::Stream;

/// Final destination of decorated output.
pub trait Console: Send + Sync {
    /// Write `text` (already prefixed and newline-terminated) in one piece.
    fn write(&self, stream: Stream, text: &str);
}

/// Writes to the process's stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&self, stream: Stream, text: &str) {
        // Write errors (e.g. a closed pipe) are ignored.
        let _ = match stream {
            Stream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(text.as_bytes()).and_then(|_| out.flush())
            }
            Stream::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(text.as_bytes()).and_then(|_| err.flush())
            }
        };
    }
}

/// Records every write, in order. Used by tests.
#[derive(Debug, Default)]
pub struct CapturedConsole {
    writes: Mutex<Vec<(Stream, String)>>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Stream, String)>> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All writes in the order they happened.
    pub fn writes(&self) -> Vec<(Stream, String)> {
        self.lock().clone()
    }

    /// Lines written to `stream`, without their trailing newline.
    pub fn lines(&self, stream: Stream) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(s, _)| *s == stream)
            .flat_map(|(_, text)| text.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    /// Every line on both streams, in write order.
    pub fn all_lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .flat_map(|(_, text)| text.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }
}

impl Console for CapturedConsole {
    fn write(&self, stream: Stream, text: &str) {
        self.lock().push((stream, text.to_string()));
    }
}
