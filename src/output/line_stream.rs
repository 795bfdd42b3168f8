// src/output/line_stream.rs

//! Reassembles arbitrary output chunks into complete lines.
//!
//! Pipes hand us bytes in whatever sizes the OS chose, unrelated to line
//! boundaries. `LineStream` keeps the trailing partial line (and any
//! incomplete UTF-8 sequence) until the next chunk, so every emitted line is
//! whole and prefixes can never land mid-line.

/// Per-line transform applied before a line is emitted.
pub type LineTransform = Box<dyn Fn(&str) -> String + Send + Sync>;

pub struct LineStream {
    /// Decoded text after the last newline.
    buffer: String,
    /// Bytes of a UTF-8 sequence split across chunks.
    pending: Vec<u8>,
    transform: Option<LineTransform>,
}

impl std::fmt::Debug for LineStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("buffer", &self.buffer)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Default for LineStream {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStream {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            pending: Vec::new(),
            transform: None,
        }
    }

    pub fn with_transform(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            transform: Some(Box::new(transform)),
            ..Self::new()
        }
    }

    /// Feed a chunk, returning every line it completed (without the line
    /// terminator; `\r\n` is treated as one terminator).
    pub fn write(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decode(chunk);
        self.buffer.push_str(&text);

        let Some(last) = self.buffer.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.buffer.split_off(last + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete[..last]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .map(|line| self.apply(line.to_string()))
            .collect()
    }

    /// Emit whatever is buffered as a final, unterminated line.
    ///
    /// Returns `None` when nothing is buffered; a second `flush` in a row is
    /// always `None`.
    pub fn flush(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&tail));
        }

        if self.buffer.is_empty() {
            return None;
        }

        let line = std::mem::take(&mut self.buffer);
        Some(self.apply(line))
    }

    fn apply(&self, line: String) -> String {
        match &self.transform {
            Some(transform) => transform(&line),
            None => line,
        }
    }

    /// Streaming UTF-8 decode: invalid bytes become U+FFFD, an incomplete
    /// sequence at the end of the chunk is held back for the next one.
    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }
}
