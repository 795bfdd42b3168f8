// src/output/logger.rs

//! Prefixing, decorating line logger.
//!
//! A `Logger` owns its own partial-line buffer; two loggers never share
//! state even when they write to the same sink.

/// Pure per-line decoration (e.g. color or bold).
pub type Decorate = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Receives each finished, newline-terminated line.
pub type LineSink = Box<dyn FnMut(String) + Send>;

pub struct Logger {
    prefix: String,
    decorate: Decorate,
    sink: LineSink,
    buffer: String,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(sink: impl FnMut(String) + Send + 'static) -> Self {
        Self {
            prefix: String::new(),
            decorate: Box::new(str::to_string),
            sink: Box::new(sink),
            buffer: String::new(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn decorate(mut self, decorate: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.decorate = Box::new(decorate);
        self
    }

    /// Append `text`; every line it completes is emitted immediately.
    pub fn write(&mut self, text: &str) {
        let mut parts = text.split('\n');
        let first = parts.next().unwrap_or_default();
        self.buffer.push_str(first);

        for part in parts {
            let mut line = std::mem::replace(&mut self.buffer, part.to_string());
            if line.ends_with('\r') {
                line.pop();
            }
            self.emit(&line);
        }
    }

    /// `write` followed by an unconditional `flush`.
    pub fn log(&mut self, text: &str) {
        self.write(text);
        self.flush();
    }

    /// Emit the partial line, if any, and clear it.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.buffer);
        self.emit(&line);
    }

    fn emit(&mut self, line: &str) {
        let text = format!("{}{}\n", self.prefix, (self.decorate)(line));
        (self.sink)(text);
    }
}
