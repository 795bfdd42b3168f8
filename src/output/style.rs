// src/output/style.rs

//! Color capability probing and line decorations.

use std::io::IsTerminal;

use colored::Colorize;

use crate::types::Stream;

/// Decoration applied to a logger's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
    Dim,
    Yellow,
    Red,
}

impl Style {
    pub fn paint(self, text: &str) -> String {
        match self {
            Style::Plain => text.to_string(),
            Style::Bold => text.bold().to_string(),
            Style::Dim => text.dimmed().to_string(),
            Style::Yellow => text.yellow().to_string(),
            Style::Red => text.red().to_string(),
        }
    }
}

/// Whether each console stream gets colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    stdout: bool,
    stderr: bool,
}

impl Palette {
    pub fn new(stdout: bool, stderr: bool) -> Self {
        Self { stdout, stderr }
    }

    /// No decoration on either stream.
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    /// An explicit choice applies to both streams; otherwise each stream is
    /// probed on its own.
    pub fn detect(explicit: Option<bool>) -> Self {
        match explicit {
            Some(enabled) => Self::new(enabled, enabled),
            None => Self::new(
                color_supported(Stream::Stdout),
                color_supported(Stream::Stderr),
            ),
        }
    }

    pub fn enabled(&self, stream: Stream) -> bool {
        match stream {
            Stream::Stdout => self.stdout,
            Stream::Stderr => self.stderr,
        }
    }

    /// A pure decoration function for lines written to `stream`.
    ///
    /// Identity when color is off for that stream.
    pub fn decoration(&self, stream: Stream, style: Style) -> impl Fn(&str) -> String + Send + Sync + 'static {
        let enabled = self.enabled(stream);
        move |text: &str| {
            if enabled {
                style.paint(text)
            } else {
                text.to_string()
            }
        }
    }

    /// Task prefix, e.g. `"3: "`, dimmed when colored.
    pub fn prefix(&self, stream: Stream, index: usize) -> String {
        let prefix = format!("{index}: ");
        if self.enabled(stream) {
            Style::Dim.paint(&prefix)
        } else {
            prefix
        }
    }
}

/// A stream supports color when it is a terminal and `NO_COLOR` is not set.
pub fn color_supported(stream: Stream) -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    match stream {
        Stream::Stdout => std::io::stdout().is_terminal(),
        Stream::Stderr => std::io::stderr().is_terminal(),
    }
}
