// src/output/mod.rs

//! Output pipeline: from raw child-process bytes to decorated console lines.
//!
//! - [`line_stream`] turns byte chunks into complete lines.
//! - [`ansi`] strips escape sequences from child output.
//! - [`logger`] prefixes and decorates lines per task and stream.
//! - [`mediator`] queues console writes while a task's output is held back.
//! - [`sequencer`] decides which task's output may flow in order mode.
//! - [`style`] probes color support and provides decorations.
//! - [`console`] is the final sink (real stdout/stderr or a capture).

pub mod ansi;
pub mod console;
pub mod line_stream;
pub mod logger;
pub mod mediator;
pub mod sequencer;
pub mod style;

pub use ansi::strip_ansi;
pub use console::{CapturedConsole, Console, StdConsole};
pub use line_stream::LineStream;
pub use logger::Logger;
pub use mediator::{mediate, Completion, Mediated, MediatorControls};
pub use sequencer::{Gate, OutputSequencer};
pub use style::{Palette, Style};
