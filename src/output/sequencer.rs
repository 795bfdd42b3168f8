// src/output/sequencer.rs

//! Output ordering for "order" mode.
//!
//! Every task gets its own mediator. Only the earliest unfinished task's
//! mediator is open; all later ones are paused and queue their output. When
//! the open task finishes, the next one is resumed (draining its backlog in
//! one go) and, if it already finished too, the one after that, and so on.
//! Processes keep running in parallel; only what reaches the console is
//! serialized.

use std::sync::Mutex;

use tracing::trace;

use crate::output::mediator::MediatorControls;

/// Something that can be held closed and then opened.
pub trait Gate: Send + Sync {
    fn pause(&self);
    fn resume(&self);
}

impl<A, R> Gate for MediatorControls<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    fn pause(&self) {
        MediatorControls::pause(self);
    }

    fn resume(&self) {
        MediatorControls::resume(self);
    }
}

#[derive(Debug)]
struct SequencerState {
    finished: Vec<bool>,
    /// Index of the task whose gate is currently open.
    current: usize,
}

pub struct OutputSequencer {
    gates: Vec<Box<dyn Gate>>,
    state: Mutex<SequencerState>,
}

impl std::fmt::Debug for OutputSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSequencer")
            .field("gates", &self.gates.len())
            .field("state", &self.state)
            .finish()
    }
}

impl OutputSequencer {
    /// Take one gate per task, in task order. All but the first are paused.
    pub fn new(gates: Vec<Box<dyn Gate>>) -> Self {
        for gate in gates.iter().skip(1) {
            gate.pause();
        }

        let n = gates.len();
        Self {
            gates,
            state: Mutex::new(SequencerState {
                finished: vec![false; n],
                current: 0,
            }),
        }
    }

    /// Mark `index` as done producing output and move the open gate forward
    /// past every task that is already finished.
    ///
    /// Calling this twice for the same task is harmless.
    pub fn finish(&self, index: usize) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let Some(slot) = state.finished.get_mut(index) else {
            return;
        };
        *slot = true;

        while state.current < state.finished.len() && state.finished[state.current] {
            state.current += 1;
            if let Some(gate) = self.gates.get(state.current) {
                trace!(index = state.current, "opening output gate");
                gate.resume();
            }
        }
    }

    /// Index of the task whose output is currently flowing, or the task
    /// count once everything finished.
    pub fn current(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).current
    }
}
