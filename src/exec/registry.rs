// src/exec/registry.rs

//! Registry of live child processes, used only for cancellation fan-out.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RegistryState {
    /// task index -> OS process id
    children: HashMap<usize, u32>,
    interrupted: bool,
}

/// Children are added on spawn and removed on exit.
///
/// [`ProcessRegistry::interrupt_all`] does not signal anything itself. It
/// flips the registry into the interrupted state and wakes every executor
/// waiting on [`ProcessRegistry::interrupted`]; each executor then signals
/// its own child while it still owns the unreaped process, so a recycled pid
/// is never hit. The registry stays interrupted: a child registered
/// afterwards sees the interrupt immediately.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    state: Mutex<RegistryState>,
    token: CancellationToken,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track a freshly spawned child. Returns `true` if cancellation already
    /// happened, in which case the caller must interrupt it right away.
    pub fn register(&self, index: usize, pid: u32) -> bool {
        let mut state = self.lock();
        state.children.insert(index, pid);
        debug!(index, pid, "registered child process");
        state.interrupted
    }

    pub fn unregister(&self, index: usize) {
        if let Some(pid) = self.lock().children.remove(&index) {
            debug!(index, pid, "unregistered child process");
        }
    }

    /// Ask every live child to stop. Returns how many were registered.
    ///
    /// Children that ignore the interrupt are left running; there is no
    /// escalation to a hard kill.
    pub fn interrupt_all(&self) -> usize {
        let count = {
            let mut state = self.lock();
            state.interrupted = true;
            state.children.len()
        };
        self.token.cancel();

        info!(count, "interrupting running commands");
        count
    }

    pub fn is_interrupted(&self) -> bool {
        self.lock().interrupted
    }

    /// Resolves once [`ProcessRegistry::interrupt_all`] has been called.
    pub async fn interrupted(&self) {
        self.token.cancelled().await;
    }

    /// Number of children currently registered.
    pub fn len(&self) -> usize {
        self.lock().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Send SIGINT to the process group led by `pid`.
///
/// Children are spawned as group leaders, so this reaches the shell and
/// everything it started in the foreground. Must only be called while the
/// child has not been reaped yet.
#[cfg(unix)]
pub fn interrupt_process(index: usize, pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        warn!(index, pid, "pid out of range; cannot interrupt");
        return;
    };

    match killpg(Pid::from_raw(raw), Signal::SIGINT) {
        Ok(()) => debug!(index, pid, "sent SIGINT to process group"),
        Err(nix::errno::Errno::ESRCH) => debug!(index, pid, "process group already gone"),
        Err(e) => warn!(index, pid, error = %e, "failed to send SIGINT"),
    }
}

#[cfg(not(unix))]
pub fn interrupt_process(index: usize, pid: u32) {
    warn!(index, pid, "interrupting child processes is not supported on this platform");
}
