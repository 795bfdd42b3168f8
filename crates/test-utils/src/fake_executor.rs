use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parallel_rc::exec::{ExecJob, ExecutorBackend, LineSender, OutputLine};
use parallel_rc::types::{FailureReason, TaskOutcome};

/// One step of a scripted command.
#[derive(Debug, Clone)]
pub enum Step {
    Stdout(String),
    Stderr(String),
    Sleep(Duration),
}

/// What a fake command prints, how long it takes and how it ends.
#[derive(Debug, Clone)]
pub struct Script {
    pub steps: Vec<Step>,
    pub outcome: TaskOutcome,
    /// Keep sleeping through an interrupt, like a child that traps SIGINT.
    pub ignore_interrupt: bool,
}

/// What the fake executor observed.
#[derive(Debug, Default)]
pub struct ExecProbe {
    running: AtomicUsize,
    max_running: AtomicUsize,
    started: Mutex<Vec<usize>>,
    finished: Mutex<Vec<usize>>,
    interrupted: Mutex<Vec<usize>>,
}

impl ExecProbe {
    fn on_start(&self, index: usize) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        self.started.lock().unwrap().push(index);
    }

    fn on_end(&self, index: usize) {
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.finished.lock().unwrap().push(index);
    }

    fn on_interrupt(&self, index: usize) {
        self.interrupted.lock().unwrap().push(index);
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    /// Task indices in the order they started executing.
    pub fn started(&self) -> Vec<usize> {
        self.started.lock().unwrap().clone()
    }

    /// Task indices in the order they finished executing.
    pub fn finished(&self) -> Vec<usize> {
        self.finished.lock().unwrap().clone()
    }

    /// Task indices that were interrupted mid-sleep.
    pub fn interrupted(&self) -> Vec<usize> {
        self.interrupted.lock().unwrap().clone()
    }
}

/// A fake executor that plays back one [`Script`] per task index.
///
/// Tasks without a script succeed immediately with no output. Sleeps end
/// early with `Signal("SIGINT")` when the run's process registry is
/// interrupted, unless the script ignores interrupts.
pub struct ScriptedExecutor {
    scripts: Vec<Script>,
    probe: Arc<ExecProbe>,
}

impl ScriptedExecutor {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            probe: Arc::new(ExecProbe::default()),
        }
    }

    pub fn probe(&self) -> Arc<ExecProbe> {
        Arc::clone(&self.probe)
    }
}

impl ExecutorBackend for ScriptedExecutor {
    fn execute(
        &self,
        job: ExecJob,
        lines: LineSender,
    ) -> Pin<Box<dyn Future<Output = TaskOutcome> + Send + '_>> {
        let script = self.scripts.get(job.index).cloned();
        let probe = Arc::clone(&self.probe);

        Box::pin(async move {
            let index = job.index;
            probe.on_start(index);

            let Some(script) = script else {
                probe.on_end(index);
                return TaskOutcome::Success;
            };

            for step in script.steps {
                match step {
                    Step::Stdout(text) => {
                        let _ = lines.send(OutputLine::stdout(text));
                    }
                    Step::Stderr(text) => {
                        let _ = lines.send(OutputLine::stderr(text));
                    }
                    Step::Sleep(duration) if script.ignore_interrupt => {
                        tokio::time::sleep(duration).await;
                    }
                    Step::Sleep(duration) => {
                        tokio::select! {
                            _ = tokio::time::sleep(duration) => {}
                            _ = job.registry.interrupted() => {
                                probe.on_interrupt(index);
                                probe.on_end(index);
                                return TaskOutcome::Failed(FailureReason::Signal("SIGINT".to_string()));
                            }
                        }
                    }
                }
            }

            probe.on_end(index);
            script.outcome
        })
    }
}
