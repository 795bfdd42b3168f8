// src/engine/orchestrator.rs

//! Runs a batch of commands through the limiter and executor.
//!
//! Per task:
//! 1. wait for a limiter slot (admission in command order);
//! 2. skip the task if the run was cancelled meanwhile;
//! 3. print `$ <script>`, execute, and stream output through the task's
//!    loggers and mediator;
//! 4. record the outcome, cancel the run on failure in fail-fast mode;
//! 5. release the slot only after the task's queued output was written.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::config::Options;
use crate::engine::limiter::{Limiter, Slot};
use crate::engine::report::RunReport;
use crate::engine::tasks::TaskTable;
use crate::exec::{ExecJob, ExecutorBackend, OutputLine, ProcessRegistry};
use crate::output::{mediate, Console, Gate, Logger, Mediated, OutputSequencer, Palette, Style};
use crate::types::{FailureReason, Stream, TaskOutcome};

/// Console write routed through a task's mediator.
type ConsoleWrite = Mediated<(Stream, String), ()>;

/// The subset of [`Options`] the orchestrator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub concurrency: usize,
    /// Record failures but never cancel.
    pub run_all: bool,
    /// Serialize presented output by task index.
    pub order: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            concurrency: crate::config::default_concurrency(),
            run_all: false,
            order: false,
        }
    }
}

impl From<&Options> for OrchestratorOptions {
    fn from(options: &Options) -> Self {
        Self {
            concurrency: options.concurrency,
            run_all: options.run_all,
            order: options.order,
        }
    }
}

pub struct Orchestrator<E: ExecutorBackend> {
    executor: Arc<E>,
    console: Arc<dyn Console>,
    palette: Palette,
    options: OrchestratorOptions,
}

impl<E: ExecutorBackend> std::fmt::Debug for Orchestrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("palette", &self.palette)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// State shared by every task of one run.
struct RunContext<E: ExecutorBackend> {
    executor: Arc<E>,
    palette: Palette,
    run_all: bool,
    table: TaskTable,
    registry: Arc<ProcessRegistry>,
    /// Cancelled on fail-fast or external interrupt.
    cancel: CancellationToken,
    sequencer: Option<OutputSequencer>,
}

impl<E: ExecutorBackend + 'static> Orchestrator<E> {
    pub fn new(
        executor: E,
        console: Arc<dyn Console>,
        palette: Palette,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            executor: Arc::new(executor),
            console,
            palette,
            options,
        }
    }

    /// Run every command and return the report once all started tasks have
    /// settled.
    ///
    /// Cancelling `shutdown` interrupts every live child and prevents any
    /// task that has not started yet from starting, regardless of mode.
    pub async fn run(&self, commands: Vec<Command>, shutdown: CancellationToken) -> RunReport {
        let total = commands.len();
        let limiter = Limiter::new(self.options.concurrency).sequential(self.options.order);
        let cancel = shutdown.child_token();

        let (writers, gates) = self.console_writers(total);
        let ctx = Arc::new(RunContext {
            executor: Arc::clone(&self.executor),
            palette: self.palette,
            run_all: self.options.run_all,
            table: TaskTable::new(&commands),
            registry: Arc::new(ProcessRegistry::new()),
            cancel: cancel.clone(),
            sequencer: limiter.is_sequential().then(|| OutputSequencer::new(gates)),
        });

        info!(
            total,
            concurrency = limiter.concurrency(),
            run_all = self.options.run_all,
            order = self.options.order,
            "starting run"
        );

        let fanout = tokio::spawn(cancellation_fanout(
            cancel.clone(),
            limiter.clone(),
            Arc::clone(&ctx.registry),
        ));

        let mut handles = Vec::with_capacity(total);
        for (index, (command, writer)) in commands.into_iter().zip(writers).enumerate() {
            let slot = if cancel.is_cancelled() {
                None
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    slot = limiter.acquire() => slot.ok(),
                }
            };

            // Admission and cancellation can race; cancellation wins.
            let Some(slot) = slot.filter(|_| !cancel.is_cancelled()) else {
                debug!(index, "run cancelled; not starting task");
                ctx.finish_output(index);
                continue;
            };

            let task = run_task(Arc::clone(&ctx), index, command, writer, slot);
            handles.push((index, tokio::spawn(task)));
        }

        for (index, handle) in handles {
            if let Err(e) = handle.await {
                warn!(index, error = %e, "task panicked");
                ctx.table.complete(
                    index,
                    TaskOutcome::Failed(FailureReason::SpawnError(format!("internal error: {e}"))),
                );
                ctx.finish_output(index);
            }
        }

        fanout.abort();

        let report = ctx.table.report(shutdown.is_cancelled());
        info!(
            succeeded = report.succeeded,
            failed = report.failures.len(),
            not_started = report.not_started.len(),
            "run finished"
        );
        report
    }

    /// One mediated console writer per task, plus the matching gates.
    fn console_writers(&self, total: usize) -> (Vec<ConsoleWrite>, Vec<Box<dyn Gate>>) {
        (0..total)
            .map(|_| {
                let console = Arc::clone(&self.console);
                let (writer, controls) =
                    mediate(move |(stream, text): (Stream, String)| console.write(stream, &text));
                (writer, Box::new(controls) as Box<dyn Gate>)
            })
            .unzip()
    }
}

impl<E: ExecutorBackend> RunContext<E> {
    fn finish_output(&self, index: usize) {
        if let Some(sequencer) = &self.sequencer {
            sequencer.finish(index);
        }
    }
}

/// On cancellation: stop admitting new tasks and interrupt live children.
async fn cancellation_fanout(
    cancel: CancellationToken,
    limiter: Limiter,
    registry: Arc<ProcessRegistry>,
) {
    cancel.cancelled().await;
    limiter.close();
    let live = registry.interrupt_all();
    info!(live, "run cancelled");
}

async fn run_task<E: ExecutorBackend>(
    ctx: Arc<RunContext<E>>,
    index: usize,
    command: Command,
    writer: ConsoleWrite,
    slot: Slot,
) {
    ctx.table.start(index);
    let mut loggers = TaskLoggers::new(index, &ctx.palette, &writer);
    loggers.notice.log(&format!("$ {}", command.script));

    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let job = ExecJob {
        index,
        command,
        registry: Arc::clone(&ctx.registry),
    };

    let execute = ctx.executor.execute(job, tx);
    let forward = async {
        while let Some(line) = rx.recv().await {
            match line.stream {
                Stream::Stdout => loggers.info.log(&line.text),
                Stream::Stderr => loggers.warn.log(&line.text),
            }
        }
    };
    let (outcome, ()) = tokio::join!(execute, forward);

    if let TaskOutcome::Failed(FailureReason::SpawnError(message)) = &outcome {
        loggers.error.log(message);
    }
    loggers.flush();

    let failed = ctx.table.complete(index, outcome);
    if failed && !ctx.run_all && !ctx.cancel.is_cancelled() {
        info!(index, "command failed; cancelling remaining commands");
        ctx.cancel.cancel();
    }

    ctx.finish_output(index);
    // In order mode this waits for earlier tasks to finish printing.
    let _ = writer.settled().await;
    drop(slot);
}

/// The four loggers of one task. Each has its own line buffer; all of them
/// write through the task's mediator so the task's lines stay in order.
struct TaskLoggers {
    notice: Logger,
    info: Logger,
    warn: Logger,
    error: Logger,
}

impl TaskLoggers {
    fn new(index: usize, palette: &Palette, writer: &ConsoleWrite) -> Self {
        let logger = |stream: Stream, style: Style| {
            let writer = writer.clone();
            Logger::new(move |text| {
                let _ = writer.call((stream, text));
            })
            .prefix(palette.prefix(stream, index))
            .decorate(palette.decoration(stream, style))
        };

        Self {
            notice: logger(Stream::Stdout, Style::Bold),
            info: logger(Stream::Stdout, Style::Plain),
            warn: logger(Stream::Stderr, Style::Yellow),
            error: logger(Stream::Stderr, Style::Red),
        }
    }

    fn flush(&mut self) {
        self.info.flush();
        self.notice.flush();
        self.warn.flush();
        self.error.flush();
    }
}
