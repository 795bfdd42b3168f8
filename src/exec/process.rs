// src/exec/process.rs

//! Real process executor built on `tokio::process`.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command as TokioCommand};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::config::Options;
use crate::exec::backend::{ExecJob, ExecutorBackend, LineSender, OutputLine};
use crate::exec::registry::{interrupt_process, ProcessRegistry};
use crate::output::{strip_ansi, LineStream};
use crate::types::{FailureReason, Stream, TaskOutcome};

const READ_CHUNK: usize = 8 * 1024;

/// How long an interrupted command's pipes may stay open after it exited.
/// Background jobs ignore SIGINT and can keep them open indefinitely.
const INTERRUPTED_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Program and leading arguments used to run a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellInvocation {
    /// Host default: `/bin/sh -c` (or `cmd /C` on Windows).
    pub fn host_default() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd".to_string(),
                args: vec!["/C".to_string()],
            }
        } else {
            Self {
                program: "/bin/sh".to_string(),
                args: vec!["-c".to_string()],
            }
        }
    }

    /// Parse a shell string like `bash` or `/usr/bin/python3 -u`; `-c` is
    /// appended after any arguments. Blank strings yield `None`.
    pub fn parse(shell: &str) -> Option<Self> {
        let mut words = shell.split_whitespace().map(str::to_string);
        let program = words.next()?;
        let mut args: Vec<String> = words.collect();
        args.push("-c".to_string());
        Some(Self { program, args })
    }
}

/// Shell precedence: the command's own (`#!`) shell, then the global
/// override, then the host default.
pub fn resolve_shell(command_shell: Option<&str>, global_shell: Option<&str>) -> ShellInvocation {
    command_shell
        .and_then(ShellInvocation::parse)
        .or_else(|| global_shell.and_then(ShellInvocation::parse))
        .unwrap_or_else(ShellInvocation::host_default)
}

/// Spawns each command as a child process.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    shell: Option<String>,
    dumb_terminal: bool,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl ProcessExecutor {
    /// `dumb_terminal` runs children with `TERM=dumb` and strips ANSI escapes
    /// from whatever they print anyway.
    pub fn new(shell: Option<String>, dumb_terminal: bool) -> Self {
        Self {
            shell,
            dumb_terminal,
        }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.shell.clone(), options.dumb_terminal)
    }

    fn build_command(&self, command: &Command) -> TokioCommand {
        let shell = resolve_shell(command.shell.as_deref(), self.shell.as_deref());

        let mut cmd = TokioCommand::new(&shell.program);
        cmd.args(&shell.args)
            .arg(&command.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if self.dumb_terminal {
            cmd.env("TERM", "dumb");
        }
        if let Some(dir) = &command.working_directory {
            cmd.current_dir(dir);
        }
        // Own process group, so an interrupt reaches the whole pipeline.
        // Terminal Ctrl-C no longer reaches children directly; it arrives
        // through the registry instead.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Run one command. Returns once the process exited and both of its
    /// output pipes reached EOF. After an interrupt, pipes that stay open
    /// longer than a short grace period are abandoned.
    pub async fn exec(&self, job: ExecJob, lines: LineSender) -> TaskOutcome {
        let ExecJob {
            index,
            command,
            registry,
        } = job;

        let mut child = match self.build_command(&command).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(index, script = %command.script, error = %e, "failed to spawn command");
                return TaskOutcome::Failed(FailureReason::SpawnError(e.to_string()));
            }
        };

        let pid = child.id();
        info!(index, ?pid, script = %command.script, "started command");
        if let Some(pid) = pid {
            registry.register(index, pid);
        }

        let mut readers: Vec<JoinHandle<()>> = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(self.spawn_reader(stdout, Stream::Stdout, lines.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(self.spawn_reader(stderr, Stream::Stderr, lines.clone()));
        }
        drop(lines);

        let status = wait_or_interrupt(index, &mut child, pid, &registry).await;
        registry.unregister(index);

        if registry.is_interrupted() {
            let drained =
                tokio::time::timeout(INTERRUPTED_DRAIN_GRACE, join_readers(index, &mut readers))
                    .await;
            if drained.is_err() {
                warn!(index, "output still open after interrupt; detaching readers");
                for reader in &readers {
                    reader.abort();
                }
            }
        } else {
            join_readers(index, &mut readers).await;
        }

        let outcome = match status {
            Ok(status) => outcome_from_status(status),
            Err(e) => TaskOutcome::Failed(FailureReason::SpawnError(format!(
                "waiting for process: {e}"
            ))),
        };

        info!(index, ?outcome, "command finished");
        outcome
    }

    fn spawn_reader<R>(&self, reader: R, stream: Stream, tx: LineSender) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let splitter = if self.dumb_terminal {
            LineStream::with_transform(|line| strip_ansi(line).into_owned())
        } else {
            LineStream::new()
        };
        tokio::spawn(pump_lines(reader, stream, splitter, tx))
    }
}

/// Wait for `child` to exit. If the run is interrupted first, signal the
/// child's process group and keep waiting.
///
/// The signal is sent before `wait` had a chance to reap the child, so the
/// pid still belongs to it.
async fn wait_or_interrupt(
    index: usize,
    child: &mut Child,
    pid: Option<u32>,
    registry: &ProcessRegistry,
) -> std::io::Result<ExitStatus> {
    let wait = child.wait();
    tokio::pin!(wait);

    tokio::select! {
        biased;
        status = &mut wait => status,
        _ = registry.interrupted() => {
            if let Some(pid) = pid {
                interrupt_process(index, pid);
            }
            wait.await
        }
    }
}

async fn join_readers(index: usize, readers: &mut [JoinHandle<()>]) {
    for reader in readers.iter_mut() {
        if let Err(e) = reader.await {
            warn!(index, error = %e, "output reader task failed");
        }
    }
}

impl ExecutorBackend for ProcessExecutor {
    fn execute(
        &self,
        job: ExecJob,
        lines: LineSender,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = TaskOutcome> + Send + '_>> {
        Box::pin(self.exec(job, lines))
    }
}

/// Read `reader` to EOF, forwarding complete lines.
///
/// Keeps reading even if nobody listens anymore, so the child never blocks
/// on a full pipe.
async fn pump_lines<R>(mut reader: R, stream: Stream, mut splitter: LineStream, tx: LineSender)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for text in splitter.write(&buf[..n]) {
                    let _ = tx.send(OutputLine { stream, text });
                }
            }
            Err(e) => {
                debug!(?stream, error = %e, "error reading child output");
                break;
            }
        }
    }

    if let Some(text) = splitter.flush() {
        let _ = tx.send(OutputLine { stream, text });
    }
}

/// Classify an exit status: exit code 0 is success, any other code a
/// failure, no code at all means the process died from a signal.
pub fn outcome_from_status(status: ExitStatus) -> TaskOutcome {
    if let Some(code) = status.code() {
        return TaskOutcome::from_exit_code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return TaskOutcome::Failed(FailureReason::Signal(signal_name(signal)));
        }
    }

    TaskOutcome::Failed(FailureReason::ExitCode(-1))
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    nix::sys::signal::Signal::try_from(signal)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| signal.to_string())
}
