mod common;
use crate::common::{init_tracing, with_timeout};

use parallel_rc::exec::{resolve_shell, ShellInvocation};

fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn shell_specs_get_dash_c_appended() {
    assert_eq!(
        ShellInvocation::parse("bash"),
        Some(ShellInvocation {
            program: "bash".to_string(),
            args: args(&["-c"]),
        })
    );
    assert_eq!(
        ShellInvocation::parse("  /usr/bin/env   python3 -u "),
        Some(ShellInvocation {
            program: "/usr/bin/env".to_string(),
            args: args(&["python3", "-u", "-c"]),
        })
    );
    assert_eq!(ShellInvocation::parse("   "), None);
}

#[test]
fn command_shell_wins_over_global_shell_and_default() {
    assert_eq!(resolve_shell(Some("zsh"), Some("bash")).program, "zsh");
    assert_eq!(resolve_shell(None, Some("bash")).program, "bash");
    assert_eq!(resolve_shell(Some(" "), Some("bash")).program, "bash");
    assert_eq!(resolve_shell(None, None), ShellInvocation::host_default());
}

#[cfg(unix)]
mod unix {
    use super::*;

    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use parallel_rc::commands::Command;
    use parallel_rc::engine::{Orchestrator, OrchestratorOptions};
    use parallel_rc::exec::{ExecJob, OutputLine, ProcessExecutor, ProcessRegistry};
    use parallel_rc::output::{CapturedConsole, Palette};
    use parallel_rc::types::{FailureReason, Stream, TaskOutcome};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    async fn exec_with(executor: &ProcessExecutor, command: Command) -> (TaskOutcome, Vec<OutputLine>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let job = ExecJob {
            index: 0,
            command,
            registry: Arc::new(ProcessRegistry::new()),
        };
        let outcome = with_timeout(executor.exec(job, tx)).await;

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        (outcome, lines)
    }

    async fn exec(script: &str) -> (TaskOutcome, Vec<OutputLine>) {
        exec_with(&ProcessExecutor::default(), Command::new(script)).await
    }

    fn texts(lines: &[OutputLine], stream: Stream) -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.stream == stream)
            .map(|l| l.text.clone())
            .collect()
    }

    #[tokio::test]
    async fn stdout_and_stderr_lines_are_separated() {
        init_tracing();
        let (outcome, lines) = exec("echo out1; echo err1 >&2; echo out2").await;

        assert_eq!(outcome, TaskOutcome::Success);
        assert_eq!(texts(&lines, Stream::Stdout), vec!["out1", "out2"]);
        assert_eq!(texts(&lines, Stream::Stderr), vec!["err1"]);
    }

    #[tokio::test]
    async fn non_zero_exit_code_is_a_failure() {
        init_tracing();
        let (outcome, _) = exec("exit 3").await;
        assert_eq!(outcome, TaskOutcome::Failed(FailureReason::ExitCode(3)));
    }

    #[tokio::test]
    async fn death_by_signal_is_reported_by_name() {
        init_tracing();
        let (outcome, _) = exec("kill -TERM $$").await;
        assert_eq!(
            outcome,
            TaskOutcome::Failed(FailureReason::Signal("SIGTERM".to_string()))
        );
    }

    #[tokio::test]
    async fn missing_shell_is_a_spawn_error() {
        init_tracing();
        let executor = ProcessExecutor::new(Some("/definitely/not/a/shell".to_string()), true);
        let (outcome, lines) = exec_with(&executor, Command::new("echo hi")).await;

        assert!(matches!(outcome, TaskOutcome::Failed(FailureReason::SpawnError(_))));
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn command_shell_overrides_global_shell() {
        init_tracing();
        let executor = ProcessExecutor::new(Some("/definitely/not/a/shell".to_string()), true);
        let (outcome, lines) =
            exec_with(&executor, Command::new("echo via sh").with_shell("/bin/sh")).await;

        assert_eq!(outcome, TaskOutcome::Success);
        assert_eq!(texts(&lines, Stream::Stdout), vec!["via sh"]);
    }

    #[tokio::test]
    async fn trailing_partial_line_is_delivered() {
        init_tracing();
        let (_, lines) = exec("printf 'first\\nno newline'").await;
        assert_eq!(texts(&lines, Stream::Stdout), vec!["first", "no newline"]);
    }

    #[tokio::test]
    async fn long_output_arrives_complete_and_in_order() {
        init_tracing();
        let (outcome, lines) = exec("i=1; while [ $i -le 3000 ]; do echo line$i; i=$((i+1)); done").await;

        assert_eq!(outcome, TaskOutcome::Success);
        let expected: Vec<String> = (1..=3000).map(|i| format!("line{i}")).collect();
        assert_eq!(texts(&lines, Stream::Stdout), expected);
    }

    #[tokio::test]
    async fn dumb_terminal_sets_term_and_strips_escapes() {
        init_tracing();
        let (_, lines) = exec("echo $TERM; printf '\\033[31mred\\033[0m\\n'").await;
        assert_eq!(texts(&lines, Stream::Stdout), vec!["dumb", "red"]);

        let executor = ProcessExecutor::new(None, false);
        let (_, lines) =
            exec_with(&executor, Command::new("printf '\\033[31mred\\033[0m\\n'")).await;
        assert_eq!(texts(&lines, Stream::Stdout), vec!["\u{1b}[31mred\u{1b}[0m"]);
    }

    #[tokio::test]
    async fn runs_in_the_command_working_directory() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let command = Command::new("pwd").with_working_directory(dir.path());

        let (outcome, lines) = exec_with(&ProcessExecutor::default(), command).await;

        assert_eq!(outcome, TaskOutcome::Success);
        let printed = std::path::PathBuf::from(&texts(&lines, Stream::Stdout)[0]);
        assert_eq!(
            printed.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    async fn interrupt_while_running(script: &str) -> (TaskOutcome, Vec<OutputLine>, Duration) {
        let registry = Arc::new(ProcessRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let job = ExecJob {
            index: 0,
            command: Command::new(script),
            registry: Arc::clone(&registry),
        };

        let executor = ProcessExecutor::default();
        let run = tokio::spawn(async move { executor.exec(job, tx).await });

        with_timeout(async {
            while registry.is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        // Give the shell time to start its own child.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        assert_eq!(registry.interrupt_all(), 1);
        let outcome = with_timeout(run).await.unwrap();
        let elapsed = started.elapsed();
        assert!(registry.is_empty());

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        (outcome, lines, elapsed)
    }

    #[tokio::test]
    async fn interrupt_stops_the_shell_and_its_children() {
        init_tracing();
        let (outcome, _, elapsed) = interrupt_while_running("sleep 10").await;

        assert!(elapsed < Duration::from_secs(3));
        assert_eq!(
            outcome,
            TaskOutcome::Failed(FailureReason::Signal("SIGINT".to_string()))
        );
    }

    #[tokio::test]
    async fn interrupt_stops_compound_commands() {
        init_tracing();
        let (outcome, lines, elapsed) = interrupt_while_running("sleep 10; echo after").await;

        assert!(elapsed < Duration::from_secs(3));
        assert!(!outcome.is_success());
        assert!(texts(&lines, Stream::Stdout).is_empty());
    }

    #[tokio::test]
    async fn background_job_holding_the_pipe_does_not_block_an_interrupt() {
        init_tracing();
        // Background jobs of a non-interactive shell ignore SIGINT.
        let (outcome, _, elapsed) = interrupt_while_running("sleep 10 & wait").await;

        assert!(elapsed < Duration::from_secs(3));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn child_spawned_after_interrupt_is_stopped_at_once() {
        init_tracing();
        let registry = Arc::new(ProcessRegistry::new());
        registry.interrupt_all();

        let (tx, _rx) = mpsc::unbounded_channel();
        let job = ExecJob {
            index: 0,
            command: Command::new("sleep 10"),
            registry: Arc::clone(&registry),
        };

        let started = Instant::now();
        let outcome = with_timeout(ProcessExecutor::default().exec(job, tx)).await;

        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(!outcome.is_success());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn finished_child_leaves_nothing_to_interrupt() {
        init_tracing();
        let registry = Arc::new(ProcessRegistry::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let job = ExecJob {
            index: 0,
            command: Command::new("exit 0"),
            registry: Arc::clone(&registry),
        };

        let outcome = with_timeout(ProcessExecutor::default().exec(job, tx)).await;

        assert_eq!(outcome, TaskOutcome::Success);
        assert!(registry.is_empty());
        assert_eq!(registry.interrupt_all(), 0);
    }

    fn fail_fast_orchestrator(console: &Arc<CapturedConsole>, concurrency: usize) -> Orchestrator<ProcessExecutor> {
        Orchestrator::new(
            ProcessExecutor::default(),
            console.clone(),
            Palette::plain(),
            OrchestratorOptions {
                concurrency,
                run_all: false,
                order: false,
            },
        )
    }

    async fn assert_fail_fast_returns_early(long_running: &str) {
        let console = Arc::new(CapturedConsole::new());
        let orchestrator = fail_fast_orchestrator(&console, 3);
        let commands = vec![
            Command::new("exit 0"),
            Command::new("sleep 0.2; exit 1"),
            Command::new(long_running),
        ];

        let started = Instant::now();
        let report = with_timeout(orchestrator.run(commands, CancellationToken::new())).await;

        assert!(
            started.elapsed() < Duration::from_secs(3),
            "run took {:?}",
            started.elapsed()
        );
        assert_eq!(report.failed_indices(), vec![1, 2]);
        assert_eq!(report.failures[0].reason, FailureReason::ExitCode(1));
        assert_eq!(report.exit_code(), 1);
        assert!(!console.lines(Stream::Stdout).contains(&"2: x".to_string()));
    }

    #[tokio::test]
    async fn fail_fast_interrupts_a_plain_sleep() {
        init_tracing();
        assert_fail_fast_returns_early("sleep 10").await;
    }

    #[tokio::test]
    async fn fail_fast_interrupts_a_compound_command() {
        init_tracing();
        assert_fail_fast_returns_early("sleep 10; echo x").await;
    }

    #[tokio::test]
    async fn fail_fast_skips_commands_not_yet_started() {
        init_tracing();
        let console = Arc::new(CapturedConsole::new());
        let orchestrator = fail_fast_orchestrator(&console, 2);
        let commands = vec![
            Command::new("exit 0"),
            Command::new("sleep 0.2; exit 1"),
            Command::new("sleep 10"),
            Command::new("echo never"),
        ];

        let report = with_timeout(orchestrator.run(commands, CancellationToken::new())).await;

        assert_eq!(report.failed_indices(), vec![1, 2]);
        assert_eq!(report.not_started, vec![3]);
        assert!(!console.lines(Stream::Stdout).contains(&"3: never".to_string()));
    }
}
