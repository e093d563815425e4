//! Launcher + drain behaviour against real child processes.

#![cfg(unix)]

use std::error::Error;
use std::sync::Arc;

use leash::{CommandInvocation, LeashError, ProcessManager, StreamSource};
use leash_test_utils::{init_tracing, scripts, with_timeout, RecordingObserver};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn echo_collects_exact_stdout() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let out = with_timeout(10, manager.run(&CommandInvocation::new(["echo", "hello"]))).await?;

    assert_eq!(out.exit_code(), 0);
    assert!(out.success());
    assert_eq!(out.text(), "hello\n");
    assert!(out.lines().iter().all(|l| l.source == StreamSource::Stdout));

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn stderr_lines_carry_the_marker() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let inv = CommandInvocation::shell(scripts::stdout_and_stderr());
    let out = with_timeout(10, manager.run(&inv)).await?;

    assert_eq!(out.exit_code(), 1);
    let text = out.text();
    assert!(text.contains("out-line\n"), "stdout line unmarked: {text:?}");
    assert!(text.contains("[*]err-line\n"), "stderr line marked: {text:?}");
    assert!(!text.contains("[*]out-line"));

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn stdout_order_is_preserved_without_loss() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let inv = CommandInvocation::shell(scripts::echo_lines(200));
    let out = with_timeout(20, manager.run(&inv)).await?;

    assert_eq!(out.exit_code(), 0);
    let lines: Vec<_> = out.lines().iter().map(|l| l.text.as_str()).collect();
    let expected: Vec<String> = (0..200).map(|i| format!("line-{i}")).collect();
    assert_eq!(lines, expected);

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn observer_sees_every_line_with_its_stream() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();
    let observer = RecordingObserver::new();

    let inv = CommandInvocation::shell(scripts::stdout_and_stderr());
    let out = with_timeout(
        10,
        manager.run_with_observer(&inv, Arc::new(observer.clone())),
    )
    .await?;

    let seen = observer.seen();
    assert_eq!(seen.len(), out.lines().len());
    assert!(seen.contains(&("out-line".to_string(), false)));
    assert!(seen.contains(&("err-line".to_string(), true)));

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn start_failure_is_an_error_unless_safe() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();
    let inv = CommandInvocation::new(["leash-no-such-binary-anywhere"]);

    let err = manager.run(&inv).await.unwrap_err();
    assert!(matches!(err, LeashError::Start { .. }), "got {err:?}");

    assert!(manager.run_safe(&inv).await.is_none());

    // A start failure leaves nothing behind to sweep.
    assert!(manager.active_commands().is_empty());
    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn working_directory_is_honoured() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let dir = tempfile::tempdir()?;
    let canonical = dir.path().canonicalize()?;
    let inv = CommandInvocation::shell("pwd -P").cwd(dir.path());
    let out = with_timeout(10, manager.run(&inv)).await?;

    assert_eq!(out.text().trim(), canonical.to_string_lossy());

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn shell_wrapping_enables_pipes() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let inv = CommandInvocation::shell("printf 'a\\nb\\n' | wc -l");
    let out = with_timeout(10, manager.run(&inv)).await?;

    assert_eq!(out.text().trim(), "2");

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn child_exit_code_is_reported() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let out = with_timeout(10, manager.run(&CommandInvocation::shell("exit 7"))).await?;
    assert_eq!(out.exit_code(), 7);
    assert!(!out.success());

    manager.close().await;
    Ok(())
}
