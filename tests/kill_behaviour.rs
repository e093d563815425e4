//! Escalating-termination behaviour against real process trees.

#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use leash::tree::{self, ProcessTree};
use leash::{CommandInvocation, ProcessManager};
use leash_test_utils::{init_tracing, scripts, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// Wait for the tree rooted at `root` to grow to at least `n` live members.
/// The shell needs a moment to fork its children.
async fn wait_for_tree_size(root: u32, n: usize) -> Vec<u32> {
    let mut tree = ProcessTree::new(root);
    for _ in 0..100 {
        let pids = tree.live_pids();
        if pids.len() >= n {
            return pids;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("tree rooted at {root} never reached {n} live members");
}

#[tokio::test]
async fn kill_terminates_a_sleeping_tree() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let running = manager.spawn(&CommandInvocation::shell(scripts::sleep_forever()))?;
    let pid = running.pid();
    wait_for_tree_size(pid, 1).await;

    assert!(manager.kill(pid).await);
    assert!(!tree::is_alive(pid));

    // The launcher still completes normally after an external kill.
    let out = with_timeout(10, running.collect()).await?;
    assert!(!out.success());

    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn kill_reaches_descendants() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let running = manager.spawn(&CommandInvocation::shell(scripts::sleep_with_child()))?;
    let pid = running.pid();

    // Root shell plus at least one sleeping child.
    let members = wait_for_tree_size(pid, 2).await;

    assert!(manager.kill(pid).await);
    for member in members {
        assert!(!tree::is_alive(member), "pid {member} survived the kill");
    }

    with_timeout(10, running.collect()).await?;
    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn kill_defeats_a_term_trap_within_bounded_time() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let running = manager.spawn(&CommandInvocation::shell(scripts::ignore_term_and_sleep()))?;
    let pid = running.pid();
    wait_for_tree_size(pid, 1).await;

    let start = Instant::now();
    assert!(manager.kill(pid).await);
    let elapsed = start.elapsed();

    // Bounded by the sum of the stage validation delays, not by the sleep
    // the child was in.
    assert!(elapsed < Duration::from_secs(10), "kill took {elapsed:?}");
    assert!(!tree::is_alive(pid));

    with_timeout(10, running.collect()).await?;
    manager.close().await;
    Ok(())
}

#[tokio::test]
async fn kill_is_idempotent_on_a_dead_handle() -> TestResult {
    init_tracing();
    let manager = ProcessManager::new();

    let running = manager.spawn(&CommandInvocation::new(["true"]))?;
    let pid = running.pid();
    with_timeout(10, running.collect()).await?;

    // First call: tree already dead, immediately true.
    assert!(manager.kill(pid).await);

    // Second call: still true, and fast — no stage is ever re-entered for a
    // dead tree, so no validation delay is paid.
    let start = Instant::now();
    assert!(manager.kill(pid).await);
    assert!(start.elapsed() < Duration::from_millis(500));

    manager.close().await;
    Ok(())
}
