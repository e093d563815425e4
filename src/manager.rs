// src/manager.rs

//! The process manager service.
//!
//! A [`ProcessManager`] owns the registry of in-flight processes and is the
//! front door for running and killing commands. It is a constructed service
//! with an explicit lifecycle rather than process-global state: the binary
//! builds one in `run()` and closes it on the way out, and tests build as
//! many isolated managers as they like.
//!
//! `close()` is the shutdown sweep: every process still registered at that
//! point is driven through the full termination sequence, and anything that
//! survives is logged with its originating command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::exec::launcher::{launch, RunningCommand};
use crate::invocation::CommandInvocation;
use crate::kill;
use crate::output::{CommandOutput, LineObserver};
use crate::registry::ProcessRegistry;
use crate::tree::ProcessTree;

pub struct ProcessManager {
    registry: Arc<ProcessRegistry>,
    closed: AtomicBool,
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessManager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ProcessRegistry::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Start a process and return its live handle. The caller must consume
    /// the handle with [`RunningCommand::collect`] to get the output.
    pub fn spawn(&self, invocation: &CommandInvocation) -> Result<RunningCommand> {
        launch(invocation, None, Arc::clone(&self.registry))
    }

    /// Like [`spawn`](Self::spawn), with an observer invoked once per
    /// drained line.
    pub fn spawn_with_observer(
        &self,
        invocation: &CommandInvocation,
        observer: Arc<dyn LineObserver>,
    ) -> Result<RunningCommand> {
        launch(invocation, Some(observer), Arc::clone(&self.registry))
    }

    /// Run a command to completion and collect its output.
    pub async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
        self.spawn(invocation)?.collect().await
    }

    /// Run a command to completion, reporting every line to `observer`.
    pub async fn run_with_observer(
        &self,
        invocation: &CommandInvocation,
        observer: Arc<dyn LineObserver>,
    ) -> Result<CommandOutput> {
        self.spawn_with_observer(invocation, observer)?.collect().await
    }

    /// Safe execution: start/run failures become `None` instead of an
    /// error.
    pub async fn run_safe(&self, invocation: &CommandInvocation) -> Option<CommandOutput> {
        match self.run(invocation).await {
            Ok(output) => Some(output),
            Err(err) => {
                warn!(command = %invocation.command_line(), %err, "command did not run; returning no output");
                None
            }
        }
    }

    /// Kill the process tree rooted at `pid`, escalating until everything
    /// is dead or the stage sequence is exhausted. Returns whether the
    /// whole tree was confirmed dead; on success the registry entry is
    /// dropped.
    pub async fn kill(&self, pid: u32) -> bool {
        let dead = kill::kill_tree(pid).await;
        if dead {
            self.registry.unregister(pid);
        }
        dead
    }

    /// Commands currently registered, for inspection and tests.
    pub fn active_commands(&self) -> Vec<(u32, String)> {
        self.registry.snapshot()
    }

    /// Shutdown sweep: terminate every process still registered. Survivors
    /// are logged, never raised. Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let entries = self.registry.snapshot();
        if entries.is_empty() {
            return;
        }

        info!(count = entries.len(), "sweeping processes still registered at shutdown");
        for (pid, command) in entries {
            if kill::kill_tree(pid).await {
                self.registry.unregister(pid);
            } else {
                report_survivors(pid, &command);
            }
        }
    }
}

impl Drop for ProcessManager {
    fn drop(&mut self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let leftover = self.registry.snapshot().len();
        if leftover > 0 {
            warn!(leftover, "process manager dropped without close(); processes may outlive the program");
        }
    }
}

/// Log every still-live member of a tree the sweep failed to kill,
/// distinguishing the root from its subprocesses.
fn report_survivors(root: u32, command: &str) {
    let mut tree = ProcessTree::new(root);
    for pid in tree.live_pids() {
        if pid == root {
            error!(pid, command, "process survived the full termination sequence");
        } else {
            error!(pid, root, command, "subprocess survived the full termination sequence");
        }
    }
}
