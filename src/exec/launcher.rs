// src/exec/launcher.rs

//! Process launching and output collection.
//!
//! The wait sequence is fixed: start the process, register it, start both
//! drain tasks, wait for process exit, wait for both drains to flush, only
//! then read the collected output and unregister. This ordering guarantees
//! no output is lost between the process's exit and its streams draining
//! dry.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::info;

use crate::errors::{LeashError, Result};
use crate::exec::drain::spawn_drain;
use crate::invocation::CommandInvocation;
use crate::output::{CommandOutput, LineObserver, OutputCollector, StreamSource};
use crate::registry::ProcessRegistry;

/// Start the process described by `invocation` and attach both drains.
///
/// The pid is registered in `registry` immediately after a successful
/// spawn; [`RunningCommand::collect`] unregisters it again.
pub(crate) fn launch(
    invocation: &CommandInvocation,
    observer: Option<Arc<dyn LineObserver>>,
    registry: Arc<ProcessRegistry>,
) -> Result<RunningCommand> {
    let tokens = invocation.final_tokens()?;
    let command_line = invocation.command_line();

    let mut cmd = Command::new(&tokens[0]);
    cmd.args(&tokens[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = invocation.working_dir() {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| LeashError::Start {
        command: command_line.clone(),
        source,
    })?;

    let pid = child.id().ok_or_else(|| LeashError::Start {
        command: command_line.clone(),
        source: std::io::Error::other("process exited before its pid could be observed"),
    })?;

    info!(pid, command = %command_line, "command started");
    registry.register(pid, &command_line);

    let collector = OutputCollector::new();
    let mut drains = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        drains.push(spawn_drain(
            stdout,
            StreamSource::Stdout,
            collector.clone(),
            observer.clone(),
        ));
    }
    if let Some(stderr) = child.stderr.take() {
        drains.push(spawn_drain(
            stderr,
            StreamSource::Stderr,
            collector.clone(),
            observer,
        ));
    }

    Ok(RunningCommand {
        pid,
        command_line,
        child,
        collector,
        drains,
        registry,
    })
}

/// A started process: live handle plus the blocking collect operation.
pub struct RunningCommand {
    pid: u32,
    command_line: String,
    child: tokio::process::Child,
    collector: OutputCollector,
    drains: Vec<JoinHandle<()>>,
    registry: Arc<ProcessRegistry>,
}

impl RunningCommand {
    /// OS pid of the root process.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The command line this process was started with.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Wait for the process to exit and both streams to drain, then return
    /// the collected output.
    pub async fn collect(mut self) -> Result<CommandOutput> {
        let status = self.child.wait().await;

        // Completion barrier: every drain must have flushed before the
        // collector is read. One join handle per drained channel.
        for handle in self.drains {
            let _ = handle.await;
        }

        self.registry.unregister(self.pid);

        let status = status?;
        let exit_code = status.code().unwrap_or(-1);
        info!(pid = self.pid, exit_code, command = %self.command_line, "command exited");

        Ok(CommandOutput::new(exit_code, self.collector.take_lines()))
    }
}
