// src/lib.rs

pub mod cli;
pub mod errors;
pub mod exec;
pub mod invocation;
pub mod kill;
pub mod logging;
pub mod manager;
pub mod output;
pub mod registry;
pub mod tree;

use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::CliArgs;

pub use crate::errors::{LeashError, Result};
pub use crate::exec::RunningCommand;
pub use crate::invocation::CommandInvocation;
pub use crate::manager::ProcessManager;
pub use crate::output::{CommandOutput, LineObserver, OutputLine, StreamSource, STDERR_MARK};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - a process manager (with its shutdown sweep)
/// - the invocation built from the CLI arguments
/// - the optional kill-after timer
///
/// Returns the child's exit code so `main` can propagate it.
pub async fn run(args: CliArgs) -> Result<i32> {
    let mut invocation = CommandInvocation::new(args.command).use_shell(args.shell);
    if let Some(dir) = args.cwd {
        invocation = invocation.cwd(dir);
    }

    let manager = Arc::new(ProcessManager::new());
    let running = manager.spawn(&invocation)?;

    // The engine never times commands out on its own; the timer lives here,
    // in the caller, and simply asks for the kill.
    if let Some(delay) = args.kill_after {
        let pid = running.pid();
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            warn!(pid, ?delay, "kill-after timer fired; terminating process tree");
            if !manager.kill(pid).await {
                warn!(pid, "process tree could not be fully terminated");
            }
        });
    }

    let output = running.collect().await?;

    let mut stdout = std::io::stdout();
    stdout.write_all(output.text().as_bytes())?;
    stdout.flush()?;

    manager.close().await;

    info!(exit_code = output.exit_code(), "done");
    Ok(output.exit_code())
}
