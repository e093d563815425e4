// src/kill/stage.rs

//! The fixed termination-stage table.
//!
//! A stage is an action applied to every live member of the tree, a
//! traversal order, and a validation delay after which liveness is
//! rechecked. The table is an ordered const slice — a kill attempt walks it
//! by position, forward only, and the last row is terminal. The only
//! platform difference is the tail: Windows ends on `taskkill /F /T`
//! (already maximally forceful), everything else follows the external
//! `kill -TERM` pass with a final non-catchable SIGKILL.

use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

/// Validation delay after the graceful and signal-command stages.
pub const SHORT_DELAY: Duration = Duration::from_millis(500);
/// Validation delay after force-destroy; stubborn trees get longer to fall.
pub const FORCE_DELAY: Duration = Duration::from_millis(1500);

/// Order in which tree members are visited within one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Parents before children.
    Forward,
    /// Children before parents, so a parent is never taken down while a
    /// child still depends on it.
    Reverse,
}

/// What a stage does to one live process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Ask the process to exit on its own terms.
    GracefulExit,
    /// Destroy the process forcibly through the OS process API.
    ForceDestroy,
    /// Shell out to the platform's own kill command.
    SystemKillCommand,
    /// Non-catchable kill signal; nothing survives this on purpose.
    #[cfg(unix)]
    ForceKillSignal,
}

impl StageKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            StageKind::GracefulExit => "graceful-exit",
            StageKind::ForceDestroy => "force-destroy",
            StageKind::SystemKillCommand => "system-kill-command",
            #[cfg(unix)]
            StageKind::ForceKillSignal => "force-kill-signal",
        }
    }

    /// Apply this stage's action to one live pid. Best-effort: failures are
    /// logged at debug and otherwise ignored so one recalcitrant process
    /// never blocks the rest of the tree.
    pub(crate) async fn apply(self, pid: u32) {
        #[cfg(unix)]
        {
            use nix::sys::signal::Signal;

            match self {
                StageKind::GracefulExit => send_signal(pid, Signal::SIGTERM),
                StageKind::ForceDestroy | StageKind::ForceKillSignal => {
                    send_signal(pid, Signal::SIGKILL)
                }
                StageKind::SystemKillCommand => {
                    run_signal_command("kill", &["-TERM", &pid.to_string()]).await;
                }
            }
        }

        #[cfg(windows)]
        {
            let pid_arg = pid.to_string();
            match self {
                StageKind::GracefulExit => {
                    run_signal_command("taskkill", &["/PID", &pid_arg]).await;
                }
                StageKind::ForceDestroy => {
                    run_signal_command("taskkill", &["/F", "/PID", &pid_arg]).await;
                }
                StageKind::SystemKillCommand => {
                    run_signal_command("taskkill", &["/F", "/T", "/PID", &pid_arg]).await;
                }
            }
        }

        #[cfg(not(any(unix, windows)))]
        let _ = pid;
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal) {
    let target = nix::unistd::Pid::from_raw(pid as i32);
    if let Err(err) = nix::sys::signal::kill(target, signal) {
        debug!(pid, %signal, %err, "signal delivery failed");
    }
}

async fn run_signal_command(program: &str, args: &[&str]) {
    let result = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match result {
        Ok(status) if !status.success() => {
            debug!(program, ?args, code = status.code(), "kill command reported failure");
        }
        Ok(_) => {}
        Err(err) => debug!(program, ?args, %err, "kill command failed to run"),
    }
}

/// One row of the termination table.
#[derive(Debug, Clone, Copy)]
pub struct TerminationStage {
    pub kind: StageKind,
    pub delay: Duration,
    pub order: Traversal,
}

#[cfg(unix)]
const STAGES: &[TerminationStage] = &[
    TerminationStage {
        kind: StageKind::GracefulExit,
        delay: SHORT_DELAY,
        order: Traversal::Forward,
    },
    TerminationStage {
        kind: StageKind::ForceDestroy,
        delay: FORCE_DELAY,
        order: Traversal::Forward,
    },
    TerminationStage {
        kind: StageKind::SystemKillCommand,
        delay: SHORT_DELAY,
        order: Traversal::Reverse,
    },
    TerminationStage {
        kind: StageKind::ForceKillSignal,
        delay: SHORT_DELAY,
        order: Traversal::Forward,
    },
];

#[cfg(windows)]
const STAGES: &[TerminationStage] = &[
    TerminationStage {
        kind: StageKind::GracefulExit,
        delay: SHORT_DELAY,
        order: Traversal::Forward,
    },
    TerminationStage {
        kind: StageKind::ForceDestroy,
        delay: FORCE_DELAY,
        order: Traversal::Forward,
    },
    TerminationStage {
        kind: StageKind::SystemKillCommand,
        delay: SHORT_DELAY,
        order: Traversal::Reverse,
    },
];

#[cfg(not(any(unix, windows)))]
const STAGES: &[TerminationStage] = &[];

/// The platform's termination sequence, in escalation order.
pub fn stages() -> &'static [TerminationStage] {
    STAGES
}
