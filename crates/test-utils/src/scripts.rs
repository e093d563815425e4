//! Shell snippets used by the integration tests.
//!
//! Everything here is POSIX `sh`; the process-spawning tests are gated to
//! Unix. Long-running scripts chain a second command after the `sleep` so
//! the shell cannot `exec` into it — the `sh` process itself must stay the
//! root of the tree being killed.

/// Print `line-0` .. `line-{n-1}` to stdout, one per line.
pub fn echo_lines(n: usize) -> String {
    format!("i=0; while [ \"$i\" -lt {n} ]; do echo line-$i; i=$((i+1)); done")
}

/// One line on each stream, then a failing exit code.
pub fn stdout_and_stderr() -> String {
    "echo out-line; echo err-line >&2; exit 1".to_string()
}

/// Sleep far longer than any test runs.
pub fn sleep_forever() -> String {
    "sleep 600; echo woke".to_string()
}

/// Sleep with a background child, so the tree has a live descendant.
pub fn sleep_with_child() -> String {
    "sleep 600 & sleep 600; wait".to_string()
}

/// Ignore polite termination requests and keep respawning sleeps, so only
/// the non-catchable stages can end the shell.
pub fn ignore_term_and_sleep() -> String {
    "trap '' TERM INT; while :; do sleep 1; done".to_string()
}
