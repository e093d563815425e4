// src/output.rs

//! Drained output: lines, the shared collector, and the observer seam.
//!
//! Both drain tasks append into one [`OutputCollector`]. Each task reads its
//! own stream in order, so per-stream line order is preserved by
//! construction; the interleaving *between* the two streams depends on
//! scheduling and is deliberately unspecified. Stderr lines are rendered
//! with the [`STDERR_MARK`] prefix when the combined text is produced.

use std::sync::{Arc, Mutex, PoisonError};

/// Prefix marking error-stream lines in the combined output.
pub const STDERR_MARK: &str = "[*]";

/// Which stream a line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

impl StreamSource {
    pub fn is_stderr(self) -> bool {
        self == StreamSource::Stderr
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            StreamSource::Stdout => "stdout",
            StreamSource::Stderr => "stderr",
        }
    }
}

/// One drained line together with its origin stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub source: StreamSource,
    pub text: String,
}

impl OutputLine {
    /// The line as it appears in the combined output (stderr lines marked).
    pub fn rendered(&self) -> String {
        match self.source {
            StreamSource::Stdout => self.text.clone(),
            StreamSource::Stderr => format!("{STDERR_MARK}{}", self.text),
        }
    }
}

/// Thread-safe ordered line collector shared by the two drain tasks.
#[derive(Clone, Default)]
pub struct OutputCollector {
    lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl OutputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, source: StreamSource, text: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.push(OutputLine {
            source,
            text: text.to_string(),
        });
    }

    /// Drain the collected lines. Called once, after both drain tasks have
    /// been joined.
    pub fn take_lines(&self) -> Vec<OutputLine> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *lines)
    }
}

/// Callback invoked once per drained line as it arrives.
///
/// `is_stderr` tells the observer which stream the line came from. The
/// return value is for the observer's own bookkeeping (e.g. a progress
/// indicator reporting whether it changed state) and has no effect on
/// draining.
pub trait LineObserver: Send + Sync {
    fn on_line(&self, line: &str, is_stderr: bool) -> bool;
}

impl<F> LineObserver for F
where
    F: Fn(&str, bool) -> bool + Send + Sync,
{
    fn on_line(&self, line: &str, is_stderr: bool) -> bool {
        self(line, is_stderr)
    }
}

/// Result of a completed command: exit code plus all drained lines.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    exit_code: i32,
    lines: Vec<OutputLine>,
}

impl CommandOutput {
    pub(crate) fn new(exit_code: i32, lines: Vec<OutputLine>) -> Self {
        Self { exit_code, lines }
    }

    /// Exit code of the process, `-1` if it was ended by a signal.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// Combined text: every line in per-stream order, stderr lines prefixed
    /// with [`STDERR_MARK`], one trailing newline per line.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.rendered());
            out.push('\n');
        }
        out
    }
}
