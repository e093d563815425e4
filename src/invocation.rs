// src/invocation.rs

//! Command invocations: what to run, where, and whether to go through the
//! host shell.
//!
//! An invocation is immutable once the process has been started; the
//! launcher only ever reads it. Shell wrapping prefixes the platform's
//! script shell (`cmd /C` on Windows, `sh -c` on POSIX) so commands may use
//! pipes, redirection and the like. Requesting the shell on a platform with
//! no configured mapping is a start failure, not a silent fallback.

use std::path::{Path, PathBuf};

use crate::errors::{LeashError, Result};

/// Host-shell prefix used when an invocation asks for shell wrapping.
fn host_shell() -> Option<(&'static str, &'static str)> {
    if cfg!(windows) {
        Some(("cmd", "/C"))
    } else if cfg!(unix) {
        Some(("sh", "-c"))
    } else {
        None
    }
}

/// A command to run: tokens, optional working directory, optional shell
/// wrapping.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    tokens: Vec<String>,
    cwd: Option<PathBuf>,
    use_shell: bool,
}

impl CommandInvocation {
    /// Build an invocation from an explicit token list (program + args).
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            cwd: None,
            use_shell: false,
        }
    }

    /// Build a shell-wrapped invocation from a single shell-syntax string.
    pub fn shell(command: impl Into<String>) -> Self {
        Self::new([command.into()]).use_shell(true)
    }

    /// Set the working directory the process starts in.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Toggle host-shell wrapping.
    pub fn use_shell(mut self, use_shell: bool) -> Self {
        self.use_shell = use_shell;
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The literal command line, as recorded in the process registry and in
    /// log messages.
    pub fn command_line(&self) -> String {
        self.tokens.join(" ")
    }

    /// Final token list handed to the OS, shell prefix included when
    /// requested.
    pub(crate) fn final_tokens(&self) -> Result<Vec<String>> {
        if self.tokens.is_empty() || self.tokens[0].is_empty() {
            return Err(LeashError::EmptyCommand);
        }
        if !self.use_shell {
            return Ok(self.tokens.clone());
        }
        let (shell, switch) = host_shell().ok_or(LeashError::UnsupportedPlatform)?;
        Ok(vec![
            shell.to_string(),
            switch.to_string(),
            self.tokens.join(" "),
        ])
    }
}
