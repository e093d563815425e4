// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeashError {
    #[error("empty command")]
    EmptyCommand,

    #[error("shell wrapping requested but this platform has no configured shell")]
    UnsupportedPlatform,

    #[error("failed to start '{command}': {source}")]
    Start {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LeashError>;
