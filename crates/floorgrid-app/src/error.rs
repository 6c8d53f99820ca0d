//! Errors surfaced by the command line front end.

use floorgrid_core::{FloorError, ImportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Floor(#[from] FloorError),
}

/// Result type for command execution.
pub type AppResult<T> = Result<T, AppError>;
