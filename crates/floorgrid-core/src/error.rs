//! Error types shared by the core modules.

use crate::floor::FloorKey;
use thiserror::Error;

/// Grid configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Invalid grid size: {0} (must be at least 1)")]
    InvalidGridSize(i64),
}

/// Floor lifecycle and mutation errors.
///
/// Every variant is a rejected precondition: the store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloorError {
    #[error("Floor name must not be empty")]
    EmptyName,
    #[error("Floor already exists: {0}")]
    Duplicate(FloorKey),
    #[error("Floor not found: {0}")]
    NotFound(FloorKey),
    #[error("No active floor")]
    NoActiveFloor,
}

/// Snapshot import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

/// Result type for floor operations.
pub type FloorResult<T> = Result<T, FloorError>;
