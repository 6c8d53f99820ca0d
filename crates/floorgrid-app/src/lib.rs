//! FloorGrid command line front end.
//!
//! Reads project snapshots and writes the navigation export. This is the only
//! part of the workspace that touches the filesystem.

pub mod cli;
pub mod error;
pub mod files;

pub use cli::Cli;
pub use error::{AppError, AppResult};
