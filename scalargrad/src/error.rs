//! Crate-level error type.
//!
//! Module errors ([`ConfigError`], [`StateError`]) convert into [`Error`] with `?`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::state::StateError;

/// Any error surfaced by the harness.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    /// Writing the DOT graph failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
