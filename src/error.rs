//! Error types for satbridge.
//!
//! Only construction can fail. Channel operations report "full" or "nothing
//! yet" through `bool`/`Option` returns; those are normal steady states,
//! never errors.

use thiserror::Error;

/// Error type for bridge construction.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
