//! Error types for the cache boundary
//!
//! Cache operations themselves never fail; these errors cover loading
//! configuration and parsing driver commands.

use thiserror::Error;

// == Cache Error Enum ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable held a malformed value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A driver command line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
