//! Error types for logshed core.

use thiserror::Error;

use crate::node::NodeIndex;

/// A specialized `Result` type for logshed core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or loading a cluster configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A location string could not be parsed.
    #[error("invalid location string '{0}'")]
    InvalidLocation(String),

    /// A scope name is not part of the scope ladder.
    #[error("unknown location scope '{0}'")]
    UnknownScope(String),

    /// A node weight is negative or not finite.
    #[error("invalid weight {weight} for node {index}")]
    InvalidWeight {
        /// The node the weight belongs to.
        index: NodeIndex,
        /// The rejected weight.
        weight: f64,
    },

    /// A replication property is malformed.
    #[error("invalid replication property: {0}")]
    InvalidReplication(String),
}
