//! Selection error taxonomy.
//!
//! Every failure is reported twice: through the returned
//! [`Decision::Failed`](crate::Decision::Failed) variant, and through a
//! thread-local [`last_error`] sentinel kept for callers that still follow
//! the legacy calling convention of checking an error slot after the call.

use std::cell::Cell;

use thiserror::Error;

use logshed_core::{LocationScope, LogId, NodeIndex};

/// Errors that can occur during storage set selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The log id is not present in the cluster configuration.
    #[error("log {0} not found in the cluster configuration")]
    NotFound(LogId),

    /// A candidate node has no location information.
    #[error("node {index} ({address}) has no location information")]
    MissingLocation {
        /// The offending node.
        index: NodeIndex,
        /// Its address, for the operator.
        address: String,
    },

    /// A candidate node's location omits the required scope label.
    #[error("node {index} ({address}) does not specify scope {scope} in its location '{location}'")]
    ScopeNotSpecified {
        /// The offending node.
        index: NodeIndex,
        /// Its address, for the operator.
        address: String,
        /// The scope the replication property requires.
        scope: LocationScope,
        /// The location as configured.
        location: String,
    },

    /// The sync replication scope is `Root` or wider.
    #[error("invalid sync replication scope {0}")]
    InvalidScope(LocationScope),

    /// A domain cannot supply its per-domain quota.
    #[error("domain '{domain}' has {available} eligible nodes, {needed} required")]
    NotEnoughInDomain {
        /// The domain key.
        domain: String,
        /// Nodes required from the domain.
        needed: usize,
        /// Eligible nodes the domain actually holds.
        available: usize,
    },

    /// The sampled set cannot satisfy the replication property, typically
    /// because too many members carry zero weight.
    #[error("selected storage set cannot satisfy {replication}, check node weights")]
    InvalidWeights {
        /// The replication property that was violated.
        replication: String,
    },

    /// Planning left no domain to sample from.
    #[error("no usable domains remain after size planning")]
    EmptyNodeSet,
}

/// Discriminant of a [`SelectionError`], stored in the thread-local slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`SelectionError::NotFound`].
    NotFound,
    /// See [`SelectionError::MissingLocation`].
    MissingLocation,
    /// See [`SelectionError::ScopeNotSpecified`].
    ScopeNotSpecified,
    /// See [`SelectionError::InvalidScope`].
    InvalidScope,
    /// See [`SelectionError::NotEnoughInDomain`].
    NotEnoughInDomain,
    /// See [`SelectionError::InvalidWeights`].
    InvalidWeights,
    /// See [`SelectionError::EmptyNodeSet`].
    EmptyNodeSet,
}

impl SelectionError {
    /// The discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MissingLocation { .. } => ErrorKind::MissingLocation,
            Self::ScopeNotSpecified { .. } => ErrorKind::ScopeNotSpecified,
            Self::InvalidScope(_) => ErrorKind::InvalidScope,
            Self::NotEnoughInDomain { .. } => ErrorKind::NotEnoughInDomain,
            Self::InvalidWeights { .. } => ErrorKind::InvalidWeights,
            Self::EmptyNodeSet => ErrorKind::EmptyNodeSet,
        }
    }
}

thread_local! {
    static LAST_ERROR: Cell<Option<ErrorKind>> = const { Cell::new(None) };
}

/// The error kind recorded by the most recent selection on this thread, if
/// it failed. Cleared at the start of every selection.
#[must_use]
pub fn last_error() -> Option<ErrorKind> {
    LAST_ERROR.with(Cell::get)
}

pub(crate) fn set_last_error(kind: ErrorKind) {
    LAST_ERROR.with(|slot| slot.set(Some(kind)));
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.set(None));
}
