//! Log groups and their storage attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::replication::ReplicationProperty;

/// Identifier of a log within the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogId(pub u64);

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage attributes shared by a group of logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogGroup {
    /// Human-readable group name.
    pub name: String,
    /// Replication requirement for records of these logs.
    pub replication: ReplicationProperty,
    /// Operator-requested storage set size. `None` lets the selector size
    /// the set from the cluster.
    pub nodeset_size: Option<usize>,
}

impl LogGroup {
    /// Create a log group with no explicit storage set size target.
    #[must_use]
    pub fn new(name: impl Into<String>, replication: ReplicationProperty) -> Self {
        Self { name: name.into(), replication, nodeset_size: None }
    }

    /// Set the storage set size target.
    #[must_use]
    pub fn with_nodeset_size(mut self, size: usize) -> Self {
        self.nodeset_size = Some(size);
        self
    }
}
