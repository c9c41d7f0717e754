//! Core types for the logshed distributed log store.
//!
//! This crate provides the building blocks shared across logshed components:
//! - Cluster configuration snapshots (nodes, locations, log groups)
//! - Hierarchical location scopes and domain keys
//! - Replication properties and the weight-aware storage set validator
//! - Error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod location;
pub mod log_group;
pub mod node;
pub mod replication;
pub mod validator;

pub use config::ClusterConfig;
pub use error::{Error, Result};
pub use location::{LocationScope, NodeLocation};
pub use log_group::{LogGroup, LogId};
pub use node::{NodeDescriptor, NodeIndex};
pub use replication::ReplicationProperty;
pub use validator::valid_storage_set;
