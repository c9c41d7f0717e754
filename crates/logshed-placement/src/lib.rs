//! Deterministic cross-domain storage set selection.
//!
//! This crate chooses which storage nodes host a log's records. Nodes are
//! grouped into failure domains at the log's sync replication scope, and the
//! selector picks an equal number of nodes from every domain so that the
//! replication requirement can always be met inside the chosen set.
//!
//! # Architecture
//!
//! ```text
//!  ClusterConfig + LogId + previous set + SelectorOptions
//!        │
//!        ▼
//!  ┌───────────────┐   domain key → eligible node indices
//!  │ DomainMap     │   (ascending index, deterministic key order)
//!  └──────┬────────┘
//!         ▼
//!  ┌───────────────┐   resolves the set size, prunes starved
//!  │ Size planner  │   domains, keeps the best plan observed
//!  └──────┬────────┘
//!         ▼
//!  ┌───────────────┐   uniform per-domain draw, positive-weight
//!  │ Sampler       │   nodes first
//!  └──────┬────────┘
//!         ▼
//!   union → sort → validate → Decision
//! ```
//!
//! Selection is a pure function of its inputs plus the rng seed, so the same
//! snapshot, log, and seed always reproduce the same decision.
//!
//! # Usage
//!
//! ```
//! use logshed_core::{
//!     ClusterConfig, LocationScope, LogGroup, LogId, NodeDescriptor, ReplicationProperty,
//! };
//! use logshed_placement::{CrossDomainSelector, Decision, NodeSetSelector, SelectorOptions};
//!
//! let mut config = ClusterConfig::new();
//! for (i, rack) in ["rk0", "rk0", "rk1", "rk1", "rk2", "rk2"].iter().enumerate() {
//!     let location = format!("rg0.dc0.cl0.row0.{rack}").parse()?;
//!     let node = NodeDescriptor::new(format!("10.0.0.{i}:4440")).with_location(location);
//!     config.insert_node(i as u32, node);
//! }
//! config.insert_log_group(
//!     LogId(1),
//!     LogGroup::new("event-log", ReplicationProperty::new(LocationScope::Rack, 2))
//!         .with_nodeset_size(6),
//! );
//!
//! let selector = CrossDomainSelector::new();
//! let options = SelectorOptions::new().with_seed(42);
//! match selector.select(LogId(1), &config, None, &options) {
//!     Decision::NeedsChange(set) => assert_eq!(set.len(), 6),
//!     other => panic!("unexpected decision: {other:?}"),
//! }
//! # Ok::<(), logshed_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod domain_map;
pub mod error;
pub mod flat;
pub mod options;
pub mod planner;
pub mod sampler;
pub mod seed;
pub mod selector;

pub use domain_map::{build_domain_map, DomainMap};
pub use error::{last_error, ErrorKind, SelectionError};
pub use flat::FlatSelector;
pub use options::SelectorOptions;
pub use planner::plan_size;
pub use sampler::sample_from_domain;
pub use selector::{CrossDomainSelector, Decision, NodeSetSelector, StorageSet};
