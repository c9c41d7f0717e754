//! Cluster configuration snapshots.
//!
//! A [`ClusterConfig`] is an immutable description of the tier: every node
//! with its address, location, and weight, plus the log groups and their
//! replication attributes. Consumers (selectors, schedulers) read a shared
//! snapshot; they never mutate it.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::location::{LocationScope, NodeLocation};
use crate::log_group::{LogGroup, LogId};
use crate::node::{NodeDescriptor, NodeIndex};
use crate::replication::ReplicationProperty;

/// The complete cluster description.
///
/// Node iteration order is ascending by index, which downstream selection
/// relies on for determinism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterConfig {
    nodes: BTreeMap<NodeIndex, NodeDescriptor>,
    log_groups: BTreeMap<LogId, LogGroup>,
}

impl ClusterConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// content fails validation.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content)
    }

    /// Load a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed, a node index is
    /// duplicated, a weight is negative or not finite, or a replication
    /// property is malformed.
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        let mut config = Self::new();
        for entry in file.nodes {
            if config.nodes.contains_key(&entry.index) {
                return Err(Error::Config(format!("duplicate node index {}", entry.index)));
            }
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(Error::InvalidWeight { index: entry.index, weight: entry.weight });
            }
            config.insert_node(
                entry.index,
                NodeDescriptor {
                    address: entry.address,
                    location: entry.location,
                    include_in_nodesets: entry.include_in_nodesets,
                    weight: entry.weight,
                },
            );
        }
        for entry in file.log_groups {
            let id = LogId(entry.id);
            if config.log_groups.contains_key(&id) {
                return Err(Error::Config(format!("duplicate log group id {id}")));
            }
            let replication = ReplicationProperty::from_pairs(entry.replication)?;
            let mut group = LogGroup::new(entry.name, replication);
            group.nodeset_size = entry.nodeset_size;
            config.insert_log_group(id, group);
        }
        Ok(config)
    }

    /// Add a node to the configuration, replacing any previous descriptor at
    /// the same index.
    pub fn insert_node(&mut self, index: NodeIndex, node: NodeDescriptor) {
        self.nodes.insert(index, node);
    }

    /// Add a log group to the configuration.
    pub fn insert_log_group(&mut self, id: LogId, group: LogGroup) {
        self.log_groups.insert(id, group);
    }

    /// All nodes, in ascending index order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NodeDescriptor)> + '_ {
        self.nodes.iter().map(|(&index, node)| (index, node))
    }

    /// Look up a node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&NodeDescriptor> {
        self.nodes.get(&index)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes eligible for storage sets.
    #[must_use]
    pub fn storage_node_count(&self) -> usize {
        self.nodes.values().filter(|n| n.include_in_nodesets).count()
    }

    /// Look up a log group by id.
    #[must_use]
    pub fn log_group(&self, id: LogId) -> Option<&LogGroup> {
        self.log_groups.get(&id)
    }
}

/// On-disk representation, converted into [`ClusterConfig`] with validation.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    log_groups: Vec<LogGroupEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    index: NodeIndex,
    address: String,
    location: Option<NodeLocation>,
    #[serde(default = "default_include")]
    include_in_nodesets: bool,
    #[serde(default = "default_weight")]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct LogGroupEntry {
    id: u64,
    name: String,
    replication: BTreeMap<LocationScope, usize>,
    nodeset_size: Option<usize>,
}

fn default_include() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[nodes]]
        index = 0
        address = "10.0.0.1:4440"
        location = "rg0.dc0.cl0.row0.rk0"

        [[nodes]]
        index = 1
        address = "10.0.0.2:4440"
        location = "rg0.dc0.cl0.row0.rk1"
        weight = 0.0

        [[nodes]]
        index = 2
        address = "10.0.0.3:4440"
        include_in_nodesets = false

        [[log_groups]]
        id = 1
        name = "event-log"
        nodeset_size = 6
        [log_groups.replication]
        rack = 2
        node = 3
    "#;

    #[test]
    fn test_parse_sample() {
        let config = ClusterConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.num_nodes(), 3);
        assert_eq!(config.storage_node_count(), 2);

        let node0 = config.node(0).unwrap();
        assert!(node0.is_writable());
        assert!(node0.location.as_ref().unwrap().scope_specified(LocationScope::Rack));

        let node1 = config.node(1).unwrap();
        assert!(!node1.is_writable());

        let group = config.log_group(LogId(1)).unwrap();
        assert_eq!(group.nodeset_size, Some(6));
        assert_eq!(group.replication.sync_scope_and_factor(), (LocationScope::Rack, 3));
        assert_eq!(group.replication.replication_factor(), 3);
    }

    #[test]
    fn test_nodes_iterate_ascending() {
        let mut config = ClusterConfig::new();
        for index in [5u32, 1, 3] {
            config.insert_node(index, NodeDescriptor::new(format!("10.0.0.{index}:4440")));
        }
        let order: Vec<NodeIndex> = config.nodes().map(|(index, _)| index).collect();
        assert_eq!(order, vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_rejects_duplicate_index() {
        let content = r#"
            [[nodes]]
            index = 0
            address = "a"
            [[nodes]]
            index = 0
            address = "b"
        "#;
        assert!(matches!(ClusterConfig::parse(content), Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_rejects_negative_weight() {
        let content = r#"
            [[nodes]]
            index = 0
            address = "a"
            weight = -1.0
        "#;
        assert!(matches!(
            ClusterConfig::parse(content),
            Err(Error::InvalidWeight { index: 0, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_location() {
        let content = r#"
            [[nodes]]
            index = 0
            address = "a"
            location = "rg0..cl0"
        "#;
        assert!(ClusterConfig::parse(content).is_err());
    }

    #[test]
    fn test_parse_rejects_zero_factor() {
        let content = r#"
            [[log_groups]]
            id = 1
            name = "g"
            [log_groups.replication]
            rack = 0
        "#;
        assert!(matches!(
            ClusterConfig::parse(content),
            Err(Error::InvalidReplication(_))
        ));
    }
}
