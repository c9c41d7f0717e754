//! Storage node descriptors.

use serde::{Deserialize, Serialize};

use crate::location::NodeLocation;

/// Index of a node in the cluster configuration.
pub type NodeIndex = u32;

/// Configuration of a single cluster node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Network address of the node.
    pub address: String,
    /// Position in the cluster topology, if tagged.
    pub location: Option<NodeLocation>,
    /// Whether the node is a storage candidate. Sequencer-only nodes are
    /// excluded from storage sets entirely.
    pub include_in_nodesets: bool,
    /// Storage weight. Zero-weight nodes are still eligible but are not
    /// preferred when sampling; positive weight marks a writable node.
    pub weight: f64,
}

impl NodeDescriptor {
    /// Create a storage node with weight 1.0 and no location.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), location: None, include_in_nodesets: true, weight: 1.0 }
    }

    /// Set the node's location.
    #[must_use]
    pub fn with_location(mut self, location: NodeLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the node's storage weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Mark the node as sequencer-only (not a storage candidate).
    #[must_use]
    pub fn sequencer_only(mut self) -> Self {
        self.include_in_nodesets = false;
        self
    }

    /// Whether writes may land on this node.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.weight > 0.0
    }
}
