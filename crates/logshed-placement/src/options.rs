//! Selection options.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use logshed_core::NodeIndex;

/// Caller-supplied knobs for a selection.
///
/// Absent fields fall back to defaults: no exclusions, and a draw seeded
/// from process entropy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// Nodes that must not appear in the result, e.g. nodes being drained.
    pub exclude_nodes: HashSet<NodeIndex>,
    /// Seed for the random draw. The same seed with the same inputs
    /// reproduces the same selection.
    pub rng_seed: Option<u64>,
}

impl SelectorOptions {
    /// Options with no exclusions and an entropy-seeded draw.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add nodes to the exclusion set.
    #[must_use]
    pub fn exclude(mut self, nodes: impl IntoIterator<Item = NodeIndex>) -> Self {
        self.exclude_nodes.extend(nodes);
        self
    }

    /// Fix the rng seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SelectorOptions::new();
        assert!(options.exclude_nodes.is_empty());
        assert_eq!(options.rng_seed, None);
    }

    #[test]
    fn test_builders() {
        let options = SelectorOptions::new().exclude([1, 2]).exclude([2, 3]).with_seed(7);
        assert_eq!(options.exclude_nodes.len(), 3);
        assert_eq!(options.rng_seed, Some(7));
    }
}
