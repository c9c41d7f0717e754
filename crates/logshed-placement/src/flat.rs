//! Flat (single-domain) selection.
//!
//! When a log's sync replication scope is node-level there are no
//! cross-domain constraints, and the whole eligible pool is treated as one
//! domain: no divisibility requirement, no per-domain quota. Locations are
//! not consulted, so clusters without location tags still get storage sets
//! for node-replicated logs.

use tracing::error;

use logshed_core::{valid_storage_set, ClusterConfig, LogId, NodeIndex, ReplicationProperty};

use crate::error::SelectionError;
use crate::options::SelectorOptions;
use crate::sampler::sample_from_domain;
use crate::seed::rng_for;
use crate::selector::{fail, record_outcome, Decision, NodeSetSelector, StorageSet};

/// Uniform selection over the whole eligible pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSelector;

impl FlatSelector {
    /// Create a flat selector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn eligible_nodes(config: &ClusterConfig, options: &SelectorOptions) -> Vec<NodeIndex> {
        config
            .nodes()
            .filter(|(index, node)| {
                node.include_in_nodesets && !options.exclude_nodes.contains(index)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

impl NodeSetSelector for FlatSelector {
    fn select(
        &self,
        log_id: LogId,
        config: &ClusterConfig,
        previous: Option<&StorageSet>,
        options: &SelectorOptions,
    ) -> Decision {
        crate::error::clear_last_error();

        let Some(group) = config.log_group(log_id) else {
            error!(log_id = %log_id, "log group not found");
            return fail("flat", SelectionError::NotFound(log_id));
        };
        let replication_factor = group.replication.replication_factor();

        let eligible = Self::eligible_nodes(config, options);
        if eligible.len() < replication_factor {
            error!(
                log_id = %log_id,
                needed = replication_factor,
                available = eligible.len(),
                "not enough eligible nodes in the cluster"
            );
            return fail(
                "flat",
                SelectionError::NotEnoughInDomain {
                    domain: String::new(),
                    needed: replication_factor,
                    available: eligible.len(),
                },
            );
        }

        let target = group.nodeset_size.unwrap_or(eligible.len());
        let nodeset_size = target.clamp(replication_factor, eligible.len());

        let mut rng = rng_for(options, log_id);
        let mut result =
            match sample_from_domain(&mut rng, config, "", &eligible, nodeset_size) {
                Ok(picked) => picked,
                Err(err) => return fail("flat", err),
            };
        result.sort_unstable();
        result.dedup();

        if !valid_storage_set(config, &result, &group.replication) {
            error!(
                log_id = %log_id,
                storage_set = ?result,
                replication = %group.replication,
                "selected storage set cannot satisfy replication, check node weights"
            );
            return fail(
                "flat",
                SelectionError::InvalidWeights { replication: group.replication.to_string() },
            );
        }

        let decision = match previous {
            Some(prev) if *prev == result => Decision::Keep,
            _ => Decision::NeedsChange(result),
        };
        record_outcome("flat", &decision);
        decision
    }

    fn recommended_size(
        &self,
        _log_id: LogId,
        config: &ClusterConfig,
        target: Option<usize>,
        replication: &ReplicationProperty,
        options: &SelectorOptions,
    ) -> usize {
        let eligible = Self::eligible_nodes(config, options).len();
        let replication_factor = replication.replication_factor();
        if eligible < replication_factor {
            return 0;
        }
        target.unwrap_or(eligible).clamp(replication_factor, eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logshed_core::{LocationScope, LogGroup, NodeDescriptor};

    fn flat_cluster(num_nodes: u32) -> ClusterConfig {
        // no locations: flat selection must not require them
        let mut config = ClusterConfig::new();
        for index in 0..num_nodes {
            config.insert_node(index, NodeDescriptor::new(format!("10.0.0.{index}:4440")));
        }
        config
    }

    #[test]
    fn test_selects_target_from_pool() {
        let mut config = flat_cluster(8);
        config.insert_log_group(
            LogId(1),
            LogGroup::new("g", ReplicationProperty::new(LocationScope::Node, 3))
                .with_nodeset_size(5),
        );
        let selector = FlatSelector::new();
        let decision =
            selector.select(LogId(1), &config, None, &SelectorOptions::new().with_seed(11));

        let Decision::NeedsChange(set) = decision else {
            panic!("expected NeedsChange");
        };
        assert_eq!(set.len(), 5);
        assert!(set.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_target_clamped_to_pool() {
        let mut config = flat_cluster(4);
        config.insert_log_group(
            LogId(1),
            LogGroup::new("g", ReplicationProperty::new(LocationScope::Node, 2))
                .with_nodeset_size(100),
        );
        let selector = FlatSelector::new();
        let Decision::NeedsChange(set) =
            selector.select(LogId(1), &config, None, &SelectorOptions::new().with_seed(1))
        else {
            panic!("expected NeedsChange");
        };
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_too_few_nodes_fails() {
        let mut config = flat_cluster(2);
        config.insert_log_group(
            LogId(1),
            LogGroup::new("g", ReplicationProperty::new(LocationScope::Node, 3)),
        );
        let selector = FlatSelector::new();
        let decision =
            selector.select(LogId(1), &config, None, &SelectorOptions::new().with_seed(1));
        assert!(matches!(
            decision,
            Decision::Failed(SelectionError::NotEnoughInDomain { needed: 3, available: 2, .. })
        ));
    }

    #[test]
    fn test_keep_when_previous_matches() {
        let mut config = flat_cluster(6);
        config.insert_log_group(
            LogId(1),
            LogGroup::new("g", ReplicationProperty::new(LocationScope::Node, 2))
                .with_nodeset_size(4),
        );
        let selector = FlatSelector::new();
        let options = SelectorOptions::new().with_seed(9);

        let Decision::NeedsChange(set) = selector.select(LogId(1), &config, None, &options)
        else {
            panic!("expected NeedsChange");
        };
        let decision = selector.select(LogId(1), &config, Some(&set), &options);
        assert_eq!(decision, Decision::Keep);
    }

    #[test]
    fn test_recommended_size() {
        let mut config = flat_cluster(6);
        config.insert_node(6, NodeDescriptor::new("10.0.0.6:4440").sequencer_only());
        let selector = FlatSelector::new();
        let replication = ReplicationProperty::new(LocationScope::Node, 3);
        let options = SelectorOptions::new();

        let size = |target| {
            selector.recommended_size(LogId(1), &config, target, &replication, &options)
        };
        assert_eq!(size(Some(4)), 4);
        assert_eq!(size(None), 6);
        assert_eq!(size(Some(1)), 3);
    }
}
