//! Storage set selection.
//!
//! [`CrossDomainSelector`] picks a balanced storage set for a log: the
//! eligible nodes are grouped into domains at the log's sync replication
//! scope, the planner settles the size and prunes starved domains, and an
//! equal quota is sampled from every remaining domain. The union is
//! validated against the replication property before it is returned, so a
//! selection never silently under-replicates.

use metrics::counter;
use tracing::{debug, error};

use logshed_core::{
    valid_storage_set, ClusterConfig, LocationScope, LogId, NodeIndex, ReplicationProperty,
};

use crate::domain_map::build_domain_map;
use crate::error::{clear_last_error, set_last_error, ErrorKind, SelectionError};
use crate::flat::FlatSelector;
use crate::options::SelectorOptions;
use crate::planner::plan_size;
use crate::sampler::sample_from_domain;
use crate::seed::rng_for;

/// A sorted set of distinct storage node indices.
pub type StorageSet = Vec<NodeIndex>;

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The previous storage set still matches; nothing to do.
    Keep,
    /// A new storage set should be installed.
    NeedsChange(StorageSet),
    /// No valid storage set could be selected.
    Failed(SelectionError),
}

/// A storage set selection policy.
///
/// Implementations are pure: the decision depends only on the arguments
/// (plus the rng seeded from `options`), so a shared configuration snapshot
/// can be consulted from many threads at once.
pub trait NodeSetSelector {
    /// Select a storage set for `log_id`, or decide the previous one stands.
    fn select(
        &self,
        log_id: LogId,
        config: &ClusterConfig,
        previous: Option<&StorageSet>,
        options: &SelectorOptions,
    ) -> Decision;

    /// The storage set size this policy would settle on, without sampling.
    /// Returns 0 when no set could be planned.
    fn recommended_size(
        &self,
        log_id: LogId,
        config: &ClusterConfig,
        target: Option<usize>,
        replication: &ReplicationProperty,
        options: &SelectorOptions,
    ) -> usize;
}

/// Cross-domain selection with a node-scope fallback.
pub struct CrossDomainSelector {
    fallback: Box<dyn NodeSetSelector + Send + Sync>,
}

impl CrossDomainSelector {
    /// A selector that falls back to [`FlatSelector`] for logs whose sync
    /// replication scope is node-level.
    #[must_use]
    pub fn new() -> Self {
        Self { fallback: Box::new(FlatSelector::new()) }
    }

    /// A selector with a custom node-scope fallback.
    #[must_use]
    pub fn with_fallback(fallback: Box<dyn NodeSetSelector + Send + Sync>) -> Self {
        Self { fallback }
    }
}

impl Default for CrossDomainSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSetSelector for CrossDomainSelector {
    fn select(
        &self,
        log_id: LogId,
        config: &ClusterConfig,
        previous: Option<&StorageSet>,
        options: &SelectorOptions,
    ) -> Decision {
        clear_last_error();

        let Some(group) = config.log_group(log_id) else {
            error!(log_id = %log_id, "log group not found");
            return fail("cross_domain", SelectionError::NotFound(log_id));
        };
        let (scope, replication_factor) = group.replication.sync_scope_and_factor();

        if scope == LocationScope::Node {
            debug!(
                log_id = %log_id,
                "log does not use cross-domain replication, delegating to flat selection"
            );
            return self.fallback.select(log_id, config, previous, options);
        }
        if scope >= LocationScope::Root {
            error!(
                log_id = %log_id,
                scope = %scope,
                replication = %group.replication,
                "invalid sync replication scope"
            );
            return fail("cross_domain", SelectionError::InvalidScope(scope));
        }

        let mut domain_map = match build_domain_map(config, scope, options) {
            Ok(map) => map,
            Err(err) => return fail("cross_domain", err),
        };

        let nodeset_size =
            plan_size(log_id, group.nodeset_size, replication_factor, &mut domain_map);
        if nodeset_size == 0 || domain_map.is_empty() {
            error!(log_id = %log_id, "no usable domains remain after size planning");
            return fail("cross_domain", SelectionError::EmptyNodeSet);
        }
        let nodes_per_domain = nodeset_size / domain_map.num_domains();

        let mut rng = rng_for(options, log_id);
        let mut result: StorageSet = Vec::with_capacity(nodeset_size);
        for (domain, nodes) in domain_map.iter() {
            match sample_from_domain(&mut rng, config, domain, nodes, nodes_per_domain) {
                Ok(picked) => result.extend(picked),
                Err(err) => {
                    error!(
                        log_id = %log_id,
                        domain = domain,
                        needed = nodes_per_domain,
                        available = nodes.len(),
                        nodeset_size,
                        "domain cannot supply its share of the storage set"
                    );
                    return fail("cross_domain", err);
                }
            }
        }

        result.sort_unstable();
        // domains partition the cluster, so duplicates would be a bug
        result.dedup();
        debug_assert_eq!(result.len(), nodeset_size);

        if !valid_storage_set(config, &result, &group.replication) {
            error!(
                log_id = %log_id,
                storage_set = ?result,
                replication = %group.replication,
                "selected storage set cannot satisfy replication, check node weights"
            );
            return fail(
                "cross_domain",
                SelectionError::InvalidWeights { replication: group.replication.to_string() },
            );
        }

        let decision = match previous {
            Some(prev) if *prev == result => Decision::Keep,
            _ => Decision::NeedsChange(result),
        };
        record_outcome("cross_domain", &decision);
        decision
    }

    fn recommended_size(
        &self,
        log_id: LogId,
        config: &ClusterConfig,
        target: Option<usize>,
        replication: &ReplicationProperty,
        options: &SelectorOptions,
    ) -> usize {
        let (scope, replication_factor) = replication.sync_scope_and_factor();
        if scope == LocationScope::Node {
            return self.fallback.recommended_size(log_id, config, target, replication, options);
        }
        if scope >= LocationScope::Root {
            set_last_error(ErrorKind::InvalidScope);
            return 0;
        }
        match build_domain_map(config, scope, options) {
            Ok(mut map) => plan_size(log_id, target, replication_factor, &mut map),
            Err(err) => {
                set_last_error(err.kind());
                0
            }
        }
    }
}

/// Record a failed decision: write the thread-local sentinel, bump the
/// outcome counter, and wrap the error.
pub(crate) fn fail(selector: &'static str, err: SelectionError) -> Decision {
    set_last_error(err.kind());
    let decision = Decision::Failed(err);
    record_outcome(selector, &decision);
    decision
}

pub(crate) fn record_outcome(selector: &'static str, decision: &Decision) {
    let outcome = match decision {
        Decision::Keep => "keep",
        Decision::NeedsChange(_) => "needs_change",
        Decision::Failed(_) => "failed",
    };
    counter!("logshed_nodeset_selections_total", "selector" => selector, "outcome" => outcome)
        .increment(1);
}
