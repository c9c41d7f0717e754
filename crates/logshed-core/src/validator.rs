//! Weight-aware storage set validation.

use std::collections::HashSet;

use crate::config::ClusterConfig;
use crate::location::LocationScope;
use crate::node::NodeIndex;
use crate::replication::ReplicationProperty;

/// Whether `storage_set` can hold replicas under `replication`.
///
/// Selection treats nodes as equally weighted, so a set drawn from a tier
/// with many zero-weight nodes may be unable to take writes at all. This
/// predicate checks the outcome: for every `(scope, factor)` pair, the
/// writable (positive-weight) members of the set must span at least `factor`
/// distinct domains at `scope`. A writable member that is missing from the
/// configuration or whose location omits `scope` fails the predicate.
#[must_use]
pub fn valid_storage_set(
    config: &ClusterConfig,
    storage_set: &[NodeIndex],
    replication: &ReplicationProperty,
) -> bool {
    for &(scope, factor) in replication.pairs() {
        let mut writable = 0usize;
        let mut domains: HashSet<String> = HashSet::new();
        for &index in storage_set {
            let Some(node) = config.node(index) else {
                return false;
            };
            if !node.is_writable() {
                continue;
            }
            writable += 1;
            if scope == LocationScope::Node {
                continue;
            }
            let Some(location) = &node.location else {
                return false;
            };
            if !location.scope_specified(scope) {
                return false;
            }
            domains.insert(location.domain(scope));
        }
        let distinct = if scope == LocationScope::Node { writable } else { domains.len() };
        if distinct < factor {
            return false;
        }
    }
    true
}
