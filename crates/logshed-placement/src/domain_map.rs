//! Domain map construction.
//!
//! A domain map groups the eligible storage nodes of a cluster by their
//! domain key at the sync replication scope. Iteration is ordered by domain
//! key and buckets preserve ascending node index, so the same snapshot
//! always produces the same traversal.

use std::collections::BTreeMap;

use tracing::error;

use logshed_core::{ClusterConfig, LocationScope, NodeIndex};

use crate::error::SelectionError;
use crate::options::SelectorOptions;

/// Mapping from domain key to the eligible node indices inside the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMap {
    domains: BTreeMap<String, Vec<NodeIndex>>,
}

impl DomainMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domains.
    #[must_use]
    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    /// True if the map holds no domains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Total number of nodes across all domains.
    #[must_use]
    pub fn cluster_size(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    /// Size of the smallest domain, or `None` when the map is empty.
    /// Buckets are never empty, so the minimum is at least 1.
    #[must_use]
    pub fn min_domain_size(&self) -> Option<usize> {
        self.domains.values().map(Vec::len).min()
    }

    /// Append a node to a domain's bucket.
    pub fn push(&mut self, domain: impl Into<String>, index: NodeIndex) {
        self.domains.entry(domain.into()).or_default().push(index);
    }

    /// The bucket for a domain key.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&[NodeIndex]> {
        self.domains.get(domain).map(Vec::as_slice)
    }

    /// Iterate `(domain key, bucket)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeIndex])> {
        self.domains.iter().map(|(key, nodes)| (key.as_str(), nodes.as_slice()))
    }

    /// Drop every domain for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &[NodeIndex]) -> bool) {
        self.domains.retain(|key, nodes| keep(key, nodes));
    }
}

/// Group the cluster's eligible storage nodes by domain at `scope`.
///
/// Nodes excluded by `options` or not included in nodesets are skipped
/// silently. A node without a location, or whose location omits `scope`, is
/// a configuration defect that aborts the build; the missing-data checks run
/// before the exclusion checks so a broken node is reported even when the
/// caller excludes it.
///
/// # Errors
///
/// Returns [`SelectionError::MissingLocation`] or
/// [`SelectionError::ScopeNotSpecified`] on the first malformed node.
pub fn build_domain_map(
    config: &ClusterConfig,
    scope: LocationScope,
    options: &SelectorOptions,
) -> Result<DomainMap, SelectionError> {
    debug_assert!(scope > LocationScope::Node && scope < LocationScope::Root);

    let mut map = DomainMap::new();
    for (index, node) in config.nodes() {
        let Some(location) = &node.location else {
            error!(
                index,
                address = %node.address,
                "node has no location information, cross-domain selection cannot continue"
            );
            return Err(SelectionError::MissingLocation { index, address: node.address.clone() });
        };
        if !location.scope_specified(scope) {
            error!(
                index,
                address = %node.address,
                scope = %scope,
                location = %location,
                "node location does not specify the sync replication scope"
            );
            return Err(SelectionError::ScopeNotSpecified {
                index,
                address: node.address.clone(),
                scope,
                location: location.to_string(),
            });
        }
        if options.exclude_nodes.contains(&index) {
            continue;
        }
        if !node.include_in_nodesets {
            continue;
        }
        map.push(location.domain(scope), index);
    }
    Ok(map)
}
