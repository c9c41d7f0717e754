//! Storage set size planning.
//!
//! The planner reconciles the operator's size target with the shape of the
//! domain map. The chosen size must be a multiple of the number of domains
//! (each domain contributes an equal share), at least the replication
//! factor, at most the eligible cluster size, and achievable by the smallest
//! domain. When a tiny domain caps the result, the planner tentatively
//! prunes every domain of that size and re-plans on the rest, keeping
//! whichever plan yields the larger set — with hysteresis, so a domain is
//! only sacrificed when the gain exceeds one extra node per remaining
//! domain.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use logshed_core::LogId;

use crate::domain_map::DomainMap;

const ADVISORY_WINDOW: Duration = Duration::from_secs(10);
const ADVISORY_BURST: u32 = 10;

struct AdvisoryWindow {
    started: Instant,
    emitted: u32,
}

static ADVISORY_STATE: Mutex<Option<AdvisoryWindow>> = Mutex::new(None);

/// Whether a size-override advisory may be logged right now. At most
/// [`ADVISORY_BURST`] advisories are emitted per [`ADVISORY_WINDOW`].
fn advisory_allowed() -> bool {
    let mut state = ADVISORY_STATE.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let now = Instant::now();
    match state.as_mut() {
        Some(window) if now.duration_since(window.started) < ADVISORY_WINDOW => {
            if window.emitted < ADVISORY_BURST {
                window.emitted += 1;
                true
            } else {
                false
            }
        }
        _ => {
            *state = Some(AdvisoryWindow { started: now, emitted: 1 });
            true
        }
    }
}

/// Resolve the storage set size for `log_id`, pruning `map` if needed.
///
/// With no `target`, the eligible cluster size stands in for it. A target
/// that already satisfies every constraint is returned verbatim and the map
/// is left untouched. Otherwise the per-domain quota is the caller's implied
/// quota rounded and clamped into `[ceil(r / d), cluster / d]`, further
/// capped by the smallest domain; a cap triggers the prune-and-retry loop.
///
/// Returns the best planned size; `map` is narrowed to the domains of that
/// plan. Returns 0 if `map` is empty on entry (nothing was planned).
pub fn plan_size(
    log_id: LogId,
    target: Option<usize>,
    replication_factor: usize,
    map: &mut DomainMap,
) -> usize {
    let mut best_map = DomainMap::new();
    let mut best_size = 0usize;
    let mut planned = false;

    loop {
        let Some(min_domain_size) = map.min_domain_size() else {
            break;
        };
        let num_domains = map.num_domains();
        let cluster_size = map.cluster_size();
        let mut retry = false;

        let requested = target.unwrap_or(cluster_size);
        let mut nodeset_size = requested;
        if nodeset_size % num_domains != 0
            || nodeset_size < replication_factor
            || nodeset_size > cluster_size
            || nodeset_size > min_domain_size * num_domains
        {
            // at least replication_factor nodes in the result
            let min_per_domain = replication_factor.div_ceil(num_domains);
            // never more than the cluster holds
            let max_per_domain = cluster_size / num_domains;
            // closest achievable quota to what the target implies
            let implied =
                (nodeset_size as f64 / num_domains as f64).round() as usize;
            let mut per_domain = implied.max(min_per_domain).min(max_per_domain);
            if per_domain > min_domain_size {
                // a small domain caps the quota; try pruning it below
                per_domain = min_domain_size;
                retry = true;
            }
            let new_size = per_domain * num_domains;

            let reason = if nodeset_size % num_domains != 0 {
                format!("not divisible by the number of domains ({num_domains})")
            } else if nodeset_size < replication_factor {
                format!("smaller than the replication factor ({replication_factor})")
            } else if nodeset_size > cluster_size {
                format!("larger than the number of eligible nodes ({cluster_size})")
            } else {
                format!("capped by small domains (smallest holds {min_domain_size})")
            };
            if advisory_allowed() {
                warn!(
                    log_id = %log_id,
                    requested = nodeset_size,
                    chosen = new_size,
                    reason = %reason,
                    "overriding requested storage set size"
                );
            }
            nodeset_size = new_size;
        }

        // a pruned plan replaces the best only when it buys more than one
        // extra node per remaining domain
        if !planned || nodeset_size > best_size + num_domains {
            best_size = nodeset_size;
            best_map = map.clone();
            planned = true;
        }

        if !retry {
            break;
        }
        map.retain(|_, nodes| nodes.len() != min_domain_size);
        if map.is_empty() {
            break;
        }
    }

    if planned {
        *map = best_map;
    }
    best_size
}
