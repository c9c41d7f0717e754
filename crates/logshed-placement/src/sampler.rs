//! Uniform sampling within a domain.

use rand::seq::SliceRandom;
use rand::Rng;

use logshed_core::{ClusterConfig, NodeIndex};

use crate::error::SelectionError;

/// Draw `count` distinct nodes from a domain's bucket.
///
/// Nodes are not weighted for the draw itself, but positive-weight nodes are
/// preferred: the draw exhausts the positive-weight pool before touching
/// zero-weight nodes. Within each pool the draw is a uniform k-of-n partial
/// Fisher–Yates shuffle, fully determined by `rng`.
///
/// # Errors
///
/// Returns [`SelectionError::NotEnoughInDomain`] when the combined pools
/// hold fewer than `count` nodes.
pub fn sample_from_domain<R: Rng>(
    rng: &mut R,
    config: &ClusterConfig,
    domain: &str,
    nodes: &[NodeIndex],
    count: usize,
) -> Result<Vec<NodeIndex>, SelectionError> {
    let mut preferred: Vec<NodeIndex> = Vec::new();
    let mut fallback: Vec<NodeIndex> = Vec::new();
    for &index in nodes {
        match config.node(index) {
            Some(node) if node.is_writable() => preferred.push(index),
            Some(_) => fallback.push(index),
            None => {}
        }
    }

    if preferred.len() + fallback.len() < count {
        return Err(SelectionError::NotEnoughInDomain {
            domain: domain.to_string(),
            needed: count,
            available: preferred.len() + fallback.len(),
        });
    }

    let from_preferred = count.min(preferred.len());
    let mut picked = draw(rng, &mut preferred, from_preferred);
    if picked.len() < count {
        picked.extend(draw(rng, &mut fallback, count - picked.len()));
    }
    Ok(picked)
}

fn draw<R: Rng>(rng: &mut R, pool: &mut [NodeIndex], count: usize) -> Vec<NodeIndex> {
    let (chosen, _) = pool.partial_shuffle(rng, count);
    chosen.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use logshed_core::NodeDescriptor;

    fn config_with_weights(weights: &[f64]) -> ClusterConfig {
        let mut config = ClusterConfig::new();
        for (index, &weight) in weights.iter().enumerate() {
            config.insert_node(
                index as NodeIndex,
                NodeDescriptor::new(format!("10.0.0.{index}:4440")).with_weight(weight),
            );
        }
        config
    }

    #[test]
    fn test_sample_is_deterministic_by_seed() {
        let config = config_with_weights(&[1.0; 10]);
        let nodes: Vec<NodeIndex> = (0..10).collect();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = sample_from_domain(&mut rng_a, &config, "d", &nodes, 4).unwrap();
        let b = sample_from_domain(&mut rng_b, &config, "d", &nodes, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_is_distinct() {
        let config = config_with_weights(&[1.0; 8]);
        let nodes: Vec<NodeIndex> = (0..8).collect();

        let mut rng = StdRng::seed_from_u64(3);
        let mut picked = sample_from_domain(&mut rng, &config, "d", &nodes, 8).unwrap();
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 8);
    }

    #[test]
    fn test_preferred_pool_drained_first() {
        // nodes 0..3 writable, 3..6 zero weight; a draw of 3 must stay in
        // the writable pool
        let config = config_with_weights(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        let nodes: Vec<NodeIndex> = (0..6).collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample_from_domain(&mut rng, &config, "d", &nodes, 3).unwrap();
            assert!(picked.iter().all(|&index| index < 3), "seed {seed}: {picked:?}");
        }
    }

    #[test]
    fn test_falls_back_to_zero_weight_nodes() {
        let config = config_with_weights(&[1.0, 0.0, 0.0]);
        let nodes: Vec<NodeIndex> = (0..3).collect();

        let mut rng = StdRng::seed_from_u64(1);
        let mut picked = sample_from_domain(&mut rng, &config, "d", &nodes, 3).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_not_enough_nodes() {
        let config = config_with_weights(&[1.0, 0.0]);
        let nodes: Vec<NodeIndex> = (0..2).collect();

        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_from_domain(&mut rng, &config, "rg0.rk1", &nodes, 3).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NotEnoughInDomain {
                domain: "rg0.rk1".to_string(),
                needed: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn test_every_node_reachable() {
        // over many seeds a 1-of-4 draw should hit every preferred node
        let config = config_with_weights(&[1.0; 4]);
        let nodes: Vec<NodeIndex> = (0..4).collect();

        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample_from_domain(&mut rng, &config, "d", &nodes, 1).unwrap();
            seen.insert(picked[0]);
        }
        assert_eq!(seen.len(), 4);
    }
}
