//! Shared helpers for kumiko benchmarks.

use kumiko_core::Edge;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Configuration for synthetic bipartite edge tables.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticConfig {
    /// Number of distinct source-partition nodes.
    pub source_nodes: usize,
    /// Number of distinct target-partition nodes.
    pub target_nodes: usize,
    /// Number of edge rows to draw.
    pub rows: usize,
    /// Upper bound (inclusive) on per-row weights.
    pub max_weight: u64,
    /// Seed for the generator.
    pub seed: u64,
}

/// Generates a random weighted bipartite edge table.
///
/// Rows may repeat endpoint pairs; the engine aggregates them, which mirrors
/// real interaction tables.
#[must_use]
pub fn generate_edges(config: &SyntheticConfig) -> Vec<Edge> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    (0..config.rows)
        .map(|_| {
            let source = rng.gen_range(0..config.source_nodes);
            let target = rng.gen_range(0..config.target_nodes);
            let weight = rng.gen_range(1..=config.max_weight);
            Edge::new(format!("s{source}"), format!("t{target}"), weight)
        })
        .collect()
}
