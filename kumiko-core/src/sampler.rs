//! The strategy seam between the rewirer and the sampling structures.

use crate::{
    error::SamplerError, permuter::PermutedSequence, rng::BatchedUniform,
    tree::WeightedSampleTree,
};

/// Selects how a round redistributes edge endpoints.
///
/// Both strategies draw the identical endpoint multiset — the target
/// partition's strength distribution — and differ only in cost profile:
/// `Tree` keeps O(N) state and pays O(log N) per draw, `Permutation`
/// materializes the O(M) sequence once and pays a single O(M) shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerStrategy {
    /// Weighted draw-without-replacement over a binary-indexed tree.
    Tree,
    /// Full shuffle of the materialized endpoint sequence.
    #[default]
    Permutation,
}

/// One round's supply of rewired endpoints.
///
/// A sampler is built fresh per round from the immutable strength table,
/// driven to exhaustion during that round, and discarded. Each successful
/// call hands out exactly one unit of the target partition's mass.
pub trait EndpointSampler {
    /// Draws the next endpoint as a position in the target partition.
    ///
    /// # Errors
    /// Returns [`SamplerError::Exhausted`] when all mass has been consumed.
    fn next_endpoint(&mut self, rng: &mut BatchedUniform) -> Result<usize, SamplerError>;

    /// Returns how much mass is left to hand out.
    fn remaining(&self) -> u64;
}

impl EndpointSampler for WeightedSampleTree {
    fn next_endpoint(&mut self, rng: &mut BatchedUniform) -> Result<usize, SamplerError> {
        self.draw(rng)
    }

    fn remaining(&self) -> u64 {
        self.total()
    }
}

impl EndpointSampler for PermutedSequence {
    fn next_endpoint(&mut self, _rng: &mut BatchedUniform) -> Result<usize, SamplerError> {
        self.take_next()
    }

    fn remaining(&self) -> u64 {
        PermutedSequence::remaining(self)
    }
}
