//! Kumiko core library.
//!
//! Generates randomized, strength-preserving replicas of a weighted
//! bipartite edge table. Each simulation round rewires edge endpoints while
//! holding every node's total edge weight fixed, producing the null-model
//! tables a caller compares observed interaction scores against. Two
//! interchangeable sampling strategies are provided: a binary-indexed tree
//! drawing weighted endpoints without replacement, and a full permutation of
//! the materialized endpoint sequence.

mod builder;
mod edge;
mod error;
mod permuter;
mod rewirer;
mod rng;
mod sampler;
mod strength;
mod tree;

pub use crate::{
    builder::{DEFAULT_BATCH_SIZE, DEFAULT_SEED, RewirerBuilder},
    edge::{Edge, RoundTable},
    error::{Result, RewireError, RewireErrorCode, SamplerError, SamplerErrorCode},
    permuter::PermutedSequence,
    rewirer::{Rewirer, Simulation},
    rng::BatchedUniform,
    sampler::{EndpointSampler, SamplerStrategy},
    strength::{Strengths, aggregate_strengths},
    tree::WeightedSampleTree,
};

#[cfg(test)]
mod sampling_properties;
