//! Rewiring orchestration: strength computation, round scheduling, output
//! assembly.
//!
//! A [`Rewirer`] holds validated configuration. [`Rewirer::prepare`] checks
//! the input table and aggregates both partitions' strengths exactly once,
//! returning a [`Simulation`]; each simulation round then rebuilds a fresh
//! sampler from those immutable strengths, so no depleted state ever leaks
//! between rounds.

use std::{collections::BTreeMap, num::NonZeroUsize, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    Result,
    edge::{Edge, RoundTable},
    permuter::PermutedSequence,
    rng::{BatchedUniform, mix_round_seed},
    sampler::{EndpointSampler, SamplerStrategy},
    strength::{Strengths, aggregate_strengths},
    tree::WeightedSampleTree,
};

/// Entry point for running strength-preserving rewiring simulations.
///
/// # Examples
/// ```
/// use kumiko_core::{Edge, RewirerBuilder};
///
/// let edges = vec![
///     Edge::new("a", "x", 2),
///     Edge::new("a", "y", 1),
///     Edge::new("b", "x", 1),
///     Edge::new("b", "z", 2),
/// ];
/// let rewirer = RewirerBuilder::new()
///     .with_rounds(3)
///     .with_seed(7)
///     .build()
///     .expect("builder must succeed");
/// let simulation = rewirer.prepare(&edges).expect("input is valid");
/// for round in simulation.rounds() {
///     let table = round.expect("round must succeed");
///     assert_eq!(table.total_weight(), 6);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Rewirer {
    rounds: NonZeroUsize,
    strategy: SamplerStrategy,
    seed: u64,
    batch_size: NonZeroUsize,
}

impl Rewirer {
    pub(crate) fn new(
        rounds: NonZeroUsize,
        strategy: SamplerStrategy,
        seed: u64,
        batch_size: NonZeroUsize,
    ) -> Self {
        Self {
            rounds,
            strategy,
            seed,
            batch_size,
        }
    }

    /// Returns the number of rounds this rewirer will simulate.
    #[must_use]
    pub fn rounds(&self) -> NonZeroUsize {
        self.rounds
    }

    /// Returns the sampling strategy used by every round.
    #[must_use]
    pub fn strategy(&self) -> SamplerStrategy {
        self.strategy
    }

    /// Returns the base seed; per-round seeds are derived from it.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the batch size of the per-round uniform stream.
    #[must_use]
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Validates `edges` and aggregates both partitions' strengths.
    ///
    /// This is the only pass over the input table; the returned
    /// [`Simulation`] is immutable and may be shared across workers.
    ///
    /// # Errors
    /// Returns [`crate::RewireError::EmptyEdgeTable`],
    /// [`crate::RewireError::ZeroWeight`] or
    /// [`crate::RewireError::WeightOverflow`] when the table is not a valid
    /// weighted bipartite edge list.
    #[instrument(name = "rewirer.prepare", err, skip_all, fields(edges = edges.len()))]
    pub fn prepare(&self, edges: &[Edge]) -> Result<Simulation> {
        let (sources, targets) = aggregate_strengths(edges)?;
        debug!(
            source_nodes = sources.len(),
            target_nodes = targets.len(),
            total_mass = sources.total_mass(),
            "strengths aggregated"
        );
        Ok(Simulation {
            sources,
            targets,
            rounds: self.rounds,
            strategy: self.strategy,
            seed: self.seed,
            batch_size: self.batch_size,
        })
    }
}

/// A prepared simulation: immutable strengths plus round scheduling.
///
/// Rounds are pure functions of `(strengths, base seed, round index)`:
/// [`Simulation::round`] takes `&self` and owns every piece of mutable
/// sampler state for the duration of the call, so independent rounds may be
/// executed concurrently against one shared `Simulation`.
#[derive(Debug, Clone)]
pub struct Simulation {
    sources: Strengths,
    targets: Strengths,
    rounds: NonZeroUsize,
    strategy: SamplerStrategy,
    seed: u64,
    batch_size: NonZeroUsize,
}

impl Simulation {
    /// Returns the number of rounds this simulation will produce.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.rounds.get()
    }

    /// Returns the total mass M redistributed by every round.
    #[must_use]
    pub fn total_mass(&self) -> u64 {
        self.sources.total_mass()
    }

    /// Returns the source partition's strength table.
    #[must_use]
    pub fn source_strengths(&self) -> &Strengths {
        &self.sources
    }

    /// Returns the target partition's strength table.
    #[must_use]
    pub fn target_strengths(&self) -> &Strengths {
        &self.targets
    }

    /// Simulates round `index`, rebuilding a fresh sampler from the original
    /// strengths.
    ///
    /// The round walks source nodes in their stable order, draws
    /// `strength(p1)` endpoints for each and aggregates the drawn pairs into
    /// a [`RoundTable`]. Identical `(input, base seed, index)` triples yield
    /// identical tables.
    ///
    /// # Errors
    /// Returns [`crate::RewireError::Sampler`] when a sampler fails
    /// mid-round; under the draw contract this signals an accounting defect,
    /// never an expected condition.
    #[instrument(name = "rewirer.round", err, skip(self))]
    pub fn round(&self, index: usize) -> Result<RoundTable> {
        let seed = mix_round_seed(self.seed, index);
        let mut rng = BatchedUniform::new(seed, self.batch_size);
        match self.strategy {
            SamplerStrategy::Tree => {
                let mut sampler = WeightedSampleTree::new(self.targets.weights())?;
                self.run_round(index, seed, &mut sampler, &mut rng)
            }
            SamplerStrategy::Permutation => {
                let mut sampler = PermutedSequence::new(self.targets.weights(), &mut rng)?;
                self.run_round(index, seed, &mut sampler, &mut rng)
            }
        }
    }

    /// Iterates every round of the simulation in order.
    pub fn rounds(&self) -> impl Iterator<Item = Result<RoundTable>> + '_ {
        (0..self.round_count()).map(|index| self.round(index))
    }

    fn run_round(
        &self,
        index: usize,
        seed: u64,
        sampler: &mut impl EndpointSampler,
        rng: &mut BatchedUniform,
    ) -> Result<RoundTable> {
        let mut counts: BTreeMap<(usize, usize), u64> = BTreeMap::new();
        for (source_position, strength) in self.sources.weights().iter().enumerate() {
            for _ in 0..*strength {
                let target_position = sampler.next_endpoint(rng)?;
                *counts.entry((source_position, target_position)).or_insert(0) += 1;
            }
        }
        debug_assert_eq!(sampler.remaining(), 0, "round must exhaust the sampler");

        let edges = counts
            .into_iter()
            .map(|((source_position, target_position), weight)| Edge {
                source: Arc::clone(self.sources.id(source_position)),
                target: Arc::clone(self.targets.id(target_position)),
                weight,
            })
            .collect();
        debug!(index, seed, "round complete");
        Ok(RoundTable::new(index, seed, edges))
    }
}
