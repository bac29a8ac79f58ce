//! Builder utilities for configuring the rewiring engine.
//!
//! Exposes the sampling-strategy selection surface and builder validation
//! used before constructing [`Rewirer`] instances.

use std::num::NonZeroUsize;

use crate::{Result, error::RewireError, rewirer::Rewirer, sampler::SamplerStrategy};

/// Batch size of the per-round uniform stream when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Base seed used when none is configured, kept fixed so runs are
/// reproducible by default.
pub const DEFAULT_SEED: u64 = 0x5EED_D1CE;

/// Configures and constructs [`Rewirer`] instances.
///
/// # Examples
/// ```
/// use kumiko_core::{RewirerBuilder, SamplerStrategy};
///
/// let rewirer = RewirerBuilder::new()
///     .with_rounds(10)
///     .with_strategy(SamplerStrategy::Tree)
///     .with_seed(42)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(rewirer.rounds().get(), 10);
/// assert_eq!(rewirer.strategy(), SamplerStrategy::Tree);
/// ```
#[derive(Debug, Clone)]
pub struct RewirerBuilder {
    rounds: usize,
    strategy: SamplerStrategy,
    seed: u64,
    batch_size: usize,
}

impl Default for RewirerBuilder {
    fn default() -> Self {
        Self {
            rounds: 1,
            strategy: SamplerStrategy::default(),
            seed: DEFAULT_SEED,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RewirerBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use kumiko_core::{RewirerBuilder, SamplerStrategy};
    ///
    /// let builder = RewirerBuilder::new();
    /// assert_eq!(builder.rounds(), 1);
    /// assert_eq!(builder.strategy(), SamplerStrategy::Permutation);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of independent simulation rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Returns the configured round count.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Selects the sampling strategy used by every round.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SamplerStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured sampling strategy.
    #[must_use]
    pub fn strategy(&self) -> SamplerStrategy {
        self.strategy
    }

    /// Seeds the engine; per-round seeds are derived from this value.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Overrides the batch size of the per-round uniform stream.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Returns the configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Validates the configuration and constructs a [`Rewirer`].
    ///
    /// # Errors
    /// Returns [`RewireError::InvalidRounds`] when the round count is zero
    /// and [`RewireError::InvalidBatchSize`] when the batch size is zero.
    ///
    /// # Examples
    /// ```
    /// use kumiko_core::{RewireError, RewirerBuilder};
    ///
    /// let err = RewirerBuilder::new().with_rounds(0).build();
    /// assert!(matches!(err, Err(RewireError::InvalidRounds { got: 0 })));
    /// ```
    pub fn build(self) -> Result<Rewirer> {
        let rounds = NonZeroUsize::new(self.rounds)
            .ok_or(RewireError::InvalidRounds { got: self.rounds })?;
        let batch_size = NonZeroUsize::new(self.batch_size).ok_or(
            RewireError::InvalidBatchSize {
                got: self.batch_size,
            },
        )?;

        Ok(Rewirer::new(rounds, self.strategy, self.seed, batch_size))
    }
}
