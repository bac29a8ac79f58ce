//! Full-sequence permutation sampling.

use crate::{error::SamplerError, rng::BatchedUniform};

/// The materialized, shuffled endpoint sequence for one simulation round.
///
/// Every target node's index is repeated by its strength, giving a sequence
/// of length M (the total mass); one uniform Fisher–Yates shuffle then makes
/// every ordering of that sequence equally likely. Consumers take elements
/// sequentially, so the `strength(p1)` draws made for each source node come
/// from a contiguous, non-overlapping run and the runs partition the sequence
/// exactly.
///
/// This strategy spends O(M) memory on the materialized sequence but only a
/// single O(M) shuffle; [`crate::WeightedSampleTree`] keeps memory at O(N)
/// and pays O(log N) per draw instead. Both are exposed so callers can pick
/// per workload.
#[derive(Debug, Clone)]
pub struct PermutedSequence {
    sequence: Vec<usize>,
    cursor: usize,
}

impl PermutedSequence {
    /// Materializes and shuffles the endpoint sequence for `weights`.
    ///
    /// # Errors
    /// Returns [`SamplerError::MassOverflow`] when the total mass does not
    /// fit in memory addressing.
    pub fn new(weights: &[u64], rng: &mut BatchedUniform) -> Result<Self, SamplerError> {
        let mut mass = 0u64;
        for &weight in weights {
            mass = mass
                .checked_add(weight)
                .ok_or(SamplerError::MassOverflow)?;
        }
        let length = usize::try_from(mass).map_err(|_| SamplerError::MassOverflow)?;

        let mut sequence = Vec::with_capacity(length);
        for (index, &weight) in weights.iter().enumerate() {
            for _ in 0..weight {
                sequence.push(index);
            }
        }

        shuffle(&mut sequence, rng);
        Ok(Self {
            sequence,
            cursor: 0,
        })
    }

    /// Returns the number of endpoints not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        (self.sequence.len() - self.cursor) as u64
    }

    /// Consumes and returns the next endpoint of the shuffled sequence.
    ///
    /// # Errors
    /// Returns [`SamplerError::Exhausted`] when every element has been
    /// consumed.
    pub fn take_next(&mut self) -> Result<usize, SamplerError> {
        let endpoint = self
            .sequence
            .get(self.cursor)
            .copied()
            .ok_or(SamplerError::Exhausted)?;
        self.cursor += 1;
        Ok(endpoint)
    }
}

/// Uniform Fisher–Yates shuffle driven by the batched uniform stream.
fn shuffle(sequence: &mut [usize], rng: &mut BatchedUniform) {
    for i in (1..sequence.len()).rev() {
        let j = rng.next_below(i as u64 + 1) as usize;
        sequence.swap(i, j);
    }
}
