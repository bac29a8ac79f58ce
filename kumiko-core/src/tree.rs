//! Weighted draw-without-replacement over a complete binary tree.

use crate::{error::SamplerError, rng::BatchedUniform};

#[inline]
const fn left_index(i: usize) -> usize {
    2 * i + 1
}

#[inline]
const fn right_index(i: usize) -> usize {
    2 * i + 2
}

/// One tree slot: the item's own remaining weight plus the exact remaining
/// totals of its left and right subtrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SlotTotals {
    own: u64,
    left: u64,
    right: u64,
}

impl SlotTotals {
    #[inline]
    const fn subtotal(self) -> u64 {
        self.own + self.left + self.right
    }
}

/// A binary-indexed tree over one partition's nodes supporting weighted
/// sampling without replacement.
///
/// Items live at heap positions (`left(i) = 2i + 1`, `right(i) = 2i + 2`);
/// each slot carries its own remaining weight and its subtrees' remaining
/// totals, maintained exactly after every draw. A draw walks from the root,
/// consuming one uniform per visited slot, and decrements the taken counter
/// along the path, so total mass shrinks by exactly 1 per draw.
///
/// Memory is O(N) in the number of nodes and each draw costs O(log N); the
/// alternative [`crate::PermutedSequence`] trades O(M) memory in the total
/// mass for a single O(M) shuffle per round.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use kumiko_core::{BatchedUniform, WeightedSampleTree};
///
/// let mut tree = WeightedSampleTree::new(&[2, 1, 3])?;
/// let mut rng = BatchedUniform::new(11, NonZeroUsize::new(32).expect("non-zero"));
/// assert_eq!(tree.total(), 6);
/// let drawn = tree.draw(&mut rng)?;
/// assert!(drawn < 3);
/// assert_eq!(tree.total(), 5);
/// # Ok::<(), kumiko_core::SamplerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WeightedSampleTree {
    slots: Vec<SlotTotals>,
}

impl WeightedSampleTree {
    /// Builds the tree bottom-up from one partition's weights.
    ///
    /// # Errors
    /// Returns [`SamplerError::ZeroWeight`] when any weight is zero and
    /// [`SamplerError::MassOverflow`] when the weights do not sum into a
    /// `u64`.
    pub fn new(weights: &[u64]) -> Result<Self, SamplerError> {
        let n = weights.len();
        let mut slots = vec![SlotTotals::default(); n];
        let mut subtotals = vec![0u64; n];
        for i in (0..n).rev() {
            let own = weights[i];
            if own == 0 {
                return Err(SamplerError::ZeroWeight { index: i });
            }
            let left = subtotals.get(left_index(i)).copied().unwrap_or(0);
            let right = subtotals.get(right_index(i)).copied().unwrap_or(0);
            let subtotal = own
                .checked_add(left)
                .and_then(|sum| sum.checked_add(right))
                .ok_or(SamplerError::MassOverflow)?;
            slots[i] = SlotTotals { own, left, right };
            subtotals[i] = subtotal;
        }
        Ok(Self { slots })
    }

    /// Returns the number of items in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the tree holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the remaining total mass at the root.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.slots.first().map_or(0, |slot| slot.subtotal())
    }

    /// Draws one item with probability proportional to its remaining weight,
    /// reducing that weight and the total mass by exactly 1.
    ///
    /// The walk draws a fresh uniform at each visited slot and maps it onto
    /// `[0, subtotal)`; the item's own bucket is the half-open interval
    /// `[0, own)`, then the left subtree, then the right. Every counter on
    /// the walked path is decremented, keeping subtree totals exact.
    ///
    /// # Errors
    /// Returns [`SamplerError::Exhausted`] when no mass remains.
    pub fn draw(&mut self, rng: &mut BatchedUniform) -> Result<usize, SamplerError> {
        if self.total() == 0 {
            return Err(SamplerError::Exhausted);
        }
        let mut i = 0;
        loop {
            let subtotal = self.slots[i].subtotal();
            let r = rng.next_below(subtotal);
            let slot = &mut self.slots[i];
            if r < slot.own {
                slot.own -= 1;
                return Ok(i);
            } else if r < slot.own + slot.left {
                // r < own + left with r >= own implies the left subtree still
                // holds mass, so the child slot exists.
                slot.left -= 1;
                i = left_index(i);
            } else {
                slot.right -= 1;
                i = right_index(i);
            }
        }
    }
}
