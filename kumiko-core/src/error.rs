//! Error types for the kumiko core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by the sampling structures while a round is running.
///
/// `Exhausted` signals an accounting defect: under the draw contract every
/// round performs exactly as many draws as the total mass supports, so an
/// exhausted sampler must never be asked for another endpoint.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SamplerError {
    /// A sampler was constructed with a zero weight.
    #[error("weight at position {index} must be positive")]
    ZeroWeight {
        /// Position of the offending weight in the strength table.
        index: usize,
    },
    /// The aggregate weight does not fit in the accumulator.
    #[error("aggregate weight exceeds the representable total mass")]
    MassOverflow,
    /// A draw was requested after every unit of mass had been consumed.
    #[error("draw requested but no mass remains")]
    Exhausted,
}

define_error_codes! {
    /// Stable codes describing [`SamplerError`] variants.
    enum SamplerErrorCode for SamplerError {
        /// A sampler was constructed with a zero weight.
        ZeroWeight => ZeroWeight { .. } => "SAMPLER_ZERO_WEIGHT",
        /// The aggregate weight does not fit in the accumulator.
        MassOverflow => MassOverflow => "SAMPLER_MASS_OVERFLOW",
        /// A draw was requested after every unit of mass had been consumed.
        Exhausted => Exhausted => "SAMPLER_EXHAUSTED",
    }
}

/// Error type produced when configuring or running [`crate::Rewirer`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RewireError {
    /// The input edge table contained no rows.
    #[error("edge table contains no rows")]
    EmptyEdgeTable,
    /// An input edge carried a zero weight.
    #[error("edge ({source}, {target}) has zero weight; weights must be positive counts")]
    ZeroWeight {
        /// Source endpoint of the offending edge.
        source: Arc<str>,
        /// Target endpoint of the offending edge.
        target: Arc<str>,
    },
    /// A node's total strength overflowed the accumulator.
    #[error("total weight at node `{node}` exceeds the representable strength")]
    WeightOverflow {
        /// Node whose strength overflowed.
        node: Arc<str>,
    },
    /// The number of rounds must be greater than zero.
    #[error("rounds must be at least 1 (got {got})")]
    InvalidRounds {
        /// The invalid round count supplied by the caller.
        got: usize,
    },
    /// The random batch size must be greater than zero.
    #[error("batch_size must be at least 1 (got {got})")]
    InvalidBatchSize {
        /// The invalid batch size supplied by the caller.
        got: usize,
    },
    /// A sampler failed while a round was running.
    #[error("sampling failed: {source}")]
    Sampler {
        /// Underlying sampler error bubbled up by the round.
        #[from]
        source: SamplerError,
    },
}

define_error_codes! {
    /// Stable codes describing [`RewireError`] variants.
    enum RewireErrorCode for RewireError {
        /// The input edge table contained no rows.
        EmptyEdgeTable => EmptyEdgeTable => "KUMIKO_EMPTY_EDGE_TABLE",
        /// An input edge carried a zero weight.
        ZeroWeight => ZeroWeight { .. } => "KUMIKO_ZERO_WEIGHT",
        /// A node's total strength overflowed the accumulator.
        WeightOverflow => WeightOverflow { .. } => "KUMIKO_WEIGHT_OVERFLOW",
        /// The number of rounds must be greater than zero.
        InvalidRounds => InvalidRounds { .. } => "KUMIKO_INVALID_ROUNDS",
        /// The random batch size must be greater than zero.
        InvalidBatchSize => InvalidBatchSize { .. } => "KUMIKO_INVALID_BATCH_SIZE",
        /// A sampler failed while a round was running.
        SamplerFailure => Sampler { .. } => "KUMIKO_SAMPLER_FAILURE",
    }
}

impl RewireError {
    /// Retrieve the inner [`SamplerErrorCode`] when the error originated in a sampler.
    pub const fn sampler_code(&self) -> Option<SamplerErrorCode> {
        match self {
            Self::Sampler { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RewireError>;
