//! Dataset construction and sampling errors.

use rand::distributions::WeightedError;

use crate::geometry::{Box3, Vec3};
use crate::tensor::TensorError;

/// Errors from adding data to a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("location source already set from channel '{existing}'")]
    LocationSourceAlreadySet { existing: String },
}

/// Why no full patch could be produced.
///
/// These are the retryable failures: another location (or another dataset)
/// may succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutOfRange {
    #[error("patch for channel '{channel}' centered on {pos} exceeds the channel's bounds")]
    Patch { channel: String, pos: Vec3 },

    #[error("valid range {range} is empty")]
    EmptyValidRange { range: Box3 },

    #[error("no masked voxel lies within the valid range {range}")]
    NoMaskedLocation { range: Box3 },
}

/// Errors from sampling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("no sample spec given and no default spec set")]
    NoSpec,

    #[error("sample spec references unknown channel '{channel}'")]
    UnknownChannel { channel: String },

    #[error("sample spec has no channels")]
    EmptySpec,

    #[error("out of range: {0}")]
    OutOfRange(#[from] OutOfRange),

    #[error("superset has no datasets")]
    NoDatasets,

    #[error("expected {expected} sampling weights, got {got}")]
    WeightCountMismatch { expected: usize, got: usize },

    #[error("invalid sampling weights: {0}")]
    InvalidWeights(#[from] WeightedError),
}

impl SampleError {
    /// `true` for failures that a fresh random draw may avoid.
    ///
    /// Everything else is a configuration error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SampleError::OutOfRange(_))
    }
}
