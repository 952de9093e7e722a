//! Volumetric datasets and sample specs.
//!
//! A [`Dataset`] holds named channels (image, labels, masks) in a shared
//! global coordinate system. A [`SampleSpec`] says which channels make up a
//! sample and at what patch shape; sampling returns a [`Sample`] with one
//! patch per channel, sorted by channel name.
//!
//! # Errors
//!
//! Sampling failures are a [`SampleError`]. Only
//! [`SampleError::OutOfRange`] is retryable (see
//! [`SampleError::is_retryable`]); the rest point at a misconfigured spec
//! or dataset.

mod error;
mod locations;
mod sample;
mod spec;
mod volumetric;

pub use error::{DatasetError, OutOfRange, SampleError};
pub use locations::SparseLocations;
pub use sample::Sample;
pub use spec::{SampleSpec, SpecError};
pub use volumetric::Dataset;
