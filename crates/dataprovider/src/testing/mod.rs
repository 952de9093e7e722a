//! Testing utilities for dataprovider.
//!
//! Synthetic volumes with predictable contents, shared by unit tests,
//! integration tests and benchmarks.

mod volumes;

pub use volumes::{arange_tensor, arange_volume, random_volume, sparse_mask};
