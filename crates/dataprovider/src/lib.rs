//! dataprovider: patch sampling from large volumetric datasets.
//!
//! Extracts fixed-size sub-volumes ("patches") from 3D/4D arrays at random
//! or given locations, for use as training samples. Every extracted sample
//! lies fully inside every requested channel, and several datasets can be
//! combined into a weighted superset.
//!
//! # Key Types
//!
//! - [`Vec3`] / [`Box3`] - Integer `(z, y, x)` geometry
//! - [`TensorData`] - A 4D array placed in global coordinates
//! - [`Dataset`] - Named channels sampled together under a [`SampleSpec`]
//! - [`DataSuperset`] - Weighted collection of datasets
//! - [`SamplingConfig`] - Seed and rejection-sampling budget
//!
//! # Example
//!
//! ```
//! use dataprovider::{Dataset, SampleSpec, SamplingConfig, Vec3};
//! use ndarray::Array3;
//!
//! let config = SamplingConfig::builder().seed(1).build().unwrap();
//! let mut ds = Dataset::with_config(&config);
//! ds.add_data("input", Array3::<f32>::zeros((16, 64, 64)), Vec3::ZERO).unwrap();
//!
//! let spec = SampleSpec::new().with("input", (8, 32, 32)).unwrap();
//! let mut rng = config.rng();
//! let sample = ds.random_sample(Some(&spec), &mut rng).unwrap();
//! assert_eq!(sample["input"].shape(), &[1, 8, 32, 32]);
//! ```
//!
//! # Loading Volumes
//!
//! With the `io` feature (default), [`io::load`] and [`io::save`] read and
//! write single-array safetensors containers.

pub mod config;
pub mod dataset;
pub mod geometry;
#[cfg(feature = "io")]
pub mod io;
pub mod sampler;
pub mod superset;
pub mod tensor;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, SamplingConfig};
pub use dataset::{Dataset, DatasetError, OutOfRange, Sample, SampleError, SampleSpec, SpecError};
pub use geometry::{Box3, Vec3};
pub use sampler::Sampler;
pub use superset::DataSuperset;
pub use tensor::{TensorData, TensorError};
