//! The sampling capability shared by datasets and supersets.

use rand::RngCore;

use crate::dataset::{Sample, SampleError, SampleSpec};

/// Anything a [`DataSuperset`](crate::DataSuperset) can draw samples from.
///
/// Implemented by [`Dataset`](crate::Dataset) and by `DataSuperset` itself,
/// so supersets nest. A `None` spec means "use the default spec".
pub trait Sampler<A>: Send + Sync {
    /// Check that `spec` (or the default) is usable.
    fn check_spec(&self, spec: Option<&SampleSpec>) -> Result<(), SampleError>;

    /// Draw one random sample.
    fn random_sample(
        &self,
        spec: Option<&SampleSpec>,
        rng: &mut dyn RngCore,
    ) -> Result<Sample<A>, SampleError>;

    /// Size of the geometric sample space, used as a sampling weight.
    fn num_samples(&self, spec: Option<&SampleSpec>) -> Result<u64, SampleError>;
}
