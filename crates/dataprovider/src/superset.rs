//! Weighted collections of datasets.
//!
//! A [`DataSuperset`] draws a member by weight and lets it produce the
//! sample. By default each member is weighted by its geometric sample count
//! ([`Sampler::num_samples`] under its own default spec), so larger volumes
//! are visited proportionally more often.
//!
//! # Weights
//!
//! Weights are computed on first use and kept until
//! [`DataSuperset::set_sampling_weights`] or
//! [`DataSuperset::reset_sampling_weights`] replaces them. Adding a member
//! also resets them. To share a superset across threads without racing on
//! the first computation, call `set_sampling_weights(None)` up front.

use std::fmt;
use std::sync::OnceLock;

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::{Rng, RngCore};

use crate::dataset::{Sample, SampleError, SampleSpec};
use crate::sampler::Sampler;

/// Normalized weights plus the distribution built from them.
#[derive(Debug, Clone)]
struct SamplingWeights {
    probs: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl SamplingWeights {
    fn from_raw(raw: &[f64]) -> Result<Self, SampleError> {
        if raw.iter().any(|w| !w.is_finite()) {
            return Err(WeightedError::InvalidWeight.into());
        }
        let index = WeightedIndex::new(raw)?;
        let total: f64 = raw.iter().sum();
        Ok(Self {
            probs: raw.iter().map(|w| w / total).collect(),
            index,
        })
    }
}

/// Weighted superset of [`Sampler`]s.
///
/// # Example
///
/// ```
/// use dataprovider::{DataSuperset, Dataset};
/// use dataprovider::dataset::SampleSpec;
/// use dataprovider::geometry::Vec3;
/// use ndarray::Array3;
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let spec = SampleSpec::new().with("input", (1, 8, 8)).unwrap();
///
/// let mut superset = DataSuperset::with_tag("train");
/// for depth in [4, 12] {
///     let mut ds = Dataset::new().with_spec(spec.clone());
///     ds.add_data("input", Array3::<f32>::zeros((depth, 16, 16)), Vec3::ZERO).unwrap();
///     superset.add_dataset(ds);
/// }
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
/// let sample = superset.random_sample(None, &mut rng).unwrap();
/// assert_eq!(sample["input"].shape(), &[1, 1, 8, 8]);
/// assert_eq!(superset.sampling_weights(), Some(&[0.25, 0.75][..]));
/// ```
pub struct DataSuperset<A = f32> {
    tag: String,
    datasets: Vec<Box<dyn Sampler<A>>>,
    weights: OnceLock<SamplingWeights>,
}

impl<A> Default for DataSuperset<A> {
    fn default() -> Self {
        Self::with_tag("")
    }
}

impl<A> DataSuperset<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            datasets: Vec::new(),
            weights: OnceLock::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Append a member. Clears the current weights.
    pub fn add_dataset(&mut self, dataset: impl Sampler<A> + 'static) {
        self.datasets.push(Box::new(dataset));
        self.weights = OnceLock::new();
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn dataset(&self, index: usize) -> Option<&dyn Sampler<A>> {
        self.datasets.get(index).map(|d| d.as_ref())
    }

    // =========================================================================
    // Weights
    // =========================================================================

    /// Set the per-member sampling weights.
    ///
    /// With `None`, each member is weighted by its sample count under its own
    /// default spec. Weights are normalized to sum to one.
    pub fn set_sampling_weights(&mut self, weights: Option<&[f64]>) -> Result<(), SampleError> {
        let computed = match weights {
            Some(w) => {
                if w.len() != self.datasets.len() {
                    return Err(SampleError::WeightCountMismatch {
                        expected: self.datasets.len(),
                        got: w.len(),
                    });
                }
                SamplingWeights::from_raw(w)?
            }
            None => self.default_weights()?,
        };
        self.weights = OnceLock::from(computed);
        Ok(())
    }

    /// Forget the current weights; the next draw recomputes the defaults.
    pub fn reset_sampling_weights(&mut self) {
        self.weights = OnceLock::new();
    }

    /// Normalized weights, if computed.
    pub fn sampling_weights(&self) -> Option<&[f64]> {
        self.weights.get().map(|w| w.probs.as_slice())
    }

    fn default_weights(&self) -> Result<SamplingWeights, SampleError> {
        let raw = self
            .datasets
            .iter()
            .map(|d| d.num_samples(None).map(|n| n as f64))
            .collect::<Result<Vec<_>, _>>()?;
        let weights = SamplingWeights::from_raw(&raw)?;
        tracing::debug!(
            tag = %self.tag,
            weights = ?weights.probs,
            "computed default sampling weights"
        );
        Ok(weights)
    }

    fn weights(&self) -> Result<&SamplingWeights, SampleError> {
        if let Some(w) = self.weights.get() {
            return Ok(w);
        }
        let computed = self.default_weights()?;
        Ok(self.weights.get_or_init(|| computed))
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Draw a member index by weight.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SampleError> {
        if self.datasets.is_empty() {
            return Err(SampleError::NoDatasets);
        }
        Ok(self.weights()?.index.sample(rng))
    }

    /// Draw a member by weight.
    pub fn random_dataset<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&dyn Sampler<A>, SampleError> {
        let index = self.random_index(rng)?;
        Ok(self.datasets[index].as_ref())
    }

    /// Draw a member by weight and sample from it.
    ///
    /// `spec` is passed through unchanged, so its channels must exist in
    /// whichever member is drawn.
    pub fn random_sample<R: Rng + ?Sized>(
        &self,
        spec: Option<&SampleSpec>,
        mut rng: &mut R,
    ) -> Result<Sample<A>, SampleError> {
        let member = self.random_dataset(&mut *rng)?;
        member.random_sample(spec, &mut rng)
    }
}

impl<A> Sampler<A> for DataSuperset<A> {
    /// Every member must accept `spec`.
    fn check_spec(&self, spec: Option<&SampleSpec>) -> Result<(), SampleError> {
        self.datasets.iter().try_for_each(|d| d.check_spec(spec))
    }

    fn random_sample(
        &self,
        spec: Option<&SampleSpec>,
        rng: &mut dyn RngCore,
    ) -> Result<Sample<A>, SampleError> {
        DataSuperset::random_sample(self, spec, rng)
    }

    /// Sum over members.
    fn num_samples(&self, spec: Option<&SampleSpec>) -> Result<u64, SampleError> {
        self.datasets.iter().map(|d| d.num_samples(spec)).sum()
    }
}

impl<A> fmt::Debug for DataSuperset<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSuperset")
            .field("tag", &self.tag)
            .field("n_datasets", &self.datasets.len())
            .field("weights", &self.sampling_weights())
            .finish()
    }
}

impl<A> fmt::Display for DataSuperset<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataSuperset({})", self.tag)
    }
}
