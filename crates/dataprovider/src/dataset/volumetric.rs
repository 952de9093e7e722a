//! Dataset over named volumetric channels.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use ndarray::{Array, Dimension};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::error::{DatasetError, OutOfRange, SampleError};
use super::locations::SparseLocations;
use super::sample::Sample;
use super::spec::SampleSpec;
use crate::config::SamplingConfig;
use crate::geometry::{Box3, Vec3};
use crate::sampler::Sampler;
use crate::tensor::{TensorData, TensorError};

/// A set of co-registered volumes (image, labels, masks, ...) sampled together.
///
/// Each channel is a [`TensorData`] with its own offset and extent. A sample
/// is one patch per channel, all centered on the same global position, and
/// only positions where every requested patch fits are ever drawn.
///
/// # Example
///
/// ```
/// use dataprovider::dataset::{Dataset, SampleSpec};
/// use dataprovider::geometry::Vec3;
/// use ndarray::Array3;
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let mut ds = Dataset::new();
/// ds.add_data("input", Array3::<f32>::zeros((10, 64, 64)), Vec3::ZERO).unwrap();
/// ds.add_data("label", Array3::<f32>::zeros((8, 60, 60)), (1, 2, 2)).unwrap();
///
/// let spec = SampleSpec::new()
///     .with("input", (5, 32, 32)).unwrap()
///     .with("label", (3, 16, 16)).unwrap();
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
/// let sample = ds.random_sample(Some(&spec), &mut rng).unwrap();
/// assert_eq!(sample["input"].shape(), &[1, 5, 32, 32]);
/// assert_eq!(sample["label"].shape(), &[1, 3, 16, 16]);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset<A = f32> {
    channels: BTreeMap<String, TensorData<A>>,
    spec: Option<SampleSpec>,
    locations: Option<LocationSource>,
    max_rejection_draws: usize,
}

#[derive(Debug, Clone)]
struct LocationSource {
    channel: String,
    locations: SparseLocations,
    in_range: InRangeCache,
}

/// Masked centers inside one valid range, filled once rejection sampling
/// has given up on that range.
#[derive(Debug, Default)]
struct InRangeCache(Mutex<Option<(Box3, Arc<[Vec3]>)>>);

impl InRangeCache {
    fn get(&self, range: Box3) -> Option<Arc<[Vec3]>> {
        let cached = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        cached
            .as_ref()
            .filter(|(r, _)| *r == range)
            .map(|(_, inside)| Arc::clone(inside))
    }

    fn insert(&self, range: Box3, inside: Arc<[Vec3]>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some((range, inside));
    }
}

impl Clone for InRangeCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<A> Default for Dataset<A> {
    fn default() -> Self {
        Self::with_config(&SamplingConfig::default())
    }
}

impl<A> Dataset<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &SamplingConfig) -> Self {
        Self {
            channels: BTreeMap::new(),
            spec: None,
            locations: None,
            max_rejection_draws: config.max_rejection_draws,
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Add a `(y,x)`, `(z,y,x)` or `(c,z,y,x)` array under `key`.
    ///
    /// Replaces any channel already stored under `key`.
    pub fn add_data<D: Dimension>(
        &mut self,
        key: impl Into<String>,
        data: Array<A, D>,
        offset: impl Into<Vec3>,
    ) -> Result<(), DatasetError> {
        let tensor = TensorData::from_dyn(data.into_dyn(), offset)?;
        self.add_tensor(key, tensor);
        Ok(())
    }

    /// Add an already wrapped tensor under `key`.
    ///
    /// Replacing the location source channel drops its locations.
    pub fn add_tensor(&mut self, key: impl Into<String>, tensor: TensorData<A>) {
        let key = key.into();
        if self.locations.as_ref().is_some_and(|s| s.channel == key) {
            tracing::debug!(channel = %key, "location source channel replaced");
            self.locations = None;
        }
        self.channels.insert(key, tensor);
    }

    /// Add a mask channel.
    ///
    /// With `use_as_location_source`, the mask's nonzero voxels become the
    /// candidate centers for [`random_location`](Self::random_location). The
    /// mask must then be single-channel, and only one location source may be
    /// set per dataset, though the source channel itself may be replaced.
    pub fn add_mask<D: Dimension>(
        &mut self,
        key: impl Into<String>,
        data: Array<A, D>,
        offset: impl Into<Vec3>,
        use_as_location_source: bool,
    ) -> Result<(), DatasetError>
    where
        A: Default + PartialEq,
    {
        let key = key.into();
        if use_as_location_source {
            if let Some(source) = self.locations.as_ref().filter(|s| s.channel != key) {
                return Err(DatasetError::LocationSourceAlreadySet {
                    existing: source.channel.clone(),
                });
            }
        }

        let tensor = TensorData::from_dyn(data.into_dyn(), offset)?;
        if !use_as_location_source {
            self.add_tensor(key, tensor);
            return Ok(());
        }

        let channels = tensor.n_channels();
        if channels != 1 {
            return Err(TensorError::NotSingleChannel { channels }.into());
        }
        let locations = SparseLocations::from_mask(tensor.volume(), tensor.offset());
        tracing::debug!(
            channel = %key,
            n_locations = locations.len(),
            "registered mask as location source"
        );
        self.add_tensor(key.clone(), tensor);
        self.locations = Some(LocationSource {
            channel: key,
            locations,
            in_range: InRangeCache::default(),
        });
        Ok(())
    }

    /// Set the spec used when a call passes `None`.
    pub fn set_spec(&mut self, spec: SampleSpec) {
        self.spec = Some(spec);
    }

    /// Builder-style [`set_spec`](Self::set_spec).
    pub fn with_spec(mut self, spec: SampleSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn spec(&self) -> Option<&SampleSpec> {
        self.spec.as_ref()
    }

    pub fn channel(&self, key: &str) -> Option<&TensorData<A>> {
        self.channels.get(key)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.keys().map(String::as_str)
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Candidate centers from the location mask, if one was added.
    pub fn locations(&self) -> Option<&SparseLocations> {
        self.locations.as_ref().map(|s| &s.locations)
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Resolve `spec` against the default and check it is non-empty and
    /// its channels exist.
    pub fn validate_spec<'a>(
        &'a self,
        spec: Option<&'a SampleSpec>,
    ) -> Result<&'a SampleSpec, SampleError> {
        let spec = spec.or(self.spec.as_ref()).ok_or(SampleError::NoSpec)?;
        if spec.is_empty() {
            return Err(SampleError::EmptySpec);
        }
        if let Some(missing) = spec.channels().find(|c| !self.channels.contains_key(*c)) {
            return Err(SampleError::UnknownChannel {
                channel: missing.to_string(),
            });
        }
        Ok(spec)
    }

    /// Centers at which every channel of `spec` yields a full patch.
    ///
    /// The result may be empty when the channels do not overlap enough.
    pub fn valid_range(&self, spec: Option<&SampleSpec>) -> Result<Box3, SampleError> {
        let spec = self.validate_spec(spec)?;
        spec.iter()
            .map(|(key, shape)| self.channels[key].valid_range(shape))
            .reduce(|acc, v| acc.intersect(&v))
            .ok_or(SampleError::EmptySpec)
    }

    /// Number of distinct centers in the valid range (0 if empty).
    ///
    /// This counts the geometric sample space only; a location mask does not
    /// change it.
    pub fn num_samples(&self, spec: Option<&SampleSpec>) -> Result<u64, SampleError> {
        Ok(self.valid_range(spec)?.volume())
    }

    /// Draw a random center from the valid range.
    ///
    /// Uniform over the valid range, or uniform over the masked voxels inside
    /// it when a location source is set.
    pub fn random_location<R: Rng + ?Sized>(
        &self,
        spec: Option<&SampleSpec>,
        rng: &mut R,
    ) -> Result<Vec3, SampleError> {
        let valid = self.valid_range(spec)?;
        if valid.is_empty() {
            return Err(OutOfRange::EmptyValidRange { range: valid }.into());
        }
        match &self.locations {
            None => {
                let size = valid.size();
                let offset = Vec3::new(
                    rng.gen_range(0..size.z()),
                    rng.gen_range(0..size.y()),
                    rng.gen_range(0..size.x()),
                );
                Ok(valid.min() + offset)
            }
            Some(source) => self.masked_location(source, valid, rng),
        }
    }

    /// Rejection-sample a masked voxel inside `valid`.
    ///
    /// Once the draw budget runs out for a range, the in-range voxels are
    /// filtered once and kept, and later draws for that range pick from them.
    fn masked_location<R: Rng + ?Sized>(
        &self,
        source: &LocationSource,
        valid: Box3,
        rng: &mut R,
    ) -> Result<Vec3, SampleError> {
        let not_found = || SampleError::from(OutOfRange::NoMaskedLocation { range: valid });
        let locations = &source.locations;
        if locations.is_empty() {
            return Err(not_found());
        }
        if let Some(inside) = source.in_range.get(valid) {
            return inside.choose(rng).copied().ok_or_else(not_found);
        }

        for _ in 0..self.max_rejection_draws {
            let loc = locations.location(rng.gen_range(0..locations.len()));
            if valid.contains_point(loc) {
                return Ok(loc);
            }
        }

        tracing::warn!(
            draws = self.max_rejection_draws,
            n_locations = locations.len(),
            range = %valid,
            "mask rejection sampling exhausted, filtering candidates"
        );
        let inside: Arc<[Vec3]> = locations.iter().filter(|p| valid.contains_point(*p)).collect();
        source.in_range.insert(valid, Arc::clone(&inside));
        inside.choose(rng).copied().ok_or_else(not_found)
    }
}

impl<A: Clone> Dataset<A> {
    /// Extract the sample centered on `pos`.
    ///
    /// Fails as a whole if any channel's patch does not fit.
    pub fn get_sample(&self, pos: Vec3, spec: Option<&SampleSpec>) -> Result<Sample<A>, SampleError> {
        let spec = self.validate_spec(spec)?;
        let mut patches = BTreeMap::new();
        for (key, shape) in spec.iter() {
            let patch = self.channels[key].get_patch(pos, shape).ok_or_else(|| {
                OutOfRange::Patch {
                    channel: key.to_string(),
                    pos,
                }
            })?;
            patches.insert(key.to_string(), patch);
        }
        Ok(Sample::new(patches))
    }

    /// [`random_location`](Self::random_location) followed by
    /// [`get_sample`](Self::get_sample).
    pub fn random_sample<R: Rng + ?Sized>(
        &self,
        spec: Option<&SampleSpec>,
        rng: &mut R,
    ) -> Result<Sample<A>, SampleError> {
        let pos = self.random_location(spec, rng)?;
        self.get_sample(pos, spec)
    }
}

impl<A: Clone + Send + Sync> Sampler<A> for Dataset<A> {
    fn check_spec(&self, spec: Option<&SampleSpec>) -> Result<(), SampleError> {
        self.validate_spec(spec).map(|_| ())
    }

    fn random_sample(
        &self,
        spec: Option<&SampleSpec>,
        rng: &mut dyn RngCore,
    ) -> Result<Sample<A>, SampleError> {
        Dataset::random_sample(self, spec, rng)
    }

    fn num_samples(&self, spec: Option<&SampleSpec>) -> Result<u64, SampleError> {
        Dataset::num_samples(self, spec)
    }
}
