//! Sampling configuration with builder pattern.
//!
//! [`SamplingConfig`] holds the knobs shared by datasets and supersets. It
//! uses the `bon` crate for builder generation with validation at build time.
//!
//! # Example
//!
//! ```
//! use dataprovider::config::SamplingConfig;
//!
//! // All defaults
//! let config = SamplingConfig::builder().build().unwrap();
//! assert_eq!(config.seed, 42);
//!
//! let config = SamplingConfig::builder()
//!     .seed(7)
//!     .max_rejection_draws(64)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of mask rejection draws before exhaustive filtering.
pub const DEFAULT_MAX_REJECTION_DRAWS: usize = 1000;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_rejection_draws must be at least 1")]
    ZeroRejectionDraws,
}

// =============================================================================
// SamplingConfig
// =============================================================================

/// Configuration for random location sampling.
///
/// # Mask-biased draws
///
/// With a location mask, a center is drawn by picking a random masked voxel
/// and rejecting it if it falls outside the valid range. After
/// `max_rejection_draws` rejections the masked voxels are filtered against
/// the valid range once and a survivor is picked uniformly, which gives the
/// same distribution. Draws therefore always terminate, and fail with
/// [`OutOfRange::NoMaskedLocation`](crate::dataset::OutOfRange::NoMaskedLocation)
/// when no masked voxel is usable.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SamplingConfig {
    /// Random seed for [`SamplingConfig::rng`]. Default: 42.
    #[builder(default = DEFAULT_SEED)]
    pub seed: u64,

    /// Rejection draws before falling back to filtering. Default: 1000.
    #[builder(default = DEFAULT_MAX_REJECTION_DRAWS)]
    pub max_rejection_draws: usize,
}

/// Custom finishing function that validates the config.
impl<S: sampling_config_builder::IsComplete> SamplingConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRejectionDraws`] if `max_rejection_draws == 0`.
    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl SamplingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rejection_draws == 0 {
            return Err(ConfigError::ZeroRejectionDraws);
        }
        Ok(())
    }

    /// A fresh RNG seeded from [`seed`](Self::seed).
    pub fn rng(&self) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.seed)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_rejection_draws: DEFAULT_MAX_REJECTION_DRAWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config_is_valid() {
        let config = SamplingConfig::builder().build();
        assert!(config.is_ok());

        let config = config.unwrap();
        assert_eq!(config, SamplingConfig::default());
        assert_eq!(config.max_rejection_draws, 1000);
    }

    #[test]
    fn test_zero_rejection_draws_is_invalid() {
        let result = SamplingConfig::builder().max_rejection_draws(0).build();
        assert_eq!(result, Err(ConfigError::ZeroRejectionDraws));
    }

    #[test]
    fn test_rng_is_reproducible() {
        let config = SamplingConfig::builder().seed(123).build().unwrap();
        let (mut r1, mut r2) = (config.rng(), config.rng());
        for _ in 0..8 {
            assert_eq!(r1.gen_range(0..1000u32), r2.gen_range(0..1000u32));
        }
    }
}
