//! Sample specs: which channels make up a sample, and at what patch shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Errors from building a [`SampleSpec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("shape for channel '{channel}' must have 3 or 4 dimensions, got {len}")]
    BadRank { channel: String, len: usize },

    #[error("shape for channel '{channel}' must be positive on every axis, got {shape}")]
    NonPositive { channel: String, shape: Vec3 },
}

/// Mapping from channel name to requested patch shape `(z, y, x)`.
///
/// Shapes are validated once on insertion, so downstream code can rely on
/// strictly positive extents. Channels iterate in name order.
///
/// A spec can be deserialized from a name → shape mapping where each shape
/// has 3 or 4 entries; only the trailing `(z, y, x)` is kept.
///
/// # Example
///
/// ```
/// use dataprovider::dataset::SampleSpec;
/// use dataprovider::geometry::Vec3;
///
/// let spec: SampleSpec = serde_json::from_str(r#"{"input": [1, 18, 160, 160]}"#).unwrap();
/// assert_eq!(spec.get("input"), Some(Vec3::new(18, 160, 160)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<i64>>",
    into = "BTreeMap<String, Vec<i64>>"
)]
pub struct SampleSpec {
    shapes: BTreeMap<String, Vec3>,
}

impl SampleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a channel.
    pub fn insert(&mut self, channel: impl Into<String>, shape: impl Into<Vec3>) -> Result<(), SpecError> {
        let channel = channel.into();
        let shape = shape.into();
        if !Vec3::ZERO.all_lt(shape) {
            return Err(SpecError::NonPositive { channel, shape });
        }
        self.shapes.insert(channel, shape);
        Ok(())
    }

    /// Add (or replace) a channel from a 3- or 4-entry shape.
    pub fn insert_dims(&mut self, channel: impl Into<String>, dims: &[i64]) -> Result<(), SpecError> {
        let channel = channel.into();
        match *dims {
            [z, y, x] | [_, z, y, x] => self.insert(channel, Vec3::new(z, y, x)),
            _ => Err(SpecError::BadRank {
                channel,
                len: dims.len(),
            }),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, channel: impl Into<String>, shape: impl Into<Vec3>) -> Result<Self, SpecError> {
        self.insert(channel, shape)?;
        Ok(self)
    }

    pub fn get(&self, channel: &str) -> Option<Vec3> {
        self.shapes.get(channel).copied()
    }

    /// `(channel, shape)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec3)> + '_ {
        self.shapes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> + '_ {
        self.shapes.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<i64>>> for SampleSpec {
    type Error = SpecError;

    fn try_from(map: BTreeMap<String, Vec<i64>>) -> Result<Self, Self::Error> {
        let mut spec = SampleSpec::new();
        for (channel, dims) in map {
            spec.insert_dims(channel, &dims)?;
        }
        Ok(spec)
    }
}

impl From<SampleSpec> for BTreeMap<String, Vec<i64>> {
    fn from(spec: SampleSpec) -> Self {
        spec.shapes
            .into_iter()
            .map(|(k, v)| (k, v.to_array().to_vec()))
            .collect()
    }
}
