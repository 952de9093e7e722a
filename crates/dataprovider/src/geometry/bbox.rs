//! Axis-aligned integer boxes.

use std::fmt;

use super::Vec3;

/// Half-open axis-aligned box `[min, max)`.
///
/// Operations never mutate in place. An intersection of disjoint boxes is a
/// valid value with `min > max` on some axis; check [`Box3::is_empty`] before
/// using its size.
///
/// # Example
///
/// ```
/// use dataprovider::geometry::{Box3, Vec3};
///
/// let a = Box3::new(Vec3::ZERO, Vec3::splat(10));
/// let b = Box3::new(Vec3::splat(5), Vec3::splat(15));
/// assert_eq!(a.intersect(&b), Box3::new(Vec3::splat(5), Vec3::splat(10)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box3 {
    min: Vec3,
    max: Vec3,
}

impl Box3 {
    #[inline]
    pub fn new(min: impl Into<Vec3>, max: impl Into<Vec3>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Box of the given `shape` centered on `center`.
    ///
    /// The low margin is `shape // 2`, so even extents put the extra voxel
    /// on the max side: a shape of 4 centered on 10 covers `[8, 12)`.
    #[inline]
    pub fn centered(center: Vec3, shape: Vec3) -> Self {
        let min = center - shape.floor_div(2);
        Self {
            min,
            max: min + shape,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// `max - min`. Negative on axes where the box is empty.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// `true` if some axis has no extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.min.all_lt(self.max)
    }

    /// Number of integer points in the box (0 when empty).
    #[inline]
    pub fn volume(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.size().product() as u64
        }
    }

    /// The box shifted by `v`.
    #[inline]
    pub fn translate(&self, v: Vec3) -> Box3 {
        Box3 {
            min: self.min + v,
            max: self.max + v,
        }
    }

    /// Per-axis overlap of the two boxes. May be empty.
    #[inline]
    pub fn intersect(&self, other: &Box3) -> Box3 {
        Box3 {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains(&self, other: &Box3) -> bool {
        self.min.all_le(other.min) && other.max.all_le(self.max)
    }

    /// `true` if `p` lies within `[min, max)`.
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.all_le(p) && p.all_lt(self.max)
    }
}

impl fmt::Display for Box3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}
