//! Integer 3-vectors in `(z, y, x)` order.

use std::fmt;
use std::ops::{Add, Index, Neg, Sub};

/// An integer vector `(z, y, x)`.
///
/// Used for positions, offsets and patch shapes alike. Components are signed
/// so that offsets left of the origin and empty intersections stay
/// representable.
///
/// Component-wise comparisons are exposed as methods ([`Vec3::all_le`],
/// [`Vec3::all_lt`]) rather than through `PartialOrd`, since the ordering is
/// only partial.
///
/// # Example
///
/// ```
/// use dataprovider::geometry::Vec3;
///
/// let shape = Vec3::new(4, 5, 6);
/// assert_eq!(shape.floor_div(2), Vec3::new(2, 2, 3));
/// assert_eq!(shape.product(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec3([i64; 3]);

impl Vec3 {
    /// The origin `(0, 0, 0)`.
    pub const ZERO: Vec3 = Vec3([0, 0, 0]);

    /// `(1, 1, 1)`.
    pub const ONE: Vec3 = Vec3([1, 1, 1]);

    #[inline]
    pub const fn new(z: i64, y: i64, x: i64) -> Self {
        Self([z, y, x])
    }

    /// Same value on every axis.
    #[inline]
    pub const fn splat(v: i64) -> Self {
        Self([v, v, v])
    }

    #[inline]
    pub fn z(&self) -> i64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> i64 {
        self.0[1]
    }

    #[inline]
    pub fn x(&self) -> i64 {
        self.0[2]
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [i64; 3] {
        self.0
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Vec3) -> Vec3 {
        self.zip_with(other, i64::min)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Vec3) -> Vec3 {
        self.zip_with(other, i64::max)
    }

    /// Floor division of every component by `d` (rounds toward negative infinity).
    ///
    /// # Panics
    ///
    /// Panics if `d == 0`.
    #[inline]
    pub fn floor_div(self, d: i64) -> Vec3 {
        self.map(|v| floor_div(v, d))
    }

    /// `true` if every component of `self` is `<=` the matching one of `other`.
    #[inline]
    pub fn all_le(self, other: Vec3) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// `true` if every component of `self` is `<` the matching one of `other`.
    #[inline]
    pub fn all_lt(self, other: Vec3) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a < b)
    }

    /// Product of the components.
    #[inline]
    pub fn product(self) -> i64 {
        self.0.iter().product()
    }

    #[inline]
    fn map(self, f: impl Fn(i64) -> i64) -> Vec3 {
        Vec3([f(self.0[0]), f(self.0[1]), f(self.0[2])])
    }

    #[inline]
    fn zip_with(self, other: Vec3, f: impl Fn(i64, i64) -> i64) -> Vec3 {
        Vec3([
            f(self.0[0], other.0[0]),
            f(self.0[1], other.0[1]),
            f(self.0[2], other.0[2]),
        ])
    }
}

#[inline]
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        self.map(|v| -v)
    }
}

impl Index<usize> for Vec3 {
    type Output = i64;

    #[inline]
    fn index(&self, axis: usize) -> &i64 {
        &self.0[axis]
    }
}

impl From<[i64; 3]> for Vec3 {
    fn from(v: [i64; 3]) -> Self {
        Self(v)
    }
}

impl From<(i64, i64, i64)> for Vec3 {
    fn from((z, y, x): (i64, i64, i64)) -> Self {
        Self([z, y, x])
    }
}

impl From<Vec3> for [i64; 3] {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}
