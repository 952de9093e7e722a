//! Read-only volumetric tensors placed in a global coordinate system.
//!
//! A [`TensorData`] is a 4D array `(channel, z, y, x)` plus a global offset.
//! Channels are never addressed individually: every access is through a 3D
//! position, and every patch carries all channels.
//!
//! Inputs of lower rank are normalized on the way in with [`to_tensor`]:
//!
//! | input     | stored as      |
//! |-----------|----------------|
//! | `(y,x)`   | `(1,1,y,x)`    |
//! | `(z,y,x)` | `(1,z,y,x)`    |
//! | `(c,z,y,x)` | unchanged    |

use std::fmt;

use ndarray::{s, Array3, Array4, ArrayD, ArrayView3, ArrayView4, Axis, Ix3, Ix4};

use crate::geometry::{Box3, Vec3};

/// Errors from normalizing input arrays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    #[error("expected a 2D, 3D or 4D array, got {ndim}D")]
    UnsupportedRank { ndim: usize },

    #[error("expected a single-channel volume, got {channels} channels")]
    NotSingleChannel { channels: usize },
}

/// Normalize a 2D, 3D or 4D array to `(c, z, y, x)`.
pub fn to_tensor<A>(data: ArrayD<A>) -> Result<Array4<A>, TensorError> {
    let ndim = data.ndim();
    let data = match ndim {
        2 => data.insert_axis(Axis(0)).insert_axis(Axis(0)),
        3 => data.insert_axis(Axis(0)),
        4 => data,
        _ => return Err(TensorError::UnsupportedRank { ndim }),
    };
    data.into_dimensionality::<Ix4>()
        .map_err(|_| TensorError::UnsupportedRank { ndim })
}

/// Normalize a 2D, 3D or single-channel 4D array to `(z, y, x)`.
pub fn to_volume<A>(data: ArrayD<A>) -> Result<Array3<A>, TensorError> {
    let ndim = data.ndim();
    let data = match ndim {
        2 => data.insert_axis(Axis(0)),
        3 => data,
        4 => {
            let channels = data.shape()[0];
            if channels != 1 {
                return Err(TensorError::NotSingleChannel { channels });
            }
            data.index_axis_move(Axis(0), 0)
        }
        _ => return Err(TensorError::UnsupportedRank { ndim }),
    };
    data.into_dimensionality::<Ix3>()
        .map_err(|_| TensorError::UnsupportedRank { ndim })
}

/// Read-only 4D tensor with a global offset.
///
/// The bounding box is always derived from the array shape and the offset.
///
/// # Example
///
/// ```
/// use dataprovider::geometry::{Box3, Vec3};
/// use dataprovider::tensor::TensorData;
/// use ndarray::Array4;
///
/// let t = TensorData::new(Array4::<f32>::zeros((4, 4, 4, 4)), Vec3::ONE);
/// assert_eq!(t.bbox(), Box3::new(Vec3::ONE, Vec3::splat(5)));
///
/// let patch = t.get_patch(Vec3::splat(3), Vec3::splat(3)).unwrap();
/// assert_eq!(patch.shape(), &[4, 3, 3, 3]);
/// assert!(t.get_patch(Vec3::splat(4), Vec3::splat(3)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TensorData<A> {
    data: Array4<A>,
    offset: Vec3,
}

impl<A> TensorData<A> {
    /// Wrap a `(c, z, y, x)` array placed at `offset`.
    pub fn new(data: Array4<A>, offset: impl Into<Vec3>) -> Self {
        Self {
            data,
            offset: offset.into(),
        }
    }

    /// Wrap an array of rank 2 to 4, see [`to_tensor`].
    pub fn from_dyn(data: ArrayD<A>, offset: impl Into<Vec3>) -> Result<Self, TensorError> {
        Ok(Self::new(to_tensor(data)?, offset))
    }

    /// Wrap a single-channel `(z, y, x)` volume.
    pub fn from_volume(data: Array3<A>, offset: impl Into<Vec3>) -> Self {
        Self::new(data.insert_axis(Axis(0)), offset)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn array(&self) -> ArrayView4<'_, A> {
        self.data.view()
    }

    /// `(c, z, y, x)`.
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    /// Spatial extent `(z, y, x)`.
    pub fn dim(&self) -> Vec3 {
        let [_, z, y, x] = self.shape();
        Vec3::new(z as i64, y as i64, x as i64)
    }

    /// First channel as a `(z, y, x)` view.
    ///
    /// # Panics
    ///
    /// Panics if the tensor has no channels.
    pub fn volume(&self) -> ArrayView3<'_, A> {
        assert!(self.n_channels() > 0, "tensor has no channels");
        self.data.index_axis(Axis(0), 0)
    }

    #[inline]
    pub fn n_channels(&self) -> usize {
        self.data.shape()[0]
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Global bounding box: `[offset, offset + dim)`.
    pub fn bbox(&self) -> Box3 {
        Box3::new(self.offset, self.offset + self.dim())
    }

    /// Set of centers at which [`get_patch`](Self::get_patch) succeeds for `shape`.
    ///
    /// Mirrors [`Box3::centered`]: the low margin is `shape // 2` and the high
    /// margin is `shape - shape // 2 - 1`.
    pub fn valid_range(&self, shape: Vec3) -> Box3 {
        let top = shape.floor_div(2);
        let btm = shape - top - Vec3::ONE;
        Box3::new(self.offset + top, self.offset + self.dim() - btm)
    }

    /// Borrow the patch of `shape` centered on `pos` without copying.
    ///
    /// Returns `None` when the patch is not fully inside the bounding box.
    pub fn patch_view(&self, pos: Vec3, shape: Vec3) -> Option<ArrayView4<'_, A>> {
        if !Vec3::ZERO.all_le(shape) {
            return None;
        }
        let bx = Box3::centered(pos, shape);
        if !self.bbox().contains(&bx) {
            return None;
        }
        // Local coordinates are non-negative once contained.
        let local = bx.translate(-self.offset);
        let (lo, hi) = (local.min(), local.max());
        Some(self.data.slice(s![
            ..,
            lo.z() as usize..hi.z() as usize,
            lo.y() as usize..hi.y() as usize,
            lo.x() as usize..hi.x() as usize
        ]))
    }
}

impl<A: Clone> TensorData<A> {
    /// Copy out the patch of `shape` centered on `pos`.
    ///
    /// The result has shape `(c, shape.z, shape.y, shape.x)` and owns its data.
    /// Returns `None` when the patch is not fully inside the bounding box.
    pub fn get_patch(&self, pos: Vec3, shape: Vec3) -> Option<Array4<A>> {
        self.patch_view(pos, shape).map(|v| v.to_owned())
    }
}

impl<A> fmt::Display for TensorData<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<TensorData>")?;
        writeln!(f, "shape: {:?}", self.shape())?;
        writeln!(f, "dim: {}", self.dim())?;
        writeln!(f, "offset: {}", self.offset)
    }
}
