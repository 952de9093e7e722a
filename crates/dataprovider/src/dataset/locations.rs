//! Mask-derived candidate locations.

use ndarray::ArrayView3;

use crate::geometry::Vec3;

/// Nonzero voxels of a mask, stored as C-order flat indices into its
/// `(z, y, x)` extent, together with the mask's global offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseLocations {
    indices: Vec<usize>,
    dims: Vec3,
    offset: Vec3,
}

impl SparseLocations {
    /// Collect the nonzero voxels of `mask`.
    ///
    /// A voxel counts as nonzero when it differs from `A::default()`.
    pub fn from_mask<A: Default + PartialEq>(mask: ArrayView3<'_, A>, offset: Vec3) -> Self {
        let zero = A::default();
        let (z, y, x) = mask.dim();
        let indices = mask
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != zero)
            .map(|(i, _)| i)
            .collect();
        Self {
            indices,
            dims: Vec3::new(z as i64, y as i64, x as i64),
            offset,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn dims(&self) -> Vec3 {
        self.dims
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Global coordinate of the `i`-th candidate.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn location(&self, i: usize) -> Vec3 {
        self.unravel(self.indices[i]) + self.offset
    }

    /// Global coordinates of every candidate.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.indices.iter().map(|&idx| self.unravel(idx) + self.offset)
    }

    fn unravel(&self, idx: usize) -> Vec3 {
        let idx = idx as i64;
        let plane = self.dims.y() * self.dims.x();
        let rem = idx % plane;
        Vec3::new(idx / plane, rem / self.dims.x(), rem % self.dims.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sparse_mask;

    #[test]
    fn collects_nonzero_voxels_in_c_order() {
        let mask = sparse_mask((3, 4, 5), &[(2, 3, 4), (0, 0, 1), (1, 2, 0)]);
        let locs = SparseLocations::from_mask(mask.view(), Vec3::new(10, 20, 30));

        assert_eq!(locs.len(), 3);
        assert_eq!(locs.dims(), Vec3::new(3, 4, 5));
        assert_eq!(locs.indices(), &[1, 30, 59]);

        let global: Vec<_> = locs.iter().collect();
        assert_eq!(
            global,
            [
                Vec3::new(10, 20, 31),
                Vec3::new(11, 22, 30),
                Vec3::new(12, 23, 34)
            ]
        );
        assert_eq!(locs.location(2), Vec3::new(12, 23, 34));
    }

    #[test]
    fn empty_mask_has_no_locations() {
        let mask = sparse_mask((2, 2, 2), &[]);
        let locs = SparseLocations::from_mask(mask.view(), Vec3::ZERO);
        assert!(locs.is_empty());
    }
}
