use ndarray::{Array3, Array4};
use rand::prelude::*;

/// `(z, y, x)` volume whose values are their own C-order flat index.
pub fn arange_volume(shape: (usize, usize, usize)) -> Array3<f32> {
	let (_, y, x) = shape;
	Array3::from_shape_fn(shape, |(k, j, i)| ((k * y + j) * x + i) as f32)
}

/// `(c, z, y, x)` tensor whose values are their own C-order flat index.
pub fn arange_tensor(shape: (usize, usize, usize, usize)) -> Array4<f32> {
	let (_, z, y, x) = shape;
	Array4::from_shape_fn(shape, |(c, k, j, i)| (((c * z + k) * y + j) * x + i) as f32)
}

/// `(z, y, x)` volume with values uniform in `[0, 1)`.
pub fn random_volume(shape: (usize, usize, usize), seed: u64) -> Array3<f32> {
	let mut rng = StdRng::seed_from_u64(seed);
	Array3::from_shape_simple_fn(shape, || rng.r#gen::<f32>())
}

/// Zero `(z, y, x)` mask with ones at the given local voxels.
///
/// # Panics
///
/// Panics if a voxel lies outside `shape`.
pub fn sparse_mask(shape: (usize, usize, usize), voxels: &[(usize, usize, usize)]) -> Array3<u8> {
	let mut mask = Array3::zeros(shape);
	for &(z, y, x) in voxels {
		mask[[z, y, x]] = 1;
	}
	mask
}
