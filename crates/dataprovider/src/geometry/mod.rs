//! 3D coordinate geometry.
//!
//! All coordinates are `(z, y, x)`. [`Vec3`] is used for positions, offsets
//! and shapes; [`Box3`] is a half-open `[min, max)` box used for bounding
//! boxes and valid ranges.

mod bbox;
mod vector;

pub use bbox::Box3;
pub use vector::Vec3;
