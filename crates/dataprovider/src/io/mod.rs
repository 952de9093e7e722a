//! Array container I/O.
//!
//! Volumes are stored as safetensors files (`.safetensors`) holding a single
//! tensor named `main`. Any other extension is rejected. Data is read and
//! written in C order, little-endian, as the format prescribes.
//!
//! # Feature gates
//!
//! - `io` (default): enables this module

mod element;

use std::path::{Path, PathBuf};

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensorError, SafeTensors};

pub use element::Element;

/// Name of the array inside the container.
pub const MAIN: &str = "main";

/// File extension of the container.
pub const EXTENSION: &str = "safetensors";

/// Errors from loading or saving arrays.
#[derive(Debug, thiserror::Error)]
pub enum ArrayIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("safetensors error: {0}")]
    SafeTensors(#[from] SafeTensorError),

    #[error("unsupported array format: {} (expected .safetensors)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("no 'main' array in {}", .path.display())]
    MissingArray { path: PathBuf },

    #[error("dtype mismatch: expected {expected:?}, found {found:?}")]
    DtypeMismatch { expected: Dtype, found: Dtype },

    #[error("array data does not match its shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

fn check_extension(path: &Path) -> Result<(), ArrayIoError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(EXTENSION) => Ok(()),
        _ => Err(ArrayIoError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the `main` array of a container.
///
/// The stored dtype must match `A`.
pub fn load<A: Element>(path: impl AsRef<Path>) -> Result<ArrayD<A>, ArrayIoError> {
    let path = path.as_ref();
    check_extension(path)?;

    let bytes = std::fs::read(path)?;
    let tensors = SafeTensors::deserialize(&bytes)?;
    let view = tensors.tensor(MAIN).map_err(|_| ArrayIoError::MissingArray {
        path: path.to_path_buf(),
    })?;
    if view.dtype() != A::DTYPE {
        return Err(ArrayIoError::DtypeMismatch {
            expected: A::DTYPE,
            found: view.dtype(),
        });
    }

    // The byte buffer carries no alignment guarantee.
    let data: Vec<A> = bytemuck::pod_collect_to_vec(view.data());
    let shape = view.shape().to_vec();
    tracing::debug!(path = %path.display(), ?shape, dtype = ?A::DTYPE, "loaded array");
    Ok(ArrayD::from_shape_vec(shape, data)?)
}

/// Save `array` as the `main` array of a new container, replacing any file at `path`.
pub fn save<A, S, D>(array: &ArrayBase<S, D>, path: impl AsRef<Path>) -> Result<(), ArrayIoError>
where
    A: Element,
    S: Data<Elem = A>,
    D: Dimension,
{
    let path = path.as_ref();
    check_extension(path)?;

    let data: Vec<A> = array.iter().copied().collect();
    let shape = array.shape().to_vec();
    let view = TensorView::new(A::DTYPE, shape.clone(), bytemuck::cast_slice(&data))?;
    safetensors::tensor::serialize_to_file([(MAIN, view)], &None, path)?;

    tracing::debug!(path = %path.display(), ?shape, dtype = ?A::DTYPE, "saved array");
    Ok(())
}
