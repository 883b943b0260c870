//! Transform types and operations.
//!
//! This module provides the fixed 4x4 affine transform, the ASCII matrix
//! file reader and the Transform trait used by the reslice filter.

pub mod trait_;
pub mod affine;
pub mod matrix_file;

pub use trait_::Transform;
pub use affine::AffineTransform;
pub use matrix_file::{load_matrix, parse_matrix};
