//! Image types and operations.
//!
//! This module provides the voxel grid geometry, the tensor-backed volume,
//! host sample buffers for kernel evaluation and header metadata.

pub mod grid;
pub mod image;
pub mod samples;
pub mod datatype;
pub mod metadata;

pub use grid::VoxelGrid;
pub use image::Image;
pub use samples::{VoxelAccess, VoxelBuffer};
pub use datatype::DataType;
pub use metadata::ImageHeader;
