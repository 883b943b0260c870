//! Image filters.
//!
//! This module provides the reslice filter that resamples a volume onto a
//! new voxel grid.

pub mod reslice;

pub use reslice::{voxel_mapping, ResliceFilter};
