//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.
//! Kernels evaluate single points against host samples in f64; `sample`
//! batches them over tensors.

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use rayon::prelude::*;

use crate::error::{ResliceError, Result};
use crate::geometry::Point3;
use crate::image::{VoxelAccess, VoxelBuffer};

/// Value returned when a sample's support falls outside the volume.
pub const FILL_VALUE: f32 = 0.0;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Coordinates are continuous voxel indices `(x, y, z)` in the sampled
/// volume. A kernel returns `FILL_VALUE` whenever the neighbourhood it needs
/// is not entirely inside the volume.
pub trait Interpolator: Send + Sync {
    /// How far (in voxels) the kernel's support extends past the sample point
    /// before a coordinate is considered out of bounds.
    fn support_margin(&self) -> f64;

    /// Interpolate the volume at a continuous index.
    fn interpolate<V: VoxelAccess + ?Sized>(&self, volume: &V, index: &Point3) -> f32;

    /// Interpolate a batch of continuous indices from a tensor volume.
    ///
    /// # Arguments
    /// * `data` - Volume tensor `[nz, ny, nx]`
    /// * `indices` - Continuous indices `[Batch, 3]`, one `(x, y, z)` row each
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]` on the volume's device
    fn sample<B: Backend>(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let [batch, rank] = indices.dims();
        if rank != 3 {
            return Err(ResliceError::invalid_grid(format!(
                "expected [batch, 3] indices, got [{}, {}]",
                batch, rank
            )));
        }

        let volume = VoxelBuffer::from_tensor(data)?;
        let coords = indices
            .to_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| ResliceError::invalid_grid(format!("cannot read sample indices: {:?}", e)))?;

        let values: Vec<f32> = coords
            .par_chunks(3)
            .map(|c| self.interpolate(&volume, &Point3::new(c[0], c[1], c[2])))
            .collect();

        Ok(Tensor::from_data(TensorData::new(values, [batch]), &data.device()))
    }
}
