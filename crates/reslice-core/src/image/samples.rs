//! Host-side voxel sample access.
//!
//! Interpolation kernels read voxels one at a time, which is a poor fit for
//! device tensors. A `VoxelBuffer` is a contiguous host snapshot of a volume
//! (x fastest, then y, then z) that kernels sample from in parallel.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::{ResliceError, Result};
use crate::geometry::Dims3;

/// Read access to voxel samples by integer index.
pub trait VoxelAccess: Sync {
    /// Voxel counts along x, y, z.
    fn dims(&self) -> Dims3;

    /// Sample at an in-bounds index.
    fn get(&self, x: usize, y: usize, z: usize) -> f32;
}

/// Contiguous host copy of volume samples.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelBuffer {
    dims: Dims3,
    data: Vec<f32>,
}

impl VoxelBuffer {
    /// Wrap samples laid out x fastest.
    pub fn new(dims: Dims3, data: Vec<f32>) -> Result<Self> {
        let expected: usize = dims.iter().product();
        if data.len() != expected {
            return Err(ResliceError::invalid_grid(format!(
                "expected {} samples for dimensions {:?}, got {}",
                expected,
                dims,
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Host snapshot of a `[nz, ny, nx]` tensor.
    pub fn from_tensor<B: Backend>(tensor: &Tensor<B, 3>) -> Result<Self> {
        let [nz, ny, nx] = tensor.dims();
        let samples = tensor
            .to_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ResliceError::invalid_grid(format!("cannot read volume samples: {:?}", e)))?;
        Self::new([nx, ny, nz], samples)
    }

    /// Zero-filled buffer.
    pub fn zeros(dims: Dims3) -> Self {
        Self {
            dims,
            data: vec![0.0; dims.iter().product()],
        }
    }

    /// Buffer filled from a function of the voxel index.
    pub fn from_fn<F>(dims: Dims3, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(dims.iter().product());
        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { dims, data }
    }

    /// Linear offset of a voxel.
    pub fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.dims[1] + y) * self.dims[0] + x
    }

    /// Overwrite one voxel.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let offset = self.offset(x, y, z);
        self.data[offset] = value;
    }

    /// Raw samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume into raw samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl VoxelAccess for VoxelBuffer {
    fn dims(&self) -> Dims3 {
        self.dims
    }

    fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.offset(x, y, z)]
    }
}
