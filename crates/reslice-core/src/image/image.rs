//! Volume type pairing tensor samples with voxel grid geometry.
//!
//! This module provides the Image struct, a 3D volume whose samples live in a
//! backend tensor and whose placement in world space is a `VoxelGrid`.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use super::grid::VoxelGrid;
use super::samples::VoxelBuffer;
use crate::error::{ResliceError, Result};
use crate::geometry::Dims3;

/// 3D volume with grid geometry.
///
/// The tensor is shaped `[nz, ny, nx]`, so the x index varies fastest in
/// memory, while the grid reports its dimensions as `[nx, ny, nz]`.
///
/// # Examples
/// ```rust
/// use reslice_core::image::{Image, VoxelGrid};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 3, 2], &device);
/// let grid = VoxelGrid::with_dims([2, 3, 4]).unwrap();
/// let image = Image::new(data, grid).unwrap();
/// assert_eq!(image.shape(), [4, 3, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend> {
    /// Voxel samples, `[nz, ny, nx]`.
    data: Tensor<B, 3>,
    /// Placement of the samples in world space.
    grid: VoxelGrid,
}

impl<B: Backend> Image<B> {
    /// Create a volume, checking that the tensor shape matches the grid.
    pub fn new(data: Tensor<B, 3>, grid: VoxelGrid) -> Result<Self> {
        let shape = data.dims();
        let expected = tensor_shape(grid.dims());
        if shape != expected {
            return Err(ResliceError::invalid_grid(format!(
                "tensor shape {:?} does not match grid dimensions {:?}",
                shape,
                grid.dims()
            )));
        }
        Ok(Self { data, grid })
    }

    /// Create a volume from host samples laid out x fastest.
    pub fn from_samples(samples: Vec<f32>, grid: VoxelGrid, device: &B::Device) -> Result<Self> {
        let buffer = VoxelBuffer::new(grid.dims(), samples)?;
        Self::from_buffer(buffer, grid, device)
    }

    /// Create a volume from a host buffer.
    pub fn from_buffer(buffer: VoxelBuffer, grid: VoxelGrid, device: &B::Device) -> Result<Self> {
        use crate::image::samples::VoxelAccess;

        if buffer.dims() != grid.dims() {
            return Err(ResliceError::invalid_grid(format!(
                "buffer dimensions {:?} do not match grid dimensions {:?}",
                buffer.dims(),
                grid.dims()
            )));
        }
        let shape = tensor_shape(grid.dims());
        let data = Tensor::<B, 3>::from_data(
            TensorData::new(buffer.into_vec(), Shape::new(shape)),
            device,
        );
        Ok(Self { data, grid })
    }

    /// Get the sample tensor.
    pub fn data(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Get the grid geometry.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Tensor shape `[nz, ny, nx]`.
    pub fn shape(&self) -> [usize; 3] {
        self.data.dims()
    }

    /// Same samples under different geometry of identical dimensions.
    pub fn with_grid(self, grid: VoxelGrid) -> Result<Self> {
        Self::new(self.data, grid)
    }

    /// Copy the samples to a host buffer for kernel evaluation.
    pub fn to_buffer(&self) -> Result<VoxelBuffer> {
        VoxelBuffer::from_tensor(&self.data)
    }
}

fn tensor_shape(dims: Dims3) -> [usize; 3] {
    [dims[2], dims[1], dims[0]]
}
