//! Reslice image filter.
//!
//! This module provides ResliceFilter which resamples a volume onto a new
//! voxel grid using a transform and an interpolator.

use burn::tensor::backend::Backend;
use rayon::prelude::*;

use crate::error::Result;
use crate::geometry::Point3;
use crate::image::{DataType, Image, VoxelAccess, VoxelBuffer, VoxelGrid};
use crate::interpolation::{InterpolationMethod, InterpolationSpec, Interpolator, Oversample};
use crate::transform::{AffineTransform, Transform};

/// Map from output voxel indices to continuous source voxel indices.
///
/// `world` carries output world coordinates to source world coordinates:
/// `inv(source index to world) * world * (output index to world)`.
pub fn voxel_mapping(
    source_grid: &VoxelGrid,
    world: &AffineTransform,
    output_grid: &VoxelGrid,
) -> Result<AffineTransform> {
    let world_to_source = source_grid.world_to_index()?;
    Ok(world_to_source.multiply(&world.multiply(&output_grid.index_to_world())))
}

/// Reslice image filter.
///
/// For every output voxel, maps the voxel (and each oversampling sub-sample)
/// through `transform` into source index space, interpolates, and averages.
///
/// The transform maps Output Index Space -> Source Index Space.
///
/// # Type Parameters
/// * `T` - The transform type
/// * `I` - The interpolator type
#[derive(Debug, Clone)]
pub struct ResliceFilter<T, I>
where
    T: Transform,
    I: Interpolator,
{
    grid: VoxelGrid,
    transform: T,
    interpolator: I,
    oversample: Oversample,
    datatype: Option<DataType>,
}

impl<T, I> ResliceFilter<T, I>
where
    T: Transform,
    I: Interpolator,
{
    /// Create a new reslice filter.
    ///
    /// # Arguments
    /// * `grid` - Output voxel grid
    /// * `transform` - Output voxel index to source voxel index
    /// * `interpolator` - Interpolator for source sampling
    /// * `oversample` - Sub-samples per output voxel along each axis
    pub fn new(grid: VoxelGrid, transform: T, interpolator: I, oversample: Oversample) -> Self {
        Self {
            grid,
            transform,
            interpolator,
            oversample,
            datatype: None,
        }
    }

    /// Cast every output sample to the given datatype.
    pub fn with_datatype(mut self, datatype: Option<DataType>) -> Self {
        self.datatype = datatype;
        self
    }

    /// Output grid.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Output index to source index transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn oversample(&self) -> Oversample {
        self.oversample
    }

    /// Value of a single output voxel.
    pub fn sample_voxel<V: VoxelAccess + ?Sized>(
        &self,
        source: &V,
        voxel: [usize; 3],
        offsets: &[Vec<f64>; 3],
    ) -> f32 {
        let mut sum = 0.0f64;
        for oz in &offsets[2] {
            for oy in &offsets[1] {
                for ox in &offsets[0] {
                    let position = Point3::new(
                        voxel[0] as f64 + ox,
                        voxel[1] as f64 + oy,
                        voxel[2] as f64 + oz,
                    );
                    let source_index = self.transform.transform_point(&position);
                    sum += self.interpolator.interpolate(source, &source_index) as f64;
                }
            }
        }

        let value = (sum / self.oversample.sample_count() as f64) as f32;
        match self.datatype {
            Some(datatype) => datatype.cast(value),
            None => value,
        }
    }

    /// Reslice host samples, one z-slice per rayon task.
    pub fn apply_to_buffer<V: VoxelAccess + ?Sized>(&self, source: &V) -> Result<VoxelBuffer> {
        let [nx, ny, nz] = self.grid.dims();
        let offsets = [
            self.oversample.offsets(0),
            self.oversample.offsets(1),
            self.oversample.offsets(2),
        ];

        let mut data = vec![0.0f32; nx * ny * nz];
        data.par_chunks_mut(nx * ny)
            .enumerate()
            .for_each(|(z, slice)| {
                for y in 0..ny {
                    for x in 0..nx {
                        slice[y * nx + x] = self.sample_voxel(source, [x, y, z], &offsets);
                    }
                }
            });

        VoxelBuffer::new([nx, ny, nz], data)
    }

    /// Apply filter to an input volume.
    pub fn apply<B: Backend>(&self, input: &Image<B>) -> Result<Image<B>> {
        let device = input.data().device();
        let source = input.to_buffer()?;

        tracing::debug!(
            "Reslicing {:?} -> {:?} with oversampling {}",
            input.grid().dims(),
            self.grid.dims(),
            self.oversample
        );

        let output = self.apply_to_buffer(&source)?;
        Image::from_buffer(output, self.grid.clone(), &device)
    }
}

impl ResliceFilter<AffineTransform, InterpolationMethod> {
    /// Build a filter that reslices a source grid onto an output grid, with
    /// `world` mapping output world coordinates to source world coordinates.
    ///
    /// Oversampling factors left unspecified in `spec` are derived from the
    /// voxel sizes of the two grids.
    pub fn from_grids(
        source_grid: &VoxelGrid,
        world: &AffineTransform,
        output_grid: &VoxelGrid,
        spec: InterpolationSpec,
    ) -> Result<Self> {
        let transform = voxel_mapping(source_grid, world, output_grid)?;
        let oversample = spec.resolve_oversample(output_grid.voxel_size(), source_grid.voxel_size());
        Ok(Self::new(output_grid.clone(), transform, spec.method, oversample))
    }
}
