//! Voxel grid geometry.
//!
//! A voxel grid describes where a volume sits in world space: how many voxels
//! along each axis, how large each voxel is, and the affine transform that
//! places the grid.
//!
//! # Coordinate Systems
//! * **Index Space**: continuous voxel indices `(i, j, k)`
//! * **Image Space**: index scaled by voxel size, in mm
//! * **World Space**: image space mapped through the grid transform
//!
//! The grid transform acts on image space, so the full index-to-world map is
//! `transform * diag(vox_x, vox_y, vox_z, 1)`.

use serde::{Deserialize, Serialize};

use crate::error::{ResliceError, Result};
use crate::geometry::{Dims3, Point3, Spacing3};
use crate::transform::{AffineTransform, Transform};

/// Geometry of a 3D voxel grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct VoxelGrid {
    dims: Dims3,
    voxel_size: Spacing3,
    transform: AffineTransform,
}

#[derive(Serialize, Deserialize)]
struct GridRepr {
    dims: Dims3,
    voxel_size: [f64; 3],
    transform: AffineTransform,
}

impl TryFrom<GridRepr> for VoxelGrid {
    type Error = ResliceError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        let [vx, vy, vz] = repr.voxel_size;
        VoxelGrid::new(repr.dims, Spacing3::new(vx, vy, vz), repr.transform)
    }
}

impl From<VoxelGrid> for GridRepr {
    fn from(grid: VoxelGrid) -> Self {
        Self {
            dims: grid.dims,
            voxel_size: [grid.voxel_size.x, grid.voxel_size.y, grid.voxel_size.z],
            transform: grid.transform,
        }
    }
}

impl VoxelGrid {
    /// Create a new voxel grid.
    ///
    /// Fails with `InvalidGrid` on a zero dimension or a voxel size that is
    /// not a finite positive number.
    pub fn new(dims: Dims3, voxel_size: Spacing3, transform: AffineTransform) -> Result<Self> {
        if dims.iter().any(|&d| d == 0) {
            return Err(ResliceError::invalid_grid(format!(
                "dimensions must be non-zero, got {:?}",
                dims
            )));
        }
        if voxel_size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ResliceError::invalid_grid(format!(
                "voxel sizes must be finite and positive, got [{}, {}, {}]",
                voxel_size.x, voxel_size.y, voxel_size.z
            )));
        }
        Ok(Self {
            dims,
            voxel_size,
            transform,
        })
    }

    /// Grid with unit voxels and an identity transform.
    pub fn with_dims(dims: Dims3) -> Result<Self> {
        Self::new(dims, Spacing3::new(1.0, 1.0, 1.0), AffineTransform::identity())
    }

    /// Voxel counts along x, y, z.
    pub fn dims(&self) -> Dims3 {
        self.dims
    }

    /// Voxel sizes along x, y, z.
    pub fn voxel_size(&self) -> &Spacing3 {
        &self.voxel_size
    }

    /// Image-space to world transform.
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// Replace the world transform.
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Copy dims, voxel sizes and transform from another grid.
    pub fn adopt_geometry(&mut self, other: &VoxelGrid) {
        self.dims = other.dims;
        self.voxel_size = other.voxel_size;
        self.transform = other.transform;
    }

    /// Continuous voxel index to world transform.
    pub fn index_to_world(&self) -> AffineTransform {
        self.transform
            .multiply(&AffineTransform::scaling(&self.voxel_size))
    }

    /// World to continuous voxel index transform.
    pub fn world_to_index(&self) -> Result<AffineTransform> {
        self.index_to_world().invert()
    }

    /// Convert a continuous index to a world point.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point3) -> Point3 {
        self.index_to_world().transform_point(index)
    }

    /// Convert a world point to a continuous index.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point3) -> Result<Point3> {
        Ok(self.world_to_index()?.transform_point(point))
    }
}
