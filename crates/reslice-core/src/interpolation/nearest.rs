//! Nearest neighbor interpolation implementation.

use super::trait_::{Interpolator, FILL_VALUE};
use crate::geometry::Point3;
use crate::image::VoxelAccess;

/// Nearest Neighbor Interpolator.
///
/// Rounds each coordinate to the nearest integer index. A coordinate is in
/// bounds when it rounds into `[0, dim - 1]`, i.e. it lies within half a voxel
/// of the volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for NearestNeighborInterpolator {
    fn support_margin(&self) -> f64 {
        0.5
    }

    fn interpolate<V: VoxelAccess + ?Sized>(&self, volume: &V, index: &Point3) -> f32 {
        let dims = volume.dims();
        if dims.contains(&0) {
            return FILL_VALUE;
        }
        let mut voxel = [0usize; 3];

        for axis in 0..3 {
            let rounded = index[axis].round();
            // NaN fails both comparisons
            if !(rounded >= 0.0 && rounded <= (dims[axis] - 1) as f64) {
                return FILL_VALUE;
            }
            voxel[axis] = rounded as usize;
        }

        volume.get(voxel[0], voxel[1], voxel[2])
    }
}
