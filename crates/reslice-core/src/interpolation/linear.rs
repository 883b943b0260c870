//! Linear interpolation implementation.
//!
//! Trilinear interpolation over the eight voxels bracketing the sample point.

use super::trait_::{Interpolator, FILL_VALUE};
use crate::geometry::Point3;
use crate::image::VoxelAccess;

/// Linear Interpolator.
///
/// Valid whenever the coordinate lies within `[0, dim - 1]` on every axis.
/// Each neighbour's weight is the product of the per-axis weights
/// `1 - frac` and `frac`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for LinearInterpolator {
    fn support_margin(&self) -> f64 {
        0.0
    }

    fn interpolate<V: VoxelAccess + ?Sized>(&self, volume: &V, index: &Point3) -> f32 {
        let dims = volume.dims();
        if dims.contains(&0) {
            return FILL_VALUE;
        }
        let mut base = [0usize; 3];
        let mut weights = [[0.0f64; 2]; 3];

        for axis in 0..3 {
            let c = index[axis];
            if !(c >= 0.0 && c <= (dims[axis] - 1) as f64) {
                return FILL_VALUE;
            }
            let floor = c.floor();
            let frac = c - floor;
            base[axis] = floor as usize;
            weights[axis] = [1.0 - frac, frac];
        }

        let mut sum = 0.0f64;
        for dz in 0..2 {
            let wz = weights[2][dz];
            if wz == 0.0 {
                continue;
            }
            for dy in 0..2 {
                let wy = weights[1][dy];
                if wy == 0.0 {
                    continue;
                }
                for dx in 0..2 {
                    let wx = weights[0][dx];
                    if wx == 0.0 {
                        continue;
                    }
                    // a zero weight guards the upper neighbour on the last voxel
                    let value = volume.get(base[0] + dx, base[1] + dy, base[2] + dz);
                    sum += wx * wy * wz * value as f64;
                }
            }
        }

        sum as f32
    }
}
