//! Cubic interpolation implementation.
//!
//! Tricubic convolution over the 4x4x4 neighbourhood around the sample point
//! using Catmull-Rom weights.

use super::trait_::{Interpolator, FILL_VALUE};
use crate::geometry::Point3;
use crate::image::VoxelAccess;

/// Catmull-Rom weights for taps at offsets -1, 0, 1, 2 from `floor(x)`.
///
/// At `t = 0` the weights are exactly `[0, 1, 0, 0]`, so integer coordinates
/// reproduce the stored sample.
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

/// Cubic Interpolator.
///
/// Needs one voxel of support on either side of the sample point: a
/// coordinate is in bounds when it lies within `[1, dim - 2]` on every axis.
/// At the upper limit the outermost tap carries zero weight and is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicInterpolator;

impl CubicInterpolator {
    /// Create a new cubic interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for CubicInterpolator {
    fn support_margin(&self) -> f64 {
        1.0
    }

    fn interpolate<V: VoxelAccess + ?Sized>(&self, volume: &V, index: &Point3) -> f32 {
        let dims = volume.dims();
        let margin = self.support_margin();
        let mut first = [0usize; 3];
        let mut weights = [[0.0f64; 4]; 3];

        for axis in 0..3 {
            let c = index[axis];
            let upper = dims[axis] as f64 - 1.0 - margin;
            if !(c >= margin && c <= upper) {
                return FILL_VALUE;
            }
            let floor = c.floor();
            first[axis] = floor as usize - 1;
            weights[axis] = catmull_rom_weights(c - floor);
        }

        let mut sum = 0.0f64;
        for (dz, &wz) in weights[2].iter().enumerate() {
            if wz == 0.0 {
                continue;
            }
            for (dy, &wy) in weights[1].iter().enumerate() {
                if wy == 0.0 {
                    continue;
                }
                for (dx, &wx) in weights[0].iter().enumerate() {
                    if wx == 0.0 {
                        continue;
                    }
                    let value = volume.get(first[0] + dx, first[1] + dy, first[2] + dz);
                    sum += wx * wy * wz * value as f64;
                }
            }
        }

        sum as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::VoxelBuffer;

    #[test]
    fn test_weights_partition_unity() {
        for t in [0.0, 0.1, 0.25, 0.5, 0.9] {
            let w = catmull_rom_weights(t);
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(catmull_rom_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cubic_exact_at_integers() {
        let v = VoxelBuffer::from_fn([5, 5, 5], |x, y, z| ((x * 7 + y * 3 + z * 11) % 13) as f32);
        let interp = CubicInterpolator::new();
        for x in 1..=3 {
            for y in 1..=3 {
                for z in 1..=3 {
                    let value = interp.interpolate(&v, &Point3::new(x as f64, y as f64, z as f64));
                    assert_eq!(value, v.get(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_cubic_reproduces_linear_ramp() {
        let v = VoxelBuffer::from_fn([6, 6, 6], |x, y, z| (2 * x + y + 3 * z) as f32);
        let interp = CubicInterpolator::new();
        let value = interp.interpolate(&v, &Point3::new(2.3, 1.7, 3.5));
        let expected = 2.0 * 2.3 + 1.7 + 3.0 * 3.5;
        assert!((value as f64 - expected).abs() < 1e-4);
    }

    #[test]
    fn test_cubic_support_margin() {
        let v = VoxelBuffer::from_fn([5, 5, 5], |_, _, _| 1.0);
        let interp = CubicInterpolator::new();
        assert_eq!(interp.interpolate(&v, &Point3::new(0.5, 2.0, 2.0)), FILL_VALUE);
        assert_eq!(interp.interpolate(&v, &Point3::new(2.0, 3.5, 2.0)), FILL_VALUE);
        assert!((interp.interpolate(&v, &Point3::new(1.0, 3.0, 2.5)) - 1.0).abs() < 1e-6);

        let tiny = VoxelBuffer::from_fn([2, 5, 5], |_, _, _| 1.0);
        assert_eq!(interp.interpolate(&tiny, &Point3::new(1.0, 2.0, 2.0)), FILL_VALUE);
    }
}
