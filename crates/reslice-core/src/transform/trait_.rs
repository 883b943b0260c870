//! Transform trait for spatial coordinate transformations.
//!
//! This module defines the Transform trait the reslice filter maps points through.

use crate::geometry::Point3;

/// Transform trait for spatial coordinate transformations.
///
/// Maps points from one space to another. The reslice filter uses it to map
/// output voxel positions to continuous source voxel positions.
pub trait Transform: Send + Sync {
    /// Apply the transform to a single point.
    fn transform_point(&self, point: &Point3) -> Point3;
}
