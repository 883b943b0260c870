//! Fixed-size nalgebra aliases shared by the grid, transform and reslice code.

use nalgebra::{Point3 as NaPoint3, Vector3 as NaVector3};

pub type Point3 = NaPoint3<f64>;
pub type Vector3 = NaVector3<f64>;
pub type Spacing3 = NaVector3<f64>;
pub type Dims3 = [usize; 3];
