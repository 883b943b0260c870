use nalgebra::{Matrix3, Matrix4};
use proptest::prelude::*;
use reslice_core::filter::voxel_mapping;
use reslice_core::geometry::{Point3, Spacing3};
use reslice_core::transform::Transform;
use reslice_core::{AffineTransform, VoxelGrid};

fn make_rotation(angle_x: f64, angle_y: f64, angle_z: f64) -> Matrix3<f64> {
    let (sx, cx) = angle_x.sin_cos();
    let (sy, cy) = angle_y.sin_cos();
    let (sz, cz) = angle_z.sin_cos();

    let rx = Matrix3::new(1.0, 0.0, 0.0, 0.0, cx, -sx, 0.0, sx, cx);
    let ry = Matrix3::new(cy, 0.0, sy, 0.0, 1.0, 0.0, -sy, 0.0, cy);
    let rz = Matrix3::new(cz, -sz, 0.0, sz, cz, 0.0, 0.0, 0.0, 1.0);
    rx * ry * rz
}

fn make_grid(angles: (f64, f64, f64), spacing: (f64, f64, f64), origin: (f64, f64, f64)) -> VoxelGrid {
    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&make_rotation(angles.0, angles.1, angles.2));
    m[(0, 3)] = origin.0;
    m[(1, 3)] = origin.1;
    m[(2, 3)] = origin.2;
    VoxelGrid::new(
        [16, 16, 16],
        Spacing3::new(spacing.0, spacing.1, spacing.2),
        AffineTransform::new(m),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_coordinate_roundtrip(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let grid = make_grid((ax, ay, az), (sx, sy, sz), (ox, oy, oz));
        let point = Point3::new(px, py, pz);

        let index = grid.transform_physical_point_to_continuous_index(&point).unwrap();
        let recovered = grid.transform_continuous_index_to_physical_point(&index);

        prop_assert!((point.x - recovered.x).abs() < 1e-6, "X mismatch: {} vs {}", point.x, recovered.x);
        prop_assert!((point.y - recovered.y).abs() < 1e-6, "Y mismatch: {} vs {}", point.y, recovered.y);
        prop_assert!((point.z - recovered.z).abs() < 1e-6, "Z mismatch: {} vs {}", point.z, recovered.z);
    }

    #[test]
    fn test_mapping_between_equal_grids_is_identity(
        ox in -100.0f64..100.0,
        sx in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, az in -3.14f64..3.14
    ) {
        let grid = make_grid((ax, 0.3, az), (sx, 1.0, sz), (ox, -ox, 2.0));
        let mapping = voxel_mapping(&grid, &AffineTransform::identity(), &grid).unwrap();
        prop_assert!(mapping.approx_eq(&AffineTransform::identity(), 1e-9), "mapping:\n{}", mapping);
    }

    #[test]
    fn test_mapping_follows_world_step(
        ix in 0.0f64..15.0, iy in 0.0f64..15.0, iz in 0.0f64..15.0,
        ax in -3.14f64..3.14, sx in 0.5f64..3.0
    ) {
        let source = make_grid((ax, 0.0, 0.1), (sx, sx, 1.0), (5.0, -3.0, 0.0));
        let output = make_grid((0.2, ax, 0.0), (1.0, 2.0, sx), (-1.0, 4.0, 7.5));
        let world = AffineTransform::translation(ix - 7.0, 3.0, -iz);
        let mapping = voxel_mapping(&source, &world, &output).unwrap();

        let out_index = Point3::new(ix, iy, iz);
        let expected = world.transform_point(&output.transform_continuous_index_to_physical_point(&out_index));
        let via_source = source.transform_continuous_index_to_physical_point(&mapping.transform_point(&out_index));
        prop_assert!((expected - via_source).norm() < 1e-6);
    }
}

#[test]
fn test_index_to_world_applies_voxel_size_before_transform() {
    let grid = VoxelGrid::new(
        [4, 4, 4],
        Spacing3::new(2.0, 3.0, 4.0),
        AffineTransform::translation(10.0, 20.0, 30.0),
    )
    .unwrap();
    let p = grid.transform_continuous_index_to_physical_point(&Point3::new(1.0, 1.0, 1.0));
    assert_eq!(p, Point3::new(12.0, 23.0, 34.0));
}
