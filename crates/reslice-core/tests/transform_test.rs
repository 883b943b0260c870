use nalgebra::{Matrix4, Rotation3, Vector3};
use proptest::prelude::*;
use reslice_core::geometry::{Point3, Spacing3};
use reslice_core::transform::{parse_matrix, AffineTransform, Transform};
use reslice_core::ResliceError;

fn make_affine(
    angles: (f64, f64, f64),
    scale: (f64, f64, f64),
    shift: (f64, f64, f64),
) -> AffineTransform {
    let rotation = Rotation3::from_euler_angles(angles.0, angles.1, angles.2);
    let mut m = Matrix4::identity();
    let linear = rotation.matrix() * nalgebra::Matrix3::from_diagonal(&Vector3::new(scale.0, scale.1, scale.2));
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&linear);
    m[(0, 3)] = shift.0;
    m[(1, 3)] = shift.1;
    m[(2, 3)] = shift.2;
    AffineTransform::new(m)
}

proptest! {
    #[test]
    fn test_double_inverse_roundtrip(
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        sx in 0.2f64..5.0, sy in 0.2f64..5.0, sz in 0.2f64..5.0,
        tx in -200.0f64..200.0, ty in -200.0f64..200.0, tz in -200.0f64..200.0
    ) {
        let m = make_affine((ax, ay, az), (sx, sy, sz), (tx, ty, tz));
        let back = m.invert().unwrap().invert().unwrap();
        prop_assert!(back.approx_eq(&m, 1e-8), "roundtrip mismatch:\n{}\nvs\n{}", back, m);
    }

    #[test]
    fn test_double_inverse_with_fine_voxels_far_from_origin(
        ax in -3.14f64..3.14, az in -3.14f64..3.14,
        s in 0.01f64..0.2,
        tx in -1e5f64..1e5, ty in -1e5f64..1e5, tz in -1e5f64..1e5
    ) {
        let m = make_affine((ax, 0.4, az), (s, s, 2.0 * s), (tx, ty, tz));
        let back = m.invert().unwrap().invert().unwrap();
        prop_assert!(back.approx_eq(&m, 1e-6), "roundtrip mismatch:\n{}\nvs\n{}", back, m);
    }

    #[test]
    fn test_inverse_undoes_point_mapping(
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        sx in 0.2f64..5.0, sy in 0.2f64..5.0, sz in 0.2f64..5.0,
        px in -100.0f64..100.0, py in -100.0f64..100.0, pz in -100.0f64..100.0
    ) {
        let m = make_affine((ax, ay, az), (sx, sy, sz), (1.0, -2.0, 3.0));
        let inv = m.invert().unwrap();
        let p = Point3::new(px, py, pz);
        let back = inv.transform_point(&m.transform_point(&p));
        prop_assert!((back - p).norm() < 1e-8);
    }

    #[test]
    fn test_multiply_matches_sequential_application(
        ax in -3.14f64..3.14, sx in 0.2f64..5.0,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let a = make_affine((ax, 0.0, 0.0), (sx, 1.0, 1.0), (4.0, 0.0, -1.0));
        let b = make_affine((0.0, ax, 0.5), (1.0, sx, 2.0), (0.0, 3.0, 0.0));
        let p = Point3::new(px, py, pz);
        let sequential = a.transform_point(&b.transform_point(&p));
        let composed = a.multiply(&b).transform_point(&p);
        prop_assert!((sequential - composed).norm() < 1e-8);
    }
}

#[test]
fn test_identity_file_scenario() {
    let t = parse_matrix("1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1", "xfm.txt").unwrap();
    assert_eq!(t, AffineTransform::identity());
}

#[test]
fn test_display_reparses() {
    let m = make_affine((0.3, -0.2, 1.1), (1.5, 0.8, 2.0), (12.25, -3.5, 0.0));
    let reparsed = parse_matrix(&m.to_string(), "display").unwrap();
    assert_eq!(reparsed, m);
}

#[test]
fn test_scaling_inverse() {
    let s = AffineTransform::scaling(&Spacing3::new(2.0, 4.0, 0.5));
    let inv = s.invert().unwrap();
    assert_eq!(inv.get(0, 0), 0.5);
    assert_eq!(inv.get(1, 1), 0.25);
    assert_eq!(inv.get(2, 2), 2.0);
}

#[test]
fn test_rank_deficient_is_singular() {
    // third row is the sum of the first two
    let m = AffineTransform::from_rows([
        [1.0, 2.0, 3.0, 0.0],
        [0.0, 1.0, 4.0, 0.0],
        [1.0, 3.0, 7.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    assert!(matches!(m.invert(), Err(ResliceError::SingularMatrix(_))));
}
