use base::Vec3;

#[test]
fn test_sub_and_length() {
    let a = Vec3::new(1.0f32, 2.0, 3.0);
    let b = Vec3::new(4.0f32, 6.0, 3.0);
    assert_eq!(b - a, Vec3::new(3.0, 4.0, 0.0));
    assert!(((b - a).length() - 5.0).abs() < 1e-6);
    assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
}

#[test]
fn test_normalized_unit_length() {
    let v = Vec3::new(0.0f32, 3.0, 4.0).normalized();
    assert!((v.length() - 1.0).abs() < 1e-6);
    assert!((v.y - 0.6).abs() < 1e-6);
}

#[test]
fn test_try_normalized_rejects_tiny_vectors() {
    assert!(Vec3::new(1e-8f32, 0.0, 0.0).try_normalized(1e-6).is_none());
    assert!(Vec3::<f32>::zero().try_normalized(1e-6).is_none());
    let v = Vec3::new(2.0f32, 0.0, 0.0).try_normalized(1e-6).unwrap();
    assert_eq!(v, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_component_wise_mul() {
    let v = Vec3::new(1.0f32, 2.0, 3.0) * Vec3::new(2.0, 0.5, -1.0);
    assert_eq!(v, Vec3::new(2.0, 1.0, -3.0));
}

#[test]
fn test_midpoint() {
    let m = Vec3::new(0.0f32, 0.0, 0.0).midpoint(Vec3::new(2.0, 4.0, -2.0));
    assert_eq!(m, Vec3::new(1.0, 2.0, -1.0));
}

#[test]
fn test_angle_to_right_angle() {
    let a = Vec3::new(1.0f32, 0.0, 0.0);
    let b = Vec3::new(0.0f32, 5.0, 0.0);
    assert!((a.angle_to(b) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn test_array_conversion() {
    let v: Vec3<f32> = [1.0, 2.0, 3.0].into();
    let back: [f32; 3] = v.into();
    assert_eq!(back, [1.0, 2.0, 3.0]);
}
