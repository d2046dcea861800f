use base::Vec2;
use pose::{lifter_input, PoseError, PoseNormalizer, JOINT_COUNT, LIFTER_SHAPE};

#[test]
fn test_normalize_reference_points() {
    let normalizer = PoseNormalizer::new(320).unwrap();
    assert_eq!(normalizer.normalize_point(Vec2::new(160.0, 160.0)), Vec2::new(0.0, 0.0));
    assert_eq!(normalizer.normalize_point(Vec2::new(0.0, 0.0)), Vec2::new(-0.5, -0.5));
    assert_eq!(normalizer.normalize_point(Vec2::new(320.0, 320.0)), Vec2::new(0.5, 0.5));
    assert_eq!(normalizer.normalize_point(Vec2::new(0.0, 320.0)), Vec2::new(-0.5, 0.5));
}

#[test]
fn test_denormalize_inverts() {
    let normalizer = PoseNormalizer::new(640).unwrap();
    let point = Vec2::new(123.0, 457.5);
    let back = normalizer.denormalize_point(normalizer.normalize_point(point));
    assert!((back.x - point.x).abs() < 1e-3);
    assert!((back.y - point.y).abs() < 1e-3);
}

#[test]
fn test_zero_resolution_rejected() {
    assert!(matches!(PoseNormalizer::new(0), Err(PoseError::InvalidConfig(_))));
}

#[test]
fn test_lifter_input_layout() {
    let normalizer = PoseNormalizer::new(320).unwrap();
    let joints: [Vec2<f32>; JOINT_COUNT] =
        std::array::from_fn(|i| Vec2::new(i as f32 * 16.0, 320.0 - i as f32 * 16.0));
    let input = lifter_input(&normalizer.normalize(&joints)).unwrap();

    assert!(input.has_shape(&LIFTER_SHAPE));
    for i in 0..JOINT_COUNT {
        let expected = normalizer.normalize_point(joints[i]);
        assert_eq!(input.data[i * 3], expected.x);
        assert_eq!(input.data[i * 3 + 1], expected.y);
        assert_eq!(input.data[i * 3 + 2], 1.0);
    }
}
