#![allow(dead_code)]

use base::{Tensor, Vec3};
use pose::{DETECTOR_FEATURES, JOINT_COUNT, LIFTER_SHAPE, Pose3D};

/// A standing avatar in H36M joint order, y up, metres.
pub fn rest_pose_h36m() -> Vec<Vec3<f32>> {
    [
        [0.0, 1.0, 0.0],
        [-0.1, 1.0, 0.0],
        [-0.1, 0.55, 0.0],
        [-0.1, 0.1, 0.0],
        [0.1, 1.0, 0.0],
        [0.1, 0.55, 0.0],
        [0.1, 0.1, 0.0],
        [0.0, 1.25, 0.0],
        [0.0, 1.5, 0.0],
        [0.0, 1.6, 0.08],
        [0.0, 1.72, 0.0],
        [0.18, 1.48, 0.0],
        [0.45, 1.48, 0.0],
        [0.7, 1.48, 0.0],
        [-0.18, 1.48, 0.0],
        [-0.45, 1.48, 0.0],
        [-0.7, 1.48, 0.0],
    ]
    .into_iter()
    .map(Vec3::from)
    .collect()
}

/// Deterministic pseudo-random pose with coordinates in [-1, 1].
pub fn scrambled_pose(seed: u64) -> Pose3D {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
    };
    let mut pose = [Vec3::zero(); JOINT_COUNT];
    for joint in pose.iter_mut() {
        *joint = Vec3::new(next(), next(), next());
    }
    pose
}

/// Wrap a lifted pose as a `[1, 1, 17, 3]` tensor.
pub fn lifted_tensor(pose: &Pose3D) -> Tensor<f32> {
    let data = pose.iter().flat_map(|j| [j.x, j.y, j.z]).collect();
    Tensor::new(LIFTER_SHAPE.to_vec(), data).unwrap()
}

/// Build a `[1, 56, A]` detector output. Each box is `[cx, cy, w, h, score]`;
/// `joint(anchor, joint)` gives that anchor's `[x, y, confidence]`.
pub fn detector_output(boxes: &[[f32; 5]], joint: impl Fn(usize, usize) -> [f32; 3]) -> Tensor<f32> {
    let n = boxes.len();
    let mut data = vec![0.0f32; DETECTOR_FEATURES * n];
    for (anchor, values) in boxes.iter().enumerate() {
        for (row, value) in values.iter().enumerate() {
            data[row * n + anchor] = *value;
        }
        for j in 0..JOINT_COUNT {
            let [x, y, c] = joint(anchor, j);
            let base = 5 + j * 3;
            data[base * n + anchor] = x;
            data[(base + 1) * n + anchor] = y;
            data[(base + 2) * n + anchor] = c;
        }
    }
    Tensor::new(vec![1, DETECTOR_FEATURES, n], data).unwrap()
}

/// Joints laid out on a grid so every anchor and joint is distinguishable.
pub fn grid_joint(anchor: usize, joint: usize) -> [f32; 3] {
    [100.0 + anchor as f32 * 20.0 + joint as f32, 50.0 + joint as f32 * 10.0, 0.9]
}

pub fn assert_close(a: Vec3<f32>, b: Vec3<f32>, tolerance: f32) {
    assert!(
        (a - b).length() < tolerance,
        "expected {:?} within {} of {:?}",
        a,
        tolerance,
        b
    );
}
