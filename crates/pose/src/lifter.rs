use crate::error::{FrameFault, PoseError};
use crate::keypoint::{Pose3D, JOINT_COUNT};
use base::{Tensor, Vec2, Vec3};

/// Lifter input and output shape: batch, frame, joint, xyz.
pub const LIFTER_SHAPE: [usize; 4] = [1, 1, JOINT_COUNT, 3];

/// The external 2D → 3D lifting model.
///
/// Input is `[1, 1, 17, 3]` in lifter joint order with normalized x/y.
/// Output must be `[1, 1, 17, 3]` lifted positions.
pub trait Lifter {
    fn lift(&mut self, input: &Tensor<f32>) -> Result<Tensor<f32>, PoseError>;
}

impl<F> Lifter for F
where
    F: FnMut(&Tensor<f32>) -> Result<Tensor<f32>, PoseError>,
{
    fn lift(&mut self, input: &Tensor<f32>) -> Result<Tensor<f32>, PoseError> {
        self(input)
    }
}

/// Pack normalized joints into the lifter input tensor. The third channel is
/// fixed at 1.0 since detector confidence is not carried past decoding.
pub fn lifter_input(joints: &[Vec2<f32>; JOINT_COUNT]) -> Result<Tensor<f32>, PoseError> {
    let data = joints
        .iter()
        .flat_map(|joint| [joint.x, joint.y, 1.0])
        .collect();
    Ok(Tensor::new(LIFTER_SHAPE.to_vec(), data)?)
}

/// Validate the lifter output shape and values and unpack it.
pub fn parse_lifter_output(output: &Tensor<f32>) -> Result<Pose3D, FrameFault> {
    if !output.has_shape(&LIFTER_SHAPE) || output.len() != JOINT_COUNT * 3 {
        return Err(FrameFault::MalformedLifterOutput {
            expected: format!("{:?}", LIFTER_SHAPE),
            got: format!("{:?}", output.shape),
        });
    }
    if let Some(index) = output.data.iter().position(|v| !v.is_finite()) {
        return Err(FrameFault::MalformedLifterOutput {
            expected: "finite values".to_string(),
            got: format!("non-finite value at joint {}", index / 3),
        });
    }

    let mut pose = [Vec3::zero(); JOINT_COUNT];
    for (joint, chunk) in pose.iter_mut().zip(output.data.chunks_exact(3)) {
        *joint = Vec3::new(chunk[0], chunk[1], chunk[2]);
    }
    Ok(pose)
}
