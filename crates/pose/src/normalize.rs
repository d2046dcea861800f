use crate::error::PoseError;
use crate::keypoint::JOINT_COUNT;
use base::Vec2;

/// Rescales pixel coordinates of the square detector input into the lifter's
/// centered range: `(v - D/2) / D`, so `0 → -0.5`, `D/2 → 0`, `D → 0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseNormalizer {
    resolution: u32,
}

impl PoseNormalizer {
    pub fn new(resolution: u32) -> Result<Self, PoseError> {
        if resolution == 0 {
            return Err(PoseError::InvalidConfig(
                "input resolution must be positive".to_string(),
            ));
        }
        Ok(Self { resolution })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn normalize_point(&self, point: Vec2<f32>) -> Vec2<f32> {
        let d = self.resolution as f32;
        Vec2::new((point.x - d / 2.0) / d, (point.y - d / 2.0) / d)
    }

    pub fn denormalize_point(&self, point: Vec2<f32>) -> Vec2<f32> {
        let d = self.resolution as f32;
        Vec2::new(point.x * d + d / 2.0, point.y * d + d / 2.0)
    }

    pub fn normalize(&self, joints: &[Vec2<f32>; JOINT_COUNT]) -> [Vec2<f32>; JOINT_COUNT] {
        joints.map(|joint| self.normalize_point(joint))
    }
}
