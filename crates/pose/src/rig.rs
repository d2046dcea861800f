use crate::keypoint::H36mJoint as H;
use base::Vec3;
use serde::{Deserialize, Serialize};

/// Which reconstructed joints the rig driver uses as IK goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigTargetConfig {
    /// When cleared, no IK goals are produced and the rig keeps its own animation.
    pub enabled: bool,
    pub look_at: usize,
    pub left_hand: usize,
    pub right_hand: usize,
    pub left_foot: usize,
    pub right_foot: usize,
    /// Feet are only driven when set.
    pub lower_body: bool,
}

impl Default for RigTargetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            look_at: H::Nose as usize,
            left_hand: H::LeftWrist as usize,
            right_hand: H::RightWrist as usize,
            left_foot: H::LeftAnkle as usize,
            right_foot: H::RightAnkle as usize,
            lower_body: false,
        }
    }
}

/// IK goal positions handed to the external rig driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigTargets {
    pub look_at: Option<Vec3<f32>>,
    pub left_hand: Option<Vec3<f32>>,
    pub right_hand: Option<Vec3<f32>>,
    pub left_foot: Option<Vec3<f32>>,
    pub right_foot: Option<Vec3<f32>>,
}

impl RigTargetConfig {
    pub fn select(&self, joints: &[Vec3<f32>]) -> RigTargets {
        if !self.enabled {
            return RigTargets::default();
        }
        let at = |joint: usize| joints.get(joint).copied();
        let foot = |joint: usize| if self.lower_body { at(joint) } else { None };
        RigTargets {
            look_at: at(self.look_at),
            left_hand: at(self.left_hand),
            right_hand: at(self.right_hand),
            left_foot: foot(self.left_foot),
            right_foot: foot(self.right_foot),
        }
    }
}
