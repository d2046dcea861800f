use base::{Vec2, Vec3};

/// Number of joints in both the detector and the lifter conventions.
pub const JOINT_COUNT: usize = 17;

/// A single 2D joint with its detector confidence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoint {
    pub position: Vec2<f32>,
    /// Raw confidence channel from the detector. Only used for gating.
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            confidence,
        }
    }
}

/// 17 joints indexed by joint id. The convention decides what each slot means.
pub type Pose2D = [Keypoint; JOINT_COUNT];

/// 17 lifted joints indexed by joint id.
pub type Pose3D = [Vec3<f32>; JOINT_COUNT];

/// COCO keypoint order produced by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum CocoJoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl CocoJoint {
    pub const ALL: [CocoJoint; JOINT_COUNT] = [
        CocoJoint::Nose,
        CocoJoint::LeftEye,
        CocoJoint::RightEye,
        CocoJoint::LeftEar,
        CocoJoint::RightEar,
        CocoJoint::LeftShoulder,
        CocoJoint::RightShoulder,
        CocoJoint::LeftElbow,
        CocoJoint::RightElbow,
        CocoJoint::LeftWrist,
        CocoJoint::RightWrist,
        CocoJoint::LeftHip,
        CocoJoint::RightHip,
        CocoJoint::LeftKnee,
        CocoJoint::RightKnee,
        CocoJoint::LeftAnkle,
        CocoJoint::RightAnkle,
    ];
}

impl From<CocoJoint> for usize {
    fn from(joint: CocoJoint) -> usize {
        joint as usize
    }
}

impl TryFrom<usize> for CocoJoint {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value)
            .copied()
            .ok_or_else(|| format!("Invalid COCO joint index: {}. Must be in range 0-16.", value))
    }
}

/// Human3.6M joint order consumed and produced by the lifter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum H36mJoint {
    Root = 0,
    RightHip = 1,
    RightKnee = 2,
    RightAnkle = 3,
    LeftHip = 4,
    LeftKnee = 5,
    LeftAnkle = 6,
    Belly = 7,
    Neck = 8,
    Nose = 9,
    Head = 10,
    LeftShoulder = 11,
    LeftElbow = 12,
    LeftWrist = 13,
    RightShoulder = 14,
    RightElbow = 15,
    RightWrist = 16,
}

impl H36mJoint {
    pub const ALL: [H36mJoint; JOINT_COUNT] = [
        H36mJoint::Root,
        H36mJoint::RightHip,
        H36mJoint::RightKnee,
        H36mJoint::RightAnkle,
        H36mJoint::LeftHip,
        H36mJoint::LeftKnee,
        H36mJoint::LeftAnkle,
        H36mJoint::Belly,
        H36mJoint::Neck,
        H36mJoint::Nose,
        H36mJoint::Head,
        H36mJoint::LeftShoulder,
        H36mJoint::LeftElbow,
        H36mJoint::LeftWrist,
        H36mJoint::RightShoulder,
        H36mJoint::RightElbow,
        H36mJoint::RightWrist,
    ];
}

impl From<H36mJoint> for usize {
    fn from(joint: H36mJoint) -> usize {
        joint as usize
    }
}

impl TryFrom<usize> for H36mJoint {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value)
            .copied()
            .ok_or_else(|| format!("Invalid H36M joint index: {}. Must be in range 0-16.", value))
    }
}
