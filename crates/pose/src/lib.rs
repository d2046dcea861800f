pub mod config;
pub mod convention;
pub mod decode;
pub mod error;
pub mod gate;
pub mod keypoint;
pub mod lifter;
pub mod normalize;
pub mod pipeline;
pub mod retarget;
pub mod rig;
pub mod skeleton;

pub use config::{PipelineConfig, TargetSkeleton};
pub use convention::{ConventionTable, JointConventionMapper, JointSource};
pub use decode::{iou, nms, Candidate, DetectionDecoder, DETECTOR_FEATURES};
pub use error::{FrameFault, PoseError};
pub use gate::{GateDecision, PoseHoldGate};
pub use keypoint::{CocoJoint, H36mJoint, Keypoint, Pose2D, Pose3D, JOINT_COUNT};
pub use lifter::{lifter_input, parse_lifter_output, Lifter, LIFTER_SHAPE};
pub use normalize::PoseNormalizer;
pub use pipeline::{FrameOutcome, Pipeline};
pub use retarget::{
    AnchorPolicy, BiasCorrection, BiasCorrectionTable, LeafDecoration, Retargeted, Retargeter,
    RetargeterBuilder,
};
pub use rig::{RigTargetConfig, RigTargets};
pub use skeleton::{h36m_bones, BoneLengthCache, BoneList, BoneSpec};
