use crate::convention::ConventionTable;
use crate::error::PoseError;
use crate::retarget::{AnchorPolicy, BiasCorrectionTable, LeafDecoration};
use crate::rig::RigTargetConfig;
use crate::skeleton::{h36m_bones, BoneSpec};
use base::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the pipeline needs besides the target skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum detector score, in [0, 1].
    #[serde(default = "default_detection_confidence_threshold")]
    pub detection_confidence_threshold: f32,
    /// IoU above which a lower-scored box is suppressed, in [0, 1].
    #[serde(default = "default_nms_iou_threshold")]
    pub nms_iou_threshold: f32,
    /// Side of the square detector input in pixels.
    #[serde(default = "default_input_resolution")]
    pub input_resolution: u32,
    #[serde(default)]
    pub joint_convention_table: ConventionTable,
    /// Root-to-leaf bone order.
    #[serde(default = "h36m_bones")]
    pub bone_list: Vec<BoneSpec>,
    #[serde(default)]
    pub root_joint: usize,
    #[serde(default)]
    pub anchor_policy: AnchorPolicy,
    #[serde(default)]
    pub bias_correction_table: BiasCorrectionTable,
    #[serde(default)]
    pub leaf_decorations: Vec<LeafDecoration>,
    /// Bones shorter than this in the raw pose have no usable direction.
    #[serde(default = "default_degenerate_epsilon")]
    pub degenerate_epsilon: f32,
    #[serde(default)]
    pub rig_targets: RigTargetConfig,
}

fn default_detection_confidence_threshold() -> f32 {
    0.5
}

fn default_nms_iou_threshold() -> f32 {
    0.45
}

fn default_input_resolution() -> u32 {
    320
}

fn default_degenerate_epsilon() -> f32 {
    1e-6
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_confidence_threshold: default_detection_confidence_threshold(),
            nms_iou_threshold: default_nms_iou_threshold(),
            input_resolution: default_input_resolution(),
            joint_convention_table: ConventionTable::default(),
            bone_list: h36m_bones(),
            root_joint: 0,
            anchor_policy: AnchorPolicy::default(),
            bias_correction_table: BiasCorrectionTable::new(),
            leaf_decorations: Vec::new(),
            degenerate_epsilon: default_degenerate_epsilon(),
            rig_targets: RigTargetConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PoseError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, PoseError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks on the scalar settings. Structural checks (bone order,
    /// convention table, decorations) happen when the pipeline is built.
    pub fn validate(&self) -> Result<(), PoseError> {
        for (name, value) in [
            ("detection_confidence_threshold", self.detection_confidence_threshold),
            ("nms_iou_threshold", self.nms_iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.input_resolution == 0 {
            return Err(PoseError::InvalidConfig(
                "input_resolution must be positive".to_string(),
            ));
        }
        if !(self.degenerate_epsilon.is_finite() && self.degenerate_epsilon > 0.0) {
            return Err(PoseError::InvalidConfig(format!(
                "degenerate_epsilon must be positive, got {}",
                self.degenerate_epsilon
            )));
        }
        Ok(())
    }
}

/// Bind-pose joint positions of the avatar being driven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSkeleton {
    pub rest_pose: Vec<[f32; 3]>,
}

impl TargetSkeleton {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PoseError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn rest_pose(&self) -> Vec<Vec3<f32>> {
        self.rest_pose.iter().copied().map(Vec3::from).collect()
    }
}
