use crate::config::PipelineConfig;
use crate::convention::JointConventionMapper;
use crate::decode::DetectionDecoder;
use crate::error::{FrameFault, PoseError};
use crate::gate::{GateDecision, PoseHoldGate};
use crate::lifter::{lifter_input, parse_lifter_output, Lifter};
use crate::normalize::PoseNormalizer;
use crate::retarget::Retargeter;
use crate::rig::{RigTargetConfig, RigTargets};
use crate::skeleton::BoneList;
use base::{Tensor, Vec3};

/// Result of one call to [`Pipeline::process`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No fresh capture this tick; nothing ran.
    Skipped,
    /// A new pose was committed.
    Committed,
    /// The frame failed; the previous pose is still the output.
    Held(FrameFault),
}

/// Detector output → decode → map → normalize → lift → retarget → hold gate.
///
/// Every configuration check happens in [`Pipeline::new`]; once built, a frame
/// can only end in one of the [`FrameOutcome`] states.
pub struct Pipeline {
    decoder: DetectionDecoder,
    mapper: JointConventionMapper,
    normalizer: PoseNormalizer,
    retargeter: Retargeter,
    rig: RigTargetConfig,
    gate: PoseHoldGate<Vec<Vec3<f32>>>,
    frames: u64,
}

impl Pipeline {
    /// Validate `config` and bind the target skeleton.
    pub fn new(config: &PipelineConfig, rest_pose: &[Vec3<f32>]) -> Result<Self, PoseError> {
        config.validate()?;
        let decoder =
            DetectionDecoder::new(config.detection_confidence_threshold, config.nms_iou_threshold)?;
        let mapper = JointConventionMapper::new(config.joint_convention_table.clone())?;
        let normalizer = PoseNormalizer::new(config.input_resolution)?;
        let bones = BoneList::new(config.root_joint, config.bone_list.clone())?;
        let retargeter = Retargeter::builder(bones)
            .bind_rest_pose(rest_pose)?
            .with_anchor_policy(config.anchor_policy)
            .with_decorations(config.leaf_decorations.clone())
            .with_bias_corrections(config.bias_correction_table.clone())
            .with_degenerate_epsilon(config.degenerate_epsilon)
            .build()?;

        log::info!(
            "pipeline: {} bones, resolution {}, score threshold {}, IoU threshold {}, {:?}",
            retargeter.bones().len(),
            normalizer.resolution(),
            decoder.score_threshold(),
            decoder.iou_threshold(),
            retargeter.anchor_policy()
        );

        Ok(Self {
            decoder,
            mapper,
            normalizer,
            retargeter,
            rig: config.rig_targets,
            gate: PoseHoldGate::new(),
            frames: 0,
        })
    }

    /// Run one frame. `frame` is `None` when the capture source had nothing new,
    /// in which case nothing runs and the held pose is untouched.
    pub fn process(&mut self, frame: Option<&Tensor<f32>>, lifter: &mut dyn Lifter) -> FrameOutcome {
        let Some(detector_output) = frame else {
            return FrameOutcome::Skipped;
        };
        self.frames += 1;

        let result = self.run_frame(detector_output, lifter);
        match self.gate.offer(result) {
            GateDecision::Committed => FrameOutcome::Committed,
            GateDecision::Held(fault) => {
                match &fault {
                    FrameFault::NoDetection => {
                        log::debug!("frame {}: held, {}", self.frames, fault)
                    }
                    _ => log::warn!("frame {}: held, {}", self.frames, fault),
                }
                FrameOutcome::Held(fault)
            }
        }
    }

    fn run_frame(
        &mut self,
        detector_output: &Tensor<f32>,
        lifter: &mut dyn Lifter,
    ) -> Result<Vec<Vec3<f32>>, FrameFault> {
        let detection = self.decoder.decode(detector_output)?;
        let mapped = self.mapper.map(&detection.keypoints);
        let normalized = self.normalizer.normalize(&mapped);
        let input =
            lifter_input(&normalized).map_err(|e| FrameFault::LifterFailed(e.to_string()))?;
        let output = lifter
            .lift(&input)
            .map_err(|e| FrameFault::LifterFailed(e.to_string()))?;
        let raw = parse_lifter_output(&output)?;
        Ok(self.retargeter.retarget(&raw).joints)
    }

    /// The pose to hand to the rig driver, `None` until the first commit.
    pub fn committed(&self) -> Option<&[Vec3<f32>]> {
        self.gate.held().map(Vec::as_slice)
    }

    pub fn rig_targets(&self) -> Option<RigTargets> {
        self.committed().map(|joints| self.rig.select(joints))
    }

    pub fn retargeter(&self) -> &Retargeter {
        &self.retargeter
    }

    /// Frames that had a fresh capture.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Bind a new target skeleton. The held pose belongs to the old body and is dropped.
    pub fn rebind(&mut self, rest_pose: &[Vec3<f32>]) -> Result<(), PoseError> {
        self.retargeter.rebind(rest_pose)?;
        self.gate.clear();
        Ok(())
    }
}
