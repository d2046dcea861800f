use crate::error::PoseError;
use crate::keypoint::{Pose3D, JOINT_COUNT};
use crate::skeleton::{BoneLengthCache, BoneList};
use base::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the reconstructed root lands in target space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Root pinned to the bind-pose root every frame.
    #[default]
    FixedAtTargetRoot,
    /// Root follows the raw root, shifted by a delta measured at calibration.
    TranslatedByCalibratedDelta,
}

/// An extra joint placed along an existing bone instead of being a rigid bone
/// itself, e.g. a hand aim target past the wrist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafDecoration {
    /// Output slot. Must not be covered by the bone list, and must be below
    /// 17 plus the number of decorations.
    pub joint: usize,
    /// Index into the bone list.
    pub bone: usize,
    /// Offset from the bone's child, in units of that bone's length.
    pub multiplier: f32,
}

/// Per-axis stretch then offset: `p * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasCorrection {
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub offset: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for BiasCorrection {
    fn default() -> Self {
        Self {
            scale: unit_scale(),
            offset: [0.0; 3],
        }
    }
}

impl BiasCorrection {
    pub fn apply(&self, point: Vec3<f32>) -> Vec3<f32> {
        point * Vec3::from(self.scale) + Vec3::from(self.offset)
    }

    fn is_finite(&self) -> bool {
        self.scale.iter().chain(self.offset.iter()).all(|v| v.is_finite())
    }
}

/// Cosmetic corrections keyed by output joint id.
pub type BiasCorrectionTable = BTreeMap<usize, BiasCorrection>;

/// Output of one retarget pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Retargeted {
    /// Reconstructed joints. At least 17 slots, more when decorations add some.
    pub joints: Vec<Vec3<f32>>,
    /// Bones whose raw direction was undefined this frame.
    pub degenerate_bones: Vec<usize>,
}

pub struct RetargeterBuilder {
    bones: BoneList,
    cache: Option<BoneLengthCache>,
    anchor_policy: AnchorPolicy,
    decorations: Vec<LeafDecoration>,
    bias: BiasCorrectionTable,
    epsilon: f32,
}

impl RetargeterBuilder {
    pub fn new(bones: BoneList) -> Self {
        Self {
            bones,
            cache: None,
            anchor_policy: AnchorPolicy::default(),
            decorations: Vec::new(),
            bias: BiasCorrectionTable::new(),
            epsilon: 1e-6,
        }
    }

    pub fn with_bone_lengths(mut self, cache: BoneLengthCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Measure the bone lengths from a target bind pose.
    pub fn bind_rest_pose(mut self, rest_pose: &[Vec3<f32>]) -> Result<Self, PoseError> {
        self.cache = Some(BoneLengthCache::bind(rest_pose, &self.bones)?);
        Ok(self)
    }

    pub fn with_anchor_policy(mut self, policy: AnchorPolicy) -> Self {
        self.anchor_policy = policy;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<LeafDecoration>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_bias_corrections(mut self, bias: BiasCorrectionTable) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_degenerate_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn build(self) -> Result<Retargeter, PoseError> {
        let cache = self.cache.ok_or(PoseError::MissingBoneLengthCache)?;
        if !cache.is_bound_to(&self.bones) {
            return Err(PoseError::BoneLengthCacheMismatch);
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(PoseError::InvalidConfig(format!(
                "degenerate epsilon must be positive, got {}",
                self.epsilon
            )));
        }

        // Decoration slots are packed right after the pose joints
        let slot_limit = JOINT_COUNT + self.decorations.len();
        let mut joint_count = JOINT_COUNT;
        for (i, decoration) in self.decorations.iter().enumerate() {
            if decoration.joint >= slot_limit {
                return Err(PoseError::JointOutOfRange {
                    joint: decoration.joint,
                    count: slot_limit,
                });
            }
            if decoration.bone >= self.bones.len() {
                return Err(PoseError::InvalidDecoration(format!(
                    "joint {} references bone {}, only {} bones",
                    decoration.joint,
                    decoration.bone,
                    self.bones.len()
                )));
            }
            if self.bones.covers(decoration.joint) {
                return Err(PoseError::InvalidDecoration(format!(
                    "joint {} is already placed by the bone list",
                    decoration.joint
                )));
            }
            if self.decorations[..i].iter().any(|d| d.joint == decoration.joint) {
                return Err(PoseError::InvalidDecoration(format!(
                    "joint {} is decorated twice",
                    decoration.joint
                )));
            }
            if !decoration.multiplier.is_finite() {
                return Err(PoseError::InvalidDecoration(format!(
                    "joint {} has a non-finite multiplier",
                    decoration.joint
                )));
            }
            joint_count = joint_count.max(decoration.joint + 1);
        }

        for (&joint, correction) in &self.bias {
            if joint >= joint_count {
                return Err(PoseError::JointOutOfRange {
                    joint,
                    count: joint_count,
                });
            }
            if !correction.is_finite() {
                return Err(PoseError::InvalidConfig(format!(
                    "bias correction for joint {joint} is not finite"
                )));
            }
        }

        let previous_directions = vec![None; self.bones.len()];
        Ok(Retargeter {
            bones: self.bones,
            cache,
            anchor_policy: self.anchor_policy,
            root_delta: None,
            decorations: self.decorations,
            bias: self.bias,
            epsilon: self.epsilon,
            previous_directions,
            joint_count,
        })
    }
}

/// Rebuilds a raw pose on the target's bone lengths, keeping every bone's
/// direction from the raw pose.
#[derive(Debug, Clone)]
pub struct Retargeter {
    bones: BoneList,
    cache: BoneLengthCache,
    anchor_policy: AnchorPolicy,
    root_delta: Option<Vec3<f32>>,
    decorations: Vec<LeafDecoration>,
    bias: BiasCorrectionTable,
    epsilon: f32,
    previous_directions: Vec<Option<Vec3<f32>>>,
    joint_count: usize,
}

impl Retargeter {
    pub fn builder(bones: BoneList) -> RetargeterBuilder {
        RetargeterBuilder::new(bones)
    }

    pub fn bones(&self) -> &BoneList {
        &self.bones
    }

    pub fn bone_lengths(&self) -> &BoneLengthCache {
        &self.cache
    }

    pub fn anchor_policy(&self) -> AnchorPolicy {
        self.anchor_policy
    }

    /// Number of slots in every output.
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// Measure the delta that maps this raw root onto the target root.
    pub fn calibrate_root(&mut self, raw: &Pose3D) {
        let delta = self.cache.rest_root() - raw[self.bones.root()];
        log::debug!("retarget: root delta calibrated to {:?}", delta);
        self.root_delta = Some(delta);
    }

    pub fn root_delta(&self) -> Option<Vec3<f32>> {
        self.root_delta
    }

    /// Where the root goes for this raw pose. Under
    /// `TranslatedByCalibratedDelta` an uncalibrated retargeter calibrates on
    /// the first pose it sees.
    pub fn root_anchor(&mut self, raw: &Pose3D) -> Vec3<f32> {
        match self.anchor_policy {
            AnchorPolicy::FixedAtTargetRoot => self.cache.rest_root(),
            AnchorPolicy::TranslatedByCalibratedDelta => {
                if self.root_delta.is_none() {
                    self.calibrate_root(raw);
                }
                raw[self.bones.root()] + self.root_delta.unwrap_or_default()
            }
        }
    }

    pub fn retarget(&mut self, raw: &Pose3D) -> Retargeted {
        let anchor = self.root_anchor(raw);
        self.reconstruct(raw, anchor)
    }

    /// Retarget with a caller-supplied root position. The anchor is ignored
    /// under `FixedAtTargetRoot`.
    pub fn retarget_with_anchor(&mut self, raw: &Pose3D, anchor: Vec3<f32>) -> Retargeted {
        let anchor = match self.anchor_policy {
            AnchorPolicy::FixedAtTargetRoot => self.cache.rest_root(),
            AnchorPolicy::TranslatedByCalibratedDelta => anchor,
        };
        self.reconstruct(raw, anchor)
    }

    fn reconstruct(&mut self, raw: &Pose3D, anchor: Vec3<f32>) -> Retargeted {
        let root = self.bones.root();
        let mut joints = vec![Vec3::zero(); self.joint_count];
        let mut directions = Vec::with_capacity(self.bones.len());
        let mut degenerate_bones = Vec::new();

        joints[root] = anchor;
        for (index, bone) in self.bones.bones().iter().enumerate() {
            let delta = raw[bone.child] - raw[bone.parent];
            let direction = match delta.try_normalized(self.epsilon) {
                Some(direction) => {
                    self.previous_directions[index] = Some(direction);
                    direction
                }
                None => {
                    degenerate_bones.push(index);
                    self.previous_directions[index]
                        .or_else(|| self.cache.rest_direction(index))
                        .unwrap_or(Vec3::new(0.0, 1.0, 0.0))
                }
            };
            let length = self.cache.length(index).unwrap_or(0.0);
            joints[bone.child] = joints[bone.parent] + direction * length;
            directions.push(direction);
        }
        if !degenerate_bones.is_empty() {
            log::debug!(
                "retarget: degenerate bones {:?} reused previous direction",
                degenerate_bones
            );
        }

        // Joints outside the hierarchy keep their raw offset from the root
        for joint in 0..JOINT_COUNT {
            if !self.bones.covers(joint) && !self.decorations.iter().any(|d| d.joint == joint) {
                joints[joint] = anchor + (raw[joint] - raw[root]);
            }
        }

        for decoration in &self.decorations {
            let bone = self.bones.bones()[decoration.bone];
            let length = self.cache.length(decoration.bone).unwrap_or(0.0);
            joints[decoration.joint] =
                joints[bone.child] + directions[decoration.bone] * (length * decoration.multiplier);
        }

        for (&joint, correction) in &self.bias {
            joints[joint] = correction.apply(joints[joint]);
        }

        Retargeted {
            joints,
            degenerate_bones,
        }
    }

    /// Forget per-bone direction history and the root calibration.
    pub fn reset(&mut self) {
        self.previous_directions.iter_mut().for_each(|d| *d = None);
        self.root_delta = None;
    }

    /// Bind a new target skeleton. History is cleared since the old directions
    /// and root delta belong to the previous body.
    pub fn rebind(&mut self, rest_pose: &[Vec3<f32>]) -> Result<(), PoseError> {
        self.cache = BoneLengthCache::bind(rest_pose, &self.bones)?;
        self.reset();
        log::info!("retarget: rebound {} bones", self.cache.len());
        Ok(())
    }
}
