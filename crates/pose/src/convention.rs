use crate::error::PoseError;
use crate::keypoint::{CocoJoint as C, H36mJoint as H, Pose2D, JOINT_COUNT};
use base::Vec2;
use serde::{Deserialize, Serialize};

/// Where one target joint comes from.
///
/// Serialized externally tagged, e.g. `{"source": 12}` or
/// `{"source_midpoint": [11, 12]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointSource {
    /// Copy a source joint.
    Source(usize),
    /// Midpoint of two source joints.
    SourceMidpoint(usize, usize),
    /// Midpoint of two target joints. Evaluated after every `Source*` entry,
    /// in table order.
    TargetMidpoint(usize, usize),
}

/// Declarative source → target joint mapping, one entry per target slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConventionTable {
    entries: Vec<JointSource>,
}

impl Default for ConventionTable {
    fn default() -> Self {
        Self::coco_to_h36m()
    }
}

impl ConventionTable {
    pub fn new(entries: Vec<JointSource>) -> Result<Self, PoseError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Detector (COCO) order to lifter (H36M) order.
    pub fn coco_to_h36m() -> Self {
        use JointSource::*;
        let mut entries = vec![Source(0); JOINT_COUNT];
        let mut set = |target: H, source: JointSource| entries[target as usize] = source;
        set(H::Root, SourceMidpoint(C::LeftHip as usize, C::RightHip as usize));
        set(H::RightHip, Source(C::RightHip as usize));
        set(H::RightKnee, Source(C::RightKnee as usize));
        set(H::RightAnkle, Source(C::RightAnkle as usize));
        set(H::LeftHip, Source(C::LeftHip as usize));
        set(H::LeftKnee, Source(C::LeftKnee as usize));
        set(H::LeftAnkle, Source(C::LeftAnkle as usize));
        set(H::Belly, TargetMidpoint(H::Root as usize, H::Neck as usize));
        set(H::Neck, SourceMidpoint(C::LeftShoulder as usize, C::RightShoulder as usize));
        set(H::Nose, Source(C::Nose as usize));
        set(H::Head, SourceMidpoint(C::LeftEye as usize, C::RightEye as usize));
        set(H::LeftShoulder, Source(C::LeftShoulder as usize));
        set(H::LeftElbow, Source(C::LeftElbow as usize));
        set(H::LeftWrist, Source(C::LeftWrist as usize));
        set(H::RightShoulder, Source(C::RightShoulder as usize));
        set(H::RightElbow, Source(C::RightElbow as usize));
        set(H::RightWrist, Source(C::RightWrist as usize));
        Self { entries }
    }

    pub fn entries(&self) -> &[JointSource] {
        &self.entries
    }

    /// Check the table once at setup: every index in range, and every
    /// `TargetMidpoint` only reads targets that are already computed when it runs.
    pub fn validate(&self) -> Result<(), PoseError> {
        if self.entries.len() != JOINT_COUNT {
            return Err(PoseError::InvalidConventionTable(format!(
                "expected {JOINT_COUNT} entries, got {}",
                self.entries.len()
            )));
        }

        let check_source = |target: usize, source: usize| {
            if source >= JOINT_COUNT {
                return Err(PoseError::InvalidConventionTable(format!(
                    "target {target} reads source joint {source}, out of range"
                )));
            }
            Ok(())
        };

        for (target, entry) in self.entries.iter().enumerate() {
            match *entry {
                JointSource::Source(a) => check_source(target, a)?,
                JointSource::SourceMidpoint(a, b) => {
                    check_source(target, a)?;
                    check_source(target, b)?;
                }
                JointSource::TargetMidpoint(a, b) => {
                    for dep in [a, b] {
                        let ready = match self.entries.get(dep) {
                            None => false,
                            Some(JointSource::TargetMidpoint(..)) => dep < target,
                            Some(_) => true,
                        };
                        if !ready {
                            return Err(PoseError::InvalidConventionTable(format!(
                                "target {target} reads target {dep} before it is computed"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Remaps joint positions between conventions. Confidence is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct JointConventionMapper {
    table: ConventionTable,
}

impl JointConventionMapper {
    pub fn new(table: ConventionTable) -> Result<Self, PoseError> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &ConventionTable {
        &self.table
    }

    pub fn map(&self, pose: &Pose2D) -> [Vec2<f32>; JOINT_COUNT] {
        let src = |i: usize| pose[i].position;
        let mut out = [Vec2::zero(); JOINT_COUNT];

        for (target, entry) in self.table.entries.iter().enumerate() {
            match *entry {
                JointSource::Source(a) => out[target] = src(a),
                JointSource::SourceMidpoint(a, b) => out[target] = src(a).midpoint(src(b)),
                JointSource::TargetMidpoint(..) => {}
            }
        }
        for (target, entry) in self.table.entries.iter().enumerate() {
            if let JointSource::TargetMidpoint(a, b) = *entry {
                out[target] = out[a].midpoint(out[b]);
            }
        }

        out
    }
}
