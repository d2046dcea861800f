use crate::error::PoseError;
use crate::keypoint::{H36mJoint as H, JOINT_COUNT};
use base::Vec3;
use serde::{Deserialize, Serialize};

/// A rigid parent → child joint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoneSpec {
    pub parent: usize,
    pub child: usize,
}

impl BoneSpec {
    pub const fn new(parent: usize, child: usize) -> Self {
        Self { parent, child }
    }
}

/// The 16-bone H36M hierarchy, depth first from the root.
pub fn h36m_bones() -> Vec<BoneSpec> {
    let bone = |parent: H, child: H| BoneSpec::new(parent as usize, child as usize);
    vec![
        bone(H::Root, H::RightHip),
        bone(H::RightHip, H::RightKnee),
        bone(H::RightKnee, H::RightAnkle),
        bone(H::Root, H::LeftHip),
        bone(H::LeftHip, H::LeftKnee),
        bone(H::LeftKnee, H::LeftAnkle),
        bone(H::Root, H::Belly),
        bone(H::Belly, H::Neck),
        bone(H::Neck, H::Nose),
        bone(H::Nose, H::Head),
        bone(H::Neck, H::LeftShoulder),
        bone(H::LeftShoulder, H::LeftElbow),
        bone(H::LeftElbow, H::LeftWrist),
        bone(H::Neck, H::RightShoulder),
        bone(H::RightShoulder, H::RightElbow),
        bone(H::RightElbow, H::RightWrist),
    ]
}

/// Bones in an order where every parent is reconstructed before its children.
///
/// Only obtainable through [`BoneList::new`], which runs the range and
/// topological checks, so holding one means every joint id is below 17 and the
/// ordering is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneList {
    root: usize,
    bones: Vec<BoneSpec>,
    joint_count: usize,
}

impl BoneList {
    pub fn new(root: usize, bones: Vec<BoneSpec>) -> Result<Self, PoseError> {
        if let Some(joint) = bones
            .iter()
            .flat_map(|bone| [bone.parent, bone.child])
            .chain(std::iter::once(root))
            .find(|&joint| joint >= JOINT_COUNT)
        {
            return Err(PoseError::JointOutOfRange {
                joint,
                count: JOINT_COUNT,
            });
        }

        let joint_count = bones
            .iter()
            .flat_map(|bone| [bone.parent, bone.child])
            .chain(std::iter::once(root))
            .max()
            .map_or(0, |max| max + 1);

        let mut placed = vec![false; joint_count];
        placed[root] = true;
        for (index, bone) in bones.iter().enumerate() {
            if !placed[bone.parent] {
                return Err(PoseError::InvalidBoneListOrdering {
                    bone: index,
                    parent: bone.parent,
                });
            }
            if placed[bone.child] {
                return Err(PoseError::DuplicateBoneChild {
                    bone: index,
                    child: bone.child,
                });
            }
            placed[bone.child] = true;
        }

        Ok(Self {
            root,
            bones,
            joint_count,
        })
    }

    /// The default H36M hierarchy rooted at the pelvis.
    pub fn h36m() -> Self {
        Self {
            root: H::Root as usize,
            bones: h36m_bones(),
            joint_count: JOINT_COUNT,
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn bones(&self) -> &[BoneSpec] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// One past the highest joint id referenced.
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// True when `joint` is the root or the child of some bone.
    pub fn covers(&self, joint: usize) -> bool {
        joint == self.root || self.bones.iter().any(|bone| bone.child == joint)
    }
}

/// Target bone lengths measured once from the bind pose.
///
/// Immutable once bound. Rebinding a new skeleton builds a new cache.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneLengthCache {
    bones: Vec<BoneSpec>,
    lengths: Vec<f32>,
    rest_directions: Vec<Vec3<f32>>,
    rest_root: Vec3<f32>,
}

impl BoneLengthCache {
    pub fn bind(rest_pose: &[Vec3<f32>], bones: &BoneList) -> Result<Self, PoseError> {
        if bones.joint_count() > rest_pose.len() {
            return Err(PoseError::JointOutOfRange {
                joint: bones.joint_count() - 1,
                count: rest_pose.len(),
            });
        }
        for (joint, position) in rest_pose.iter().enumerate().take(bones.joint_count()) {
            if !(position.x.is_finite() && position.y.is_finite() && position.z.is_finite()) {
                return Err(PoseError::NonFiniteRestPose { joint });
            }
        }

        let mut lengths = Vec::with_capacity(bones.len());
        let mut rest_directions = Vec::with_capacity(bones.len());
        for bone in bones.bones() {
            let delta = rest_pose[bone.child] - rest_pose[bone.parent];
            lengths.push(delta.length());
            // Zero-length rest bones still need a direction for the degenerate fallback
            rest_directions.push(
                delta
                    .try_normalized(f32::EPSILON)
                    .unwrap_or(Vec3::new(0.0, 1.0, 0.0)),
            );
        }

        Ok(Self {
            bones: bones.bones().to_vec(),
            lengths,
            rest_directions,
            rest_root: rest_pose[bones.root()],
        })
    }

    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn length(&self, bone: usize) -> Option<f32> {
        self.lengths.get(bone).copied()
    }

    pub fn rest_direction(&self, bone: usize) -> Option<Vec3<f32>> {
        self.rest_directions.get(bone).copied()
    }

    /// Root joint position in the bind pose.
    pub fn rest_root(&self) -> Vec3<f32> {
        self.rest_root
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// True when this cache was bound against exactly `bones`.
    pub fn is_bound_to(&self, bones: &BoneList) -> bool {
        self.bones == bones.bones()
    }
}
