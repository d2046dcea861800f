use thiserror::Error;

/// Setup-time and I/O failures. Any of these raised while building a
/// [`Pipeline`](crate::Pipeline) means the pipeline refuses to start.
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("retargeter has no bone length cache; bind a rest pose first")]
    MissingBoneLengthCache,

    #[error("bone length cache was bound against a different bone list")]
    BoneLengthCacheMismatch,

    #[error("bone {bone}: parent joint {parent} is not reconstructed before it is used")]
    InvalidBoneListOrdering { bone: usize, parent: usize },

    #[error("bone {bone}: joint {child} already has a parent")]
    DuplicateBoneChild { bone: usize, child: usize },

    #[error("joint {joint} out of range for {count} joints")]
    JointOutOfRange { joint: usize, count: usize },

    #[error("rest pose joint {joint} is not finite")]
    NonFiniteRestPose { joint: usize },

    #[error("invalid joint convention table: {0}")]
    InvalidConventionTable(String),

    #[error("invalid leaf decoration: {0}")]
    InvalidDecoration(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tensor error: {0}")]
    Tensor(#[from] base::TensorError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lifter error: {0}")]
    Lifter(String),
}

/// Per-frame conditions. None of these stop the pipeline; the hold gate keeps
/// the previous pose when one occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameFault {
    #[error("no detection survived thresholding and NMS")]
    NoDetection,

    #[error("malformed detector output: expected {expected}, got {got}")]
    MalformedDetectorOutput { expected: String, got: String },

    #[error("malformed lifter output: expected {expected}, got {got}")]
    MalformedLifterOutput { expected: String, got: String },

    #[error("lifter failed: {0}")]
    LifterFailed(String),
}
