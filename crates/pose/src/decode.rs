use crate::error::{FrameFault, PoseError};
use crate::keypoint::{Keypoint, Pose2D, JOINT_COUNT};
use base::{Rect, Tensor, Vec2};

/// Rows per anchor in the detector output: box (4) + score (1) + joints (3 each).
pub const DETECTOR_FEATURES: usize = 4 + 1 + 3 * JOINT_COUNT;

/// One anchor that survived score thresholding.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Column of this anchor in the detector output.
    pub anchor: usize,
    /// Box in corner form.
    pub bbox: Rect<f32>,
    /// Score minus the threshold. Always positive.
    pub score: f32,
    pub keypoints: Pose2D,
}

/// Compute Intersection over Union (IoU) between two bounding boxes
///
/// Returns 0.0 for non-overlapping boxes or zero-area boxes (no division by zero).
pub fn iou(a: &Rect<f32>, b: &Rect<f32>) -> f32 {
    if a.size.x <= 0.0 || a.size.y <= 0.0 || b.size.x <= 0.0 || b.size.y <= 0.0 {
        return 0.0;
    }

    let intersection_area = match a.intersection(*b) {
        Some(rect) => rect.area(),
        None => 0.0,
    };
    let union_area = a.area() + b.area() - intersection_area;
    if union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Greedy non-maximum suppression.
///
/// Visits candidates by score descending, lower anchor index first on ties, and
/// keeps a candidate unless its IoU with an already kept one exceeds
/// `iou_threshold`. Returns indices into `candidates` in visiting order, so the
/// first index is the best detection.
pub fn nms(candidates: &[Candidate], iou_threshold: f32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .score
            .total_cmp(&candidates[a].score)
            .then(candidates[a].anchor.cmp(&candidates[b].anchor))
    });

    let mut keep: Vec<usize> = Vec::new();
    for idx in order {
        let suppressed = keep
            .iter()
            .any(|&kept| iou(&candidates[kept].bbox, &candidates[idx].bbox) > iou_threshold);
        if !suppressed {
            keep.push(idx);
        }
    }
    keep
}

/// Turns the raw `[1, 56, A]` detector output into at most one pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionDecoder {
    score_threshold: f32,
    iou_threshold: f32,
}

impl DetectionDecoder {
    pub fn new(score_threshold: f32, iou_threshold: f32) -> Result<Self, PoseError> {
        for (name, value) in [
            ("detection confidence threshold", score_threshold),
            ("NMS IoU threshold", iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(Self {
            score_threshold,
            iou_threshold,
        })
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    pub fn iou_threshold(&self) -> f32 {
        self.iou_threshold
    }

    /// Threshold every anchor and convert the survivors to corner-form boxes.
    pub fn candidates(&self, output: &Tensor<f32>) -> Result<Vec<Candidate>, FrameFault> {
        if output.ndim() != 3
            || output.shape[0] != 1
            || output.shape[1] != DETECTOR_FEATURES
            || output.len() != DETECTOR_FEATURES * output.shape[2]
        {
            return Err(FrameFault::MalformedDetectorOutput {
                expected: format!("[1, {DETECTOR_FEATURES}, A]"),
                got: format!("{:?}", output.shape),
            });
        }

        // Element [0, row, col] lives at row * n + col
        let n = output.shape[2];
        let at = |row: usize, col: usize| output.data[row * n + col];

        let mut candidates = Vec::new();
        for col in 0..n {
            let score = at(4, col) - self.score_threshold;
            if score.is_nan() || score <= 0.0 {
                continue;
            }

            let (cx, cy, w, h) = (at(0, col), at(1, col), at(2, col), at(3, col));
            let bbox = Rect::from_min_max(
                Vec2::new(cx - 0.5 * w, cy - 0.5 * h),
                Vec2::new(cx + 0.5 * w, cy + 0.5 * h),
            );

            let mut keypoints = [Keypoint::default(); JOINT_COUNT];
            for (joint, keypoint) in keypoints.iter_mut().enumerate() {
                let base = 5 + joint * 3;
                *keypoint = Keypoint::new(at(base, col), at(base + 1, col), at(base + 2, col));
            }

            candidates.push(Candidate {
                anchor: col,
                bbox,
                score,
                keypoints,
            });
        }

        Ok(candidates)
    }

    /// Decode the single best detection, or `FrameFault::NoDetection`.
    pub fn decode(&self, output: &Tensor<f32>) -> Result<Candidate, FrameFault> {
        let mut candidates = self.candidates(output)?;
        let keep = nms(&candidates, self.iou_threshold);
        log::debug!(
            "decoder: {} anchors, {} above threshold, {} after NMS",
            output.shape.get(2).copied().unwrap_or(0),
            candidates.len(),
            keep.len()
        );
        match keep.first() {
            Some(&best) => Ok(candidates.swap_remove(best)),
            None => Err(FrameFault::NoDetection),
        }
    }
}
