mod common;

use base::{Rect, Tensor, Vec2};
use common::{detector_output, grid_joint};
use pose::{iou, nms, DetectionDecoder, FrameFault, PoseError};

#[test]
fn test_iou_identical() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    assert_eq!(iou(&a, &a), 1.0);
}

#[test]
fn test_iou_non_overlapping() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(20.0, 20.0), Vec2::new(10.0, 10.0));
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn test_iou_partial_overlap() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(5.0, 0.0), Vec2::new(10.0, 10.0));
    // Intersection: 5x10 = 50, Union: 100+100-50 = 150, IoU = 1/3
    assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_iou_zero_area_box() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
    let b = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn test_decoder_rejects_out_of_range_thresholds() {
    assert!(matches!(DetectionDecoder::new(1.5, 0.5), Err(PoseError::InvalidConfig(_))));
    assert!(matches!(DetectionDecoder::new(0.5, -0.1), Err(PoseError::InvalidConfig(_))));
    assert!(matches!(DetectionDecoder::new(f32::NAN, 0.5), Err(PoseError::InvalidConfig(_))));
    assert!(DetectionDecoder::new(0.0, 1.0).is_ok());
}

#[test]
fn test_invalid_shape_is_malformed() {
    let decoder = DetectionDecoder::new(0.25, 0.45).unwrap();
    let output = Tensor::new(vec![1, 10, 5], vec![0.0; 50]).unwrap();
    assert!(matches!(
        decoder.decode(&output),
        Err(FrameFault::MalformedDetectorOutput { .. })
    ));
}

#[test]
fn test_zero_anchors_is_no_detection() {
    let decoder = DetectionDecoder::new(0.25, 0.45).unwrap();
    let output = detector_output(&[], grid_joint);
    assert_eq!(decoder.decode(&output), Err(FrameFault::NoDetection));
}

#[test]
fn test_scores_at_or_below_threshold_are_discarded() {
    let decoder = DetectionDecoder::new(0.5, 0.45).unwrap();
    let output = detector_output(
        &[[50.0, 50.0, 20.0, 20.0, 0.5], [150.0, 150.0, 20.0, 20.0, 0.1]],
        grid_joint,
    );
    assert!(decoder.candidates(&output).unwrap().is_empty());
    assert_eq!(decoder.decode(&output), Err(FrameFault::NoDetection));
}

#[test]
fn test_nan_score_is_discarded() {
    let decoder = DetectionDecoder::new(0.0, 0.45).unwrap();
    let output = detector_output(&[[50.0, 50.0, 20.0, 20.0, f32::NAN]], grid_joint);
    assert_eq!(decoder.decode(&output), Err(FrameFault::NoDetection));
}

#[test]
fn test_candidate_box_is_corner_form_and_score_adjusted() {
    let decoder = DetectionDecoder::new(0.25, 0.45).unwrap();
    let output = detector_output(&[[100.0, 80.0, 40.0, 60.0, 0.75]], grid_joint);
    let candidates = decoder.candidates(&output).unwrap();
    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert_eq!(c.bbox.min(), Vec2::new(80.0, 50.0));
    assert_eq!(c.bbox.max(), Vec2::new(120.0, 110.0));
    assert!((c.score - 0.5).abs() < 1e-6);
}

#[test]
fn test_heavy_overlap_keeps_only_best() {
    // [0,0,10,10] vs [0,0,10,8]: IoU = 80 / 100 = 0.8
    let decoder = DetectionDecoder::new(0.0, 0.5).unwrap();
    let output = detector_output(
        &[[5.0, 5.0, 10.0, 10.0, 0.9], [5.0, 4.0, 10.0, 8.0, 0.7]],
        grid_joint,
    );
    let candidates = decoder.candidates(&output).unwrap();
    assert!((iou(&candidates[0].bbox, &candidates[1].bbox) - 0.8).abs() < 1e-6);
    assert_eq!(nms(&candidates, 0.5), vec![0]);
}

#[test]
fn test_light_overlap_keeps_both() {
    // [0,0,10,10] vs [0,0,10,3]: IoU = 30 / 100 = 0.3
    let decoder = DetectionDecoder::new(0.0, 0.5).unwrap();
    let output = detector_output(
        &[[5.0, 5.0, 10.0, 10.0, 0.9], [5.0, 1.5, 10.0, 3.0, 0.7]],
        grid_joint,
    );
    let candidates = decoder.candidates(&output).unwrap();
    assert!((iou(&candidates[0].bbox, &candidates[1].bbox) - 0.3).abs() < 1e-6);
    assert_eq!(nms(&candidates, 0.5), vec![0, 1]);
}

#[test]
fn test_decode_returns_best_anchor_joints() {
    let decoder = DetectionDecoder::new(0.25, 0.45).unwrap();
    let output = detector_output(
        &[
            [50.0, 50.0, 20.0, 20.0, 0.4],
            [200.0, 200.0, 20.0, 20.0, 0.95],
            [300.0, 50.0, 20.0, 20.0, 0.6],
        ],
        grid_joint,
    );
    let detection = decoder.decode(&output).unwrap();
    assert_eq!(detection.anchor, 1);
    for (j, keypoint) in detection.keypoints.iter().enumerate() {
        let [x, y, c] = grid_joint(1, j);
        assert_eq!(keypoint.position, Vec2::new(x, y));
        assert_eq!(keypoint.confidence, c);
    }
}

#[test]
fn test_decode_tie_prefers_lower_anchor() {
    let decoder = DetectionDecoder::new(0.25, 0.45).unwrap();
    let output = detector_output(
        &[[50.0, 50.0, 20.0, 20.0, 0.8], [200.0, 200.0, 20.0, 20.0, 0.8]],
        grid_joint,
    );
    assert_eq!(decoder.decode(&output).unwrap().anchor, 0);
}
