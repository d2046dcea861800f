use pose::{
    h36m_bones, AnchorPolicy, ConventionTable, Pipeline, PipelineConfig, PoseError,
    RigTargetConfig, RigTargets, TargetSkeleton,
};

#[test]
fn test_empty_object_gives_defaults() {
    let config = PipelineConfig::from_json("{}").unwrap();
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.detection_confidence_threshold, 0.5);
    assert_eq!(config.nms_iou_threshold, 0.45);
    assert_eq!(config.input_resolution, 320);
    assert_eq!(config.bone_list, h36m_bones());
    assert_eq!(config.joint_convention_table, ConventionTable::coco_to_h36m());
    assert_eq!(config.anchor_policy, AnchorPolicy::FixedAtTargetRoot);
    assert!(config.bias_correction_table.is_empty());
    assert_eq!(config.rig_targets, RigTargetConfig::default());
}

#[test]
fn test_partial_override() {
    let json = r#"{
        "detection_confidence_threshold": 0.3,
        "anchor_policy": "translated_by_calibrated_delta",
        "bias_correction_table": { "9": { "offset": [0.0, -0.1, 0.1] } },
        "leaf_decorations": [ { "joint": 17, "bone": 15, "multiplier": 0.5 } ],
        "rig_targets": { "lower_body": true }
    }"#;
    let config = PipelineConfig::from_json(json).unwrap();
    assert_eq!(config.detection_confidence_threshold, 0.3);
    assert_eq!(config.nms_iou_threshold, 0.45);
    assert_eq!(config.anchor_policy, AnchorPolicy::TranslatedByCalibratedDelta);

    let bias = config.bias_correction_table[&9];
    assert_eq!(bias.scale, [1.0, 1.0, 1.0]);
    assert_eq!(bias.offset, [0.0, -0.1, 0.1]);

    assert_eq!(config.leaf_decorations[0].bone, 15);
    assert!(config.rig_targets.lower_body);
    assert_eq!(config.rig_targets.look_at, 9);
}

#[test]
fn test_out_of_range_thresholds_rejected() {
    for json in [
        r#"{ "detection_confidence_threshold": 1.5 }"#,
        r#"{ "nms_iou_threshold": -0.2 }"#,
        r#"{ "input_resolution": 0 }"#,
        r#"{ "degenerate_epsilon": 0.0 }"#,
    ] {
        assert!(
            matches!(PipelineConfig::from_json(json), Err(PoseError::InvalidConfig(_))),
            "{json}"
        );
    }
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        PipelineConfig::from_json("{ \"input_resolution\": \"big\" }"),
        Err(PoseError::Json(_))
    ));
}

#[test]
fn test_round_trip_default() {
    let json = serde_json::to_string_pretty(&PipelineConfig::default()).unwrap();
    assert_eq!(PipelineConfig::from_json(&json).unwrap(), PipelineConfig::default());
}

#[test]
fn test_target_skeleton_json() {
    let skeleton: TargetSkeleton =
        serde_json::from_str(r#"{ "rest_pose": [[0.0, 1.0, 0.0], [0.1, 1.0, 0.0]] }"#).unwrap();
    let rest = skeleton.rest_pose();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[1].x, 0.1);
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        PipelineConfig::load("/nonexistent/pipeline.json"),
        Err(PoseError::Io(_))
    ));
}

#[test]
fn test_huge_joint_ids_fail_setup() {
    let rest = vec![[0.0f32, 0.0, 0.0]; 17];
    let skeleton = TargetSkeleton { rest_pose: rest };
    for json in [
        r#"{ "root_joint": 18446744073709551615, "bone_list": [] }"#,
        r#"{ "leaf_decorations": [ { "joint": 100000000, "bone": 0, "multiplier": 1.0 } ] }"#,
    ] {
        let config = PipelineConfig::from_json(json).unwrap();
        assert!(
            matches!(
                Pipeline::new(&config, &skeleton.rest_pose()),
                Err(PoseError::JointOutOfRange { .. })
            ),
            "{json}"
        );
    }
}

#[test]
fn test_rig_targets_disabled() {
    let config = PipelineConfig::from_json(r#"{ "rig_targets": { "enabled": false } }"#).unwrap();
    assert!(!config.rig_targets.enabled);
    let joints = vec![base::Vec3::new(1.0f32, 2.0, 3.0); 17];
    assert_eq!(config.rig_targets.select(&joints), RigTargets::default());
    assert!(PipelineConfig::default().rig_targets.select(&joints).look_at.is_some());
}
