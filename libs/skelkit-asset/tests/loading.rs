//! Integration tests: model file to skeleton, clips, mesh and skinned vertices

use std::path::PathBuf;

use glam::Vec3;
use pretty_assertions::assert_eq;
use skelkit_anim::skinning::{Influences, skin_position};
use skelkit_anim::{AnimError, BonePalette, LoadOptions, PlaybackState, evaluate};
use skelkit_asset::{
    AssetError, MeshVertices, ModelDocument, build_mesh, load_clips, load_skeleton,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_load_fixture() {
    let doc = ModelDocument::load(fixture("arm.json")).unwrap();
    assert_eq!(doc.name, "arm");
    assert_eq!(doc.bones.len(), 2);
    assert_eq!(doc.actions.len(), 2);
}

#[test]
fn test_load_skeleton_and_clips() {
    let skeleton = load_skeleton(fixture("arm.json")).unwrap();
    assert_eq!(skeleton.bone_count(), 3);
    assert_eq!(skeleton.find_bone("forearm"), Some(1));
    assert!(
        skeleton.bind_poses()[1]
            .position
            .abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6)
    );

    let clips = load_clips(fixture("arm.json")).unwrap();
    let names: Vec<_> = clips.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["raise", "turn"]);
    assert_eq!(clips[0].duration(), 1000.0);
    assert_eq!(clips[1].keyframe_count(), 3);
}

#[test]
fn test_evaluated_palette_skins_mesh() {
    let doc = ModelDocument::load(fixture("arm.json")).unwrap();
    let skeleton = doc.skeleton(&LoadOptions::default()).unwrap();
    let clips = doc.clips(&LoadOptions::default()).unwrap();
    let mesh = build_mesh(&doc).unwrap();

    let mut palette = BonePalette::new();
    let mut state = PlaybackState::new(&clips[0], true);
    evaluate(palette.as_mut_slice(), Some(&skeleton), &mut state, 0.5);

    let MeshVertices::Skinned(vertices) = &mesh.vertices else {
        panic!("expected skinned layout");
    };

    let skinned: Vec<Vec3> = vertices
        .iter()
        .map(|v| {
            let influences = Influences {
                joints: v.joints,
                weights: v.weights,
            };
            skin_position(palette.as_slice(), Vec3::from_array(v.position), &influences)
        })
        .collect();

    // Corner order: origin, (1,0,0), (1,1,0), (0,1,0)
    assert_eq!(vertices[0].joints[0] as usize, skeleton.sentinel_index());
    assert!(skinned[0].abs_diff_eq(Vec3::ZERO, 1e-5));
    assert!(skinned[1].abs_diff_eq(Vec3::new(1.0, 0.25, 0.0), 1e-5));
    assert!(skinned[2].abs_diff_eq(Vec3::new(1.0, 1.25, 0.0), 1e-5));
    assert!(skinned[3].abs_diff_eq(Vec3::new(0.0, 1.5, 0.0), 1e-5));
}

#[test]
fn test_frame_order_in_file_does_not_matter() {
    let mut doc = ModelDocument::load(fixture("arm.json")).unwrap();
    let expected = doc.clips(&LoadOptions::default()).unwrap();

    doc.actions[1].frames.reverse();
    let reordered = doc.clips(&LoadOptions::default()).unwrap();

    assert_eq!(reordered, expected);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelDocument::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, AssetError::NotFound(_)));
}

#[test]
fn test_invalid_document_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{ "vertices": [], "bones": [{ "name": "b", "parent": -1, "pos": 3, "ori": 0 }] }"#,
    )
    .unwrap();

    let err = ModelDocument::load(&path).unwrap_err();
    assert!(matches!(err, AssetError::InvalidModel(_)), "{err}");
}

#[test]
fn test_model_without_bones() {
    let doc = ModelDocument::from_json_str(r#"{ "vertices": [] }"#).unwrap();
    let err = doc.skeleton(&LoadOptions::default()).unwrap_err();
    assert!(matches!(err, AssetError::Anim(AnimError::NoBonesInSource)));
}

#[test]
fn test_bone_limit_is_configurable() {
    let doc = ModelDocument::load(fixture("arm.json")).unwrap();
    let options = LoadOptions {
        max_bones: 2,
        ..LoadOptions::default()
    };
    let err = doc.skeleton(&options).unwrap_err();
    assert!(matches!(
        err,
        AssetError::Anim(AnimError::TooManyBones { count: 3, max: 2 })
    ));
}
