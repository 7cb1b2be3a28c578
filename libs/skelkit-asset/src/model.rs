//! JSON model documents
//!
//! A document mirrors the layout of compact binary model formats: one shared
//! vertex pool of `[x, y, z, w]` entries that geometry, bone bind poses and
//! animation frames all reference by index. Rotations are pool entries read
//! as quaternions (`x, y, z, w`).
//!
//! ```json
//! {
//!   "scale": 1.0,
//!   "vertices": [
//!     { "pos": [0, 0, 0, 1] },
//!     { "pos": [0, 0, 0, 1], "skin": 0 }
//!   ],
//!   "skins": [{ "bones": [0, -1, -1, -1], "weights": [1, 0, 0, 0] }],
//!   "bones": [{ "name": "root", "parent": -1, "pos": 0, "ori": 0 }],
//!   "faces": [{ "vertex": [0, 1, 1], "normal": [0, 0, 0] }],
//!   "actions": [
//!     { "name": "idle", "frames": [{ "msec": 0, "transforms": [] }] }
//!   ]
//! }
//! ```

use std::path::Path;

use glam::Vec4;
use log::debug;
use serde::{Deserialize, Serialize};
use skelkit_anim::{
    AnimationClip, LoadOptions, PoseSample, Skeleton, SourceBone, SourceModel, VertexRef,
    load_clips_with,
};

use crate::error::{AssetError, Result};
use crate::file::read_to_string;

fn default_scale() -> f32 {
    1.0
}

/// Vertex pool entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolVertex {
    pub pos: [f32; 4],
    /// Index into `skins`, absent for unskinned vertices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<usize>,
}

/// Up to four bone influences; negative bone ids are unused slots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub bones: [i32; 4],
    pub weights: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocBone {
    pub name: String,
    /// Parent bone index, negative for roots
    pub parent: i32,
    /// Local bind position (vertex pool index)
    pub pos: VertexRef,
    /// Local bind orientation (vertex pool index)
    pub ori: VertexRef,
}

/// Triangle referencing vertex pool entries for positions and normals, and
/// optionally texture map entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertex: [VertexRef; 3],
    pub normal: [VertexRef; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texcoord: Option<[usize; 3]>,
}

/// New local pose of one bone from a frame onward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTransform {
    pub bone: usize,
    pub pos: VertexRef,
    pub ori: VertexRef,
}

/// Changes applied at `msec`; bones not listed keep their previous pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub msec: u32,
    #[serde(default)]
    pub transforms: Vec<FrameTransform>,
}

/// Named animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// Parsed model document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub name: String,
    /// Uniform scale for every position in the vertex pool
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub vertices: Vec<PoolVertex>,
    /// Texture map, `[u, v]` pairs
    #[serde(default)]
    pub tmap: Vec<[f32; 2]>,
    #[serde(default)]
    pub skins: Vec<Skin>,
    #[serde(default)]
    pub bones: Vec<DocBone>,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl ModelDocument {
    /// Parse a document from JSON text without validating references
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from JSON bytes without validating references
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Read, parse and validate a document file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Self::from_json_str(&read_to_string(path)?)?;
        doc.validate()?;
        debug!(
            "Loaded model {}: {} vertices, {} bones, {} faces, {} actions",
            path.display(),
            doc.vertices.len(),
            doc.bones.len(),
            doc.faces.len(),
            doc.actions.len()
        );
        Ok(doc)
    }

    /// Serialize back to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every cross reference in the document.
    ///
    /// Returns the first problem found as `AssetError::InvalidModel`.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return invalid(format!("scale {} must be positive", self.scale));
        }

        for (i, v) in self.vertices.iter().enumerate() {
            if v.pos.iter().any(|c| !c.is_finite()) {
                return invalid(format!("Vertex {i} has a non-finite component"));
            }
            if let Some(skin) = v.skin {
                if skin >= self.skins.len() {
                    return invalid(format!("Vertex {i} references missing skin {skin}"));
                }
            }
        }

        for (i, skin) in self.skins.iter().enumerate() {
            for (bone, weight) in skin.bones.iter().zip(skin.weights) {
                if usize::try_from(*bone).is_ok_and(|b| b >= self.bones.len()) {
                    return invalid(format!("Skin {i} references missing bone {bone}"));
                }
                if !weight.is_finite() || weight < 0.0 {
                    return invalid(format!("Skin {i} has invalid weight {weight}"));
                }
            }
        }

        for (i, bone) in self.bones.iter().enumerate() {
            if usize::try_from(bone.parent).is_ok_and(|parent| parent >= i) {
                return invalid(format!(
                    "Bone {i} ({}) has parent {} that does not precede it",
                    bone.name, bone.parent
                ));
            }
            self.check_ref(bone.pos, || format!("Bone {i} position"))?;
            self.check_ref(bone.ori, || format!("Bone {i} orientation"))?;
        }

        for (i, face) in self.faces.iter().enumerate() {
            for r in face.vertex.iter().chain(&face.normal) {
                self.check_ref(*r, || format!("Face {i}"))?;
            }
            if let Some(tc) = face.texcoord {
                if let Some(bad) = tc.iter().find(|t| **t >= self.tmap.len()) {
                    return invalid(format!("Face {i} references missing texcoord {bad}"));
                }
            }
        }

        for action in &self.actions {
            for frame in &action.frames {
                for t in &frame.transforms {
                    if t.bone >= self.bones.len() {
                        return invalid(format!(
                            "Action '{}' frame {} animates missing bone {}",
                            action.name, frame.msec, t.bone
                        ));
                    }
                    let context = || format!("Action '{}' frame {}", action.name, frame.msec);
                    self.check_ref(t.pos, context)?;
                    self.check_ref(t.ori, context)?;
                }
            }
        }

        Ok(())
    }

    fn check_ref(&self, index: VertexRef, context: impl Fn() -> String) -> Result<()> {
        if index >= self.vertices.len() {
            return invalid(format!(
                "{} references vertex {index} of {}",
                context(),
                self.vertices.len()
            ));
        }
        Ok(())
    }

    /// Build the skeleton described by this document
    pub fn skeleton(&self, options: &LoadOptions) -> Result<Skeleton> {
        Ok(Skeleton::from_source_with(self, options)?)
    }

    /// Build one clip per action
    pub fn clips(&self, options: &LoadOptions) -> Result<Vec<AnimationClip>> {
        Ok(load_clips_with(self, options)?)
    }

    /// Index of the action named `name`
    pub fn find_action(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name == name)
    }
}

fn invalid<T>(message: String) -> Result<T> {
    Err(AssetError::InvalidModel(message))
}

impl SourceModel for ModelDocument {
    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn bone(&self, index: usize) -> SourceBone {
        let bone = &self.bones[index];
        SourceBone {
            name: bone.name.clone(),
            parent: bone.parent,
            position: bone.pos,
            rotation: bone.ori,
        }
    }

    fn vertex(&self, index: VertexRef) -> Option<Vec4> {
        self.vertices.get(index).map(|v| Vec4::from_array(v.pos))
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn action_count(&self) -> usize {
        self.actions.len()
    }

    fn action_name(&self, action: usize) -> String {
        self.actions
            .get(action)
            .map(|a| a.name.clone())
            .unwrap_or_default()
    }

    fn frame_count(&self, action: usize) -> usize {
        self.actions.get(action).map_or(0, |a| a.frames.len())
    }

    fn frame_time(&self, action: usize, frame: usize) -> u32 {
        self.actions
            .get(action)
            .and_then(|a| a.frames.get(frame))
            .map_or(0, |f| f.msec)
    }

    /// Pose at `msec`: the bind pose with every frame at or before `msec`
    /// applied in time order.
    fn pose_at(&self, action: usize, msec: u32) -> Option<Vec<PoseSample>> {
        let action = self.actions.get(action)?;

        let mut applied: Vec<&Frame> = action.frames.iter().filter(|f| f.msec <= msec).collect();
        if applied.is_empty() {
            return None;
        }
        applied.sort_by_key(|f| f.msec);

        let mut pose: Vec<PoseSample> = self
            .bones
            .iter()
            .map(|b| PoseSample {
                position: b.pos,
                rotation: b.ori,
            })
            .collect();
        for frame in applied {
            for t in &frame.transforms {
                if let Some(sample) = pose.get_mut(t.bone) {
                    *sample = PoseSample {
                        position: t.pos,
                        rotation: t.ori,
                    };
                }
            }
        }
        Some(pose)
    }
}

/// Load a model file and build its skeleton with default options
pub fn load_skeleton<P: AsRef<Path>>(path: P) -> Result<Skeleton> {
    ModelDocument::load(path)?.skeleton(&LoadOptions::default())
}

/// Load a model file and build all of its clips with default options
pub fn load_clips<P: AsRef<Path>>(path: P) -> Result<Vec<AnimationClip>> {
    ModelDocument::load(path)?.clips(&LoadOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const SIMPLE: &str = r#"{
        "vertices": [
            { "pos": [0, 0, 0, 1] },
            { "pos": [0, 1, 0, 1] },
            { "pos": [0, 2, 0, 1] }
        ],
        "bones": [
            { "name": "root", "parent": -1, "pos": 0, "ori": 0 },
            { "name": "child", "parent": 0, "pos": 1, "ori": 0 }
        ],
        "actions": [{
            "name": "lift",
            "frames": [
                { "msec": 500, "transforms": [{ "bone": 1, "pos": 2, "ori": 0 }] },
                { "msec": 0, "transforms": [] }
            ]
        }]
    }"#;

    #[test]
    fn test_defaults() {
        let doc = ModelDocument::from_json_str(r#"{ "vertices": [] }"#).unwrap();
        assert_eq!(doc.scale, 1.0);
        assert!(doc.bones.is_empty());
        assert!(doc.actions.is_empty());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = ModelDocument::from_json_str(r#"{ "vertices": 3 }"#).unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }

    #[test]
    fn test_pose_before_first_frame() {
        let mut doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        doc.actions[0].frames.retain(|f| f.msec == 500);
        assert_eq!(doc.pose_at(0, 499), None);
        assert!(doc.pose_at(0, 500).is_some());
    }

    #[test]
    fn test_pose_accumulates_frames() {
        let doc = ModelDocument::from_json_str(SIMPLE).unwrap();

        let at_start = doc.pose_at(0, 0).unwrap();
        assert_eq!(at_start[1].position, 1);

        let later = doc.pose_at(0, 800).unwrap();
        assert_eq!(later[0].position, 0);
        assert_eq!(later[1].position, 2);
    }

    #[test]
    fn test_pose_unknown_action() {
        let doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        assert_eq!(doc.pose_at(3, 0), None);
    }

    #[test_case(|d: &mut ModelDocument| d.bones[0].parent = 1, "does not precede it" ; "bad parent")]
    #[test_case(|d: &mut ModelDocument| d.actions[0].frames[0].transforms[0].pos = 99, "vertex 99" ; "bad frame ref")]
    #[test_case(|d: &mut ModelDocument| d.vertices[0].skin = Some(0), "missing skin 0" ; "missing skin")]
    #[test_case(|d: &mut ModelDocument| d.vertices[1].pos[2] = f32::NAN, "non-finite" ; "nan vertex")]
    #[test_case(|d: &mut ModelDocument| d.scale = 0.0, "must be positive" ; "zero scale")]
    fn test_validate_rejects(mutate: fn(&mut ModelDocument), message: &str) {
        let mut doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        mutate(&mut doc);
        let err = doc.validate().unwrap_err();
        assert!(matches!(err, AssetError::InvalidModel(_)));
        let err = err.to_string();
        assert!(err.contains(message), "{err}");
    }

    #[test]
    fn test_validate_bad_skin() {
        let mut doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        doc.vertices[0].skin = Some(0);
        assert!(doc.validate().is_err());

        doc.skins.push(Skin {
            bones: [5, -1, -1, -1],
            weights: [1.0, 0.0, 0.0, 0.0],
        });
        assert!(doc.validate().is_err());

        doc.skins[0].bones[0] = 1;
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_document() {
        let doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        let again = ModelDocument::from_json_str(&doc.to_json_string().unwrap()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_find_action() {
        let doc = ModelDocument::from_json_str(SIMPLE).unwrap();
        assert_eq!(doc.find_action("lift"), Some(0));
        assert_eq!(doc.find_action("jump"), None);
    }
}
