//! In-memory `SourceModel` for procedural rigs and tests
//!
//! # Example
//!
//! ```rust
//! use glam::{Quat, Vec3};
//! use skelkit_anim::{MemoryModel, Skeleton};
//!
//! let mut model = MemoryModel::new();
//! let root = model.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
//! model.add_bone("arm", Some(root), Vec3::Y, Quat::IDENTITY);
//!
//! let skeleton = Skeleton::from_source(&model)?;
//! assert_eq!(skeleton.bone_count(), 3); // two bones plus the sentinel
//! # Ok::<(), skelkit_anim::AnimError>(())
//! ```

use glam::{Quat, Vec3, Vec4};

use crate::source::{PoseSample, SourceBone, SourceModel, VertexRef};

#[derive(Debug, Clone)]
struct MemoryFrame {
    msec: u32,
    pose: Option<Vec<PoseSample>>,
}

#[derive(Debug, Clone)]
struct MemoryAction {
    name: String,
    frames: Vec<MemoryFrame>,
}

/// A source model assembled in code.
///
/// Every added position or rotation becomes a new vertex pool entry.
/// `pose_at` answers only for timestamps that were added as frames.
#[derive(Debug, Clone)]
pub struct MemoryModel {
    scale: f32,
    vertices: Vec<Vec4>,
    bones: Vec<SourceBone>,
    actions: Vec<MemoryAction>,
}

impl MemoryModel {
    /// Create an empty model with unit scale
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            vertices: Vec::new(),
            bones: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Set the uniform position scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Push a raw pool entry and return its reference
    pub fn push_vertex(&mut self, v: Vec4) -> VertexRef {
        self.vertices.push(v);
        self.vertices.len() - 1
    }

    /// Add a bone with a local bind pose; returns its index.
    ///
    /// The rotation is stored as given, so unnormalized input exercises the
    /// loaders' normalization.
    pub fn add_bone(
        &mut self,
        name: &str,
        parent: Option<usize>,
        position: Vec3,
        rotation: Quat,
    ) -> usize {
        let position = self.push_vertex(position.extend(1.0));
        let rotation = self.push_vertex(Vec4::from(rotation));
        self.add_bone_refs(name, parent.map_or(-1, |p| p as i32), position, rotation)
    }

    /// Add a bone from raw pool references and a raw parent index
    pub fn add_bone_refs(
        &mut self,
        name: &str,
        parent: i32,
        position: VertexRef,
        rotation: VertexRef,
    ) -> usize {
        self.bones.push(SourceBone {
            name: name.to_string(),
            parent,
            position,
            rotation,
        });
        self.bones.len() - 1
    }

    /// Add an empty action; returns its index
    pub fn add_action(&mut self, name: &str) -> usize {
        self.actions.push(MemoryAction {
            name: name.to_string(),
            frames: Vec::new(),
        });
        self.actions.len() - 1
    }

    /// Add a frame holding one local `(position, rotation)` per real bone
    pub fn add_frame(&mut self, action: usize, msec: u32, pose: &[(Vec3, Quat)]) {
        let samples = pose
            .iter()
            .map(|(position, rotation)| PoseSample {
                position: self.push_vertex(position.extend(1.0)),
                rotation: self.push_vertex(Vec4::from(*rotation)),
            })
            .collect();
        self.push_frame(action, msec, Some(samples));
    }

    /// Add a frame whose pose the model cannot produce
    pub fn add_missing_frame(&mut self, action: usize, msec: u32) {
        self.push_frame(action, msec, None);
    }

    fn push_frame(&mut self, action: usize, msec: u32, pose: Option<Vec<PoseSample>>) {
        if let Some(action) = self.actions.get_mut(action) {
            action.frames.push(MemoryFrame { msec, pose });
        }
    }
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceModel for MemoryModel {
    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn bone(&self, index: usize) -> SourceBone {
        self.bones[index].clone()
    }

    fn vertex(&self, index: VertexRef) -> Option<Vec4> {
        self.vertices.get(index).copied()
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
        self.actions[action].name.clone()
    }

    fn frame_count(&self, action: usize) -> usize {
        self.actions[action].frames.len()
    }

    fn frame_time(&self, action: usize, frame: usize) -> u32 {
        self.actions[action].frames[frame].msec
    }

    fn pose_at(&self, action: usize, msec: u32) -> Option<Vec<PoseSample>> {
        self.actions
            .get(action)?
            .frames
            .iter()
            .find(|f| f.msec == msec)?
            .pose
            .clone()
    }
}
