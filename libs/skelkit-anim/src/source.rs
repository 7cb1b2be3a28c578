//! Read-only view of a parsed model that the loaders sample from
//!
//! Positions and rotations are not stored inline; bones and poses reference
//! entries of a shared `[x, y, z, w]` vertex pool, the way compact model
//! formats share one attribute array between geometry and skeleton data.

use glam::{Quat, Vec3, Vec4};

use crate::error::{AnimError, Result};
use crate::transform::{Transform, normalize_rotation};

/// Index into the source model's vertex pool
pub type VertexRef = usize;

/// One bone as declared by the source model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBone {
    /// Bone name (may exceed the stored name length)
    pub name: String,
    /// Parent bone index, negative for a root bone
    pub parent: i32,
    /// Local bind position
    pub position: VertexRef,
    /// Local bind orientation (quaternion stored as `x, y, z, w`)
    pub rotation: VertexRef,
}

/// Sampled local pose of one bone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseSample {
    pub position: VertexRef,
    pub rotation: VertexRef,
}

/// Interface the skeleton builder and clip loader consume.
///
/// Implementations must store bones ancestors-first: every parent index is
/// smaller than the index of the bone referencing it.
pub trait SourceModel {
    /// Number of real bones (without the sentinel)
    fn bone_count(&self) -> usize;

    /// Bone `index`, `index < bone_count()`
    fn bone(&self, index: usize) -> SourceBone;

    /// Raw vertex pool entry, `None` when out of range
    fn vertex(&self, index: VertexRef) -> Option<Vec4>;

    /// Number of entries in the vertex pool
    fn vertex_count(&self) -> usize;

    /// Uniform scale applied to every position read from the pool
    fn scale(&self) -> f32 {
        1.0
    }

    /// Number of animation clips ("actions")
    fn action_count(&self) -> usize;

    /// Name of action `action`
    fn action_name(&self, action: usize) -> String;

    /// Number of frames declared by action `action`
    fn frame_count(&self, action: usize) -> usize;

    /// Timestamp of frame `frame` of action `action`, in milliseconds
    fn frame_time(&self, action: usize, frame: usize) -> u32;

    /// Local pose of every real bone at `msec`, or `None` if the source cannot
    /// produce one
    fn pose_at(&self, action: usize, msec: u32) -> Option<Vec<PoseSample>>;
}

/// Resolve a position reference, applying the model scale
pub(crate) fn read_position<S: SourceModel + ?Sized>(
    source: &S,
    index: VertexRef,
) -> Result<Vec3> {
    let v = read_vertex(source, index)?;
    Ok(v.truncate() * source.scale())
}

/// Resolve and normalize a rotation reference
pub(crate) fn read_rotation<S: SourceModel + ?Sized>(
    source: &S,
    index: VertexRef,
) -> Result<Quat> {
    let v = read_vertex(source, index)?;
    Ok(normalize_rotation(Quat::from_vec4(v)))
}

/// Local transform (unit scale) from a position and a rotation reference
pub(crate) fn read_local<S: SourceModel + ?Sized>(
    source: &S,
    position: VertexRef,
    rotation: VertexRef,
) -> Result<Transform> {
    Ok(Transform::new(
        read_position(source, position)?,
        read_rotation(source, rotation)?,
    ))
}

fn read_vertex<S: SourceModel + ?Sized>(source: &S, index: VertexRef) -> Result<Vec4> {
    source
        .vertex(index)
        .ok_or_else(|| AnimError::InvalidVertexRef {
            index,
            pool_len: source.vertex_count(),
        })
}
