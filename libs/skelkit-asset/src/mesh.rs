//! Indexed triangle meshes built from a model document's faces
//!
//! Each face corner becomes a vertex; identical corners (compared bit for bit)
//! are merged so the output is a deduplicated vertex array plus a `u32` index
//! array ready for upload.

use std::collections::HashMap;
use std::hash::Hash;

use log::debug;
use skelkit_anim::{MAX_BONES, VertexRef};

use crate::error::{AssetError, Result};
use crate::model::{Face, ModelDocument};

/// Position, normal, texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Static attributes plus four bone influences
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u8; 4],
    pub weights: [f32; 4],
}

/// Vertex array in whichever layout the model calls for
#[derive(Debug, Clone, PartialEq)]
pub enum MeshVertices {
    Static(Vec<StaticVertex>),
    Skinned(Vec<SkinnedVertex>),
}

impl MeshVertices {
    pub fn len(&self) -> usize {
        match self {
            Self::Static(v) => v.len(),
            Self::Skinned(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deduplicated vertices and triangle indices
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: MeshVertices,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of indices to draw
    pub fn element_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_skinned(&self) -> bool {
        matches!(self.vertices, MeshVertices::Skinned(_))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Bit pattern used to merge identical vertices
trait DedupKey: Copy {
    type Key: Eq + Hash;

    fn key(&self) -> Self::Key;
}

fn bits<const N: usize>(values: [f32; N]) -> [u32; N] {
    values.map(f32::to_bits)
}

impl DedupKey for StaticVertex {
    type Key = ([u32; 3], [u32; 3], [u32; 2]);

    fn key(&self) -> Self::Key {
        (bits(self.position), bits(self.normal), bits(self.uv))
    }
}

impl DedupKey for SkinnedVertex {
    type Key = ([u32; 3], [u32; 3], [u32; 2], [u8; 4], [u32; 4]);

    fn key(&self) -> Self::Key {
        (
            bits(self.position),
            bits(self.normal),
            bits(self.uv),
            self.joints,
            bits(self.weights),
        )
    }
}

fn deduplicate<V: DedupKey>(corners: Vec<V>) -> Result<(Vec<V>, Vec<u32>)> {
    let mut lookup: HashMap<V::Key, u32> = HashMap::with_capacity(corners.len());
    let mut unique = Vec::new();
    let mut indices = Vec::with_capacity(corners.len());

    for corner in corners {
        let index = match lookup.get(&corner.key()) {
            Some(index) => *index,
            None => {
                let index = u32::try_from(unique.len()).map_err(|_| {
                    AssetError::InvalidModel("mesh exceeds u32 index range".to_string())
                })?;
                lookup.insert(corner.key(), index);
                unique.push(corner);
                index
            }
        };
        indices.push(index);
    }
    Ok((unique, indices))
}

/// Static attributes of one face corner
fn corner(doc: &ModelDocument, face: &Face, j: usize) -> Result<StaticVertex> {
    let position = pool_entry(doc, face.vertex[j])?;
    let normal = pool_entry(doc, face.normal[j])?;
    let uv = face
        .texcoord
        .and_then(|tc| doc.tmap.get(tc[j]))
        .map_or([0.0, 0.0], |[u, v]| [*u, 1.0 - *v]);

    Ok(StaticVertex {
        position: [
            position[0] * doc.scale,
            position[1] * doc.scale,
            position[2] * doc.scale,
        ],
        normal: [normal[0], normal[1], normal[2]],
        uv,
    })
}

fn pool_entry(doc: &ModelDocument, index: VertexRef) -> Result<[f32; 4]> {
    doc.vertices.get(index).map(|v| v.pos).ok_or_else(|| {
        AssetError::InvalidModel(format!(
            "face references vertex {index} of {}",
            doc.vertices.len()
        ))
    })
}

/// Bone influences of the vertex pool entry behind a face corner.
///
/// Vertices without a skin are bound to `sentinel` with full weight.
fn influences(doc: &ModelDocument, index: VertexRef, sentinel: u8) -> ([u8; 4], [f32; 4]) {
    let skin = doc
        .vertices
        .get(index)
        .and_then(|v| v.skin)
        .and_then(|s| doc.skins.get(s));

    let Some(skin) = skin else {
        return ([sentinel, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]);
    };

    let mut joints = [0u8; 4];
    let mut weights = [0.0f32; 4];
    for (slot, (bone, weight)) in skin.bones.iter().zip(skin.weights).enumerate() {
        if let Ok(bone) = u8::try_from(*bone) {
            joints[slot] = bone;
            weights[slot] = weight;
        }
    }
    (joints, weights)
}

/// Expand, flip and deduplicate the document's faces.
///
/// Uses the skinned layout when the document declares any skins.
pub fn build_mesh(doc: &ModelDocument) -> Result<MeshData> {
    let mesh = if doc.skins.is_empty() {
        let mut corners = Vec::with_capacity(doc.faces.len() * 3);
        for face in &doc.faces {
            for j in 0..3 {
                corners.push(corner(doc, face, j)?);
            }
        }
        let (vertices, indices) = deduplicate(corners)?;
        MeshData {
            vertices: MeshVertices::Static(vertices),
            indices,
        }
    } else {
        if doc.bones.len() + 1 > MAX_BONES {
            return Err(AssetError::InvalidModel(format!(
                "{} bones do not fit in {MAX_BONES} joint slots",
                doc.bones.len() + 1
            )));
        }
        // Bounded by MAX_BONES above
        let sentinel = doc.bones.len() as u8;
        let mut corners = Vec::with_capacity(doc.faces.len() * 3);
        for face in &doc.faces {
            for j in 0..3 {
                let base = corner(doc, face, j)?;
                let (joints, weights) = influences(doc, face.vertex[j], sentinel);
                corners.push(SkinnedVertex {
                    position: base.position,
                    normal: base.normal,
                    uv: base.uv,
                    joints,
                    weights,
                });
            }
        }
        let (vertices, indices) = deduplicate(corners)?;
        MeshData {
            vertices: MeshVertices::Skinned(vertices),
            indices,
        }
    };

    debug!(
        "Built {} mesh: {} faces -> {} unique vertices, {} indices",
        if mesh.is_skinned() { "skinned" } else { "static" },
        doc.faces.len(),
        mesh.vertex_count(),
        mesh.element_count()
    );
    Ok(mesh)
}
