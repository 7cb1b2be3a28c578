//! Bone lists and parent-chain composition
//!
//! Bones live in a flat array with parent indices. Storage order is
//! ancestors-first, so one forward pass turns local poses into model-space
//! poses: by the time bone `i` is visited its parent is already in model space.

use log::trace;

use crate::error::{AnimError, Result};
use crate::source::SourceModel;
use crate::transform::Transform;

/// Maximum stored bone name length in bytes, terminator included
pub const MAX_NAME_LEN: usize = 32;

/// Name of the synthetic trailing bone that unbound vertices reference
pub const NO_BONE_NAME: &str = "NO BONE";

/// A node of the skeleton hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    /// Bone name, at most `MAX_NAME_LEN - 1` bytes
    pub name: String,
    /// Parent index, `None` for roots and the sentinel
    pub parent: Option<usize>,
}

impl Bone {
    /// Create a bone, cutting the name to the stored length
    pub fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: truncate_name(name).to_string(),
            parent,
        }
    }

    /// The "no bone" sentinel
    pub fn sentinel() -> Self {
        Self::new(NO_BONE_NAME, None)
    }

    /// Whether this is a root (or the sentinel)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Cut a name to `MAX_NAME_LEN - 1` bytes on a character boundary
pub fn truncate_name(name: &str) -> &str {
    let limit = MAX_NAME_LEN - 1;
    if name.len() <= limit {
        return name;
    }
    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Read the bone list of `source`, validate it and append the sentinel.
///
/// Fails when the source has no bones, when the list (sentinel included)
/// exceeds `max_bones`, or when a parent does not precede its child.
pub(crate) fn bones_from_source<S: SourceModel + ?Sized>(
    source: &S,
    max_bones: usize,
) -> Result<Vec<Bone>> {
    let real = source.bone_count();
    if real == 0 {
        return Err(AnimError::NoBonesInSource);
    }
    if real + 1 > max_bones {
        return Err(AnimError::TooManyBones {
            count: real + 1,
            max: max_bones,
        });
    }

    let mut bones = Vec::with_capacity(real + 1);
    for index in 0..real {
        let src = source.bone(index);
        let parent = match src.parent {
            p if p < 0 => None,
            p if (p as usize) < index => Some(p as usize),
            p => {
                return Err(AnimError::UnorderedHierarchy {
                    bone: index,
                    parent: p,
                });
            }
        };
        if src.name.len() >= MAX_NAME_LEN {
            trace!("Bone {index} name '{}' truncated", src.name);
        }
        bones.push(Bone::new(&src.name, parent));
    }
    bones.push(Bone::sentinel());

    Ok(bones)
}

/// Convert local poses to model space in place.
///
/// `poses` holds one entry per bone in `bones`; root entries are left as-is.
pub(crate) fn compose_in_place(bones: &[Bone], poses: &mut [Transform]) {
    for (index, bone) in bones.iter().enumerate().take(poses.len()) {
        if let Some(parent) = bone.parent {
            let parent_pose = poses[parent];
            poses[index] = poses[index].compose_onto(&parent_pose);
        }
    }
}
