//! Skeleton construction from a source model's bind pose

use log::debug;

use crate::error::Result;
use crate::hierarchy::{Bone, bones_from_source, compose_in_place};
use crate::options::LoadOptions;
use crate::source::{SourceModel, read_local};
use crate::transform::Transform;

/// Bone hierarchy with model-space bind poses.
///
/// `bones` and `bind_poses` are indexed identically. The last entry of both is
/// the "no bone" sentinel with an identity bind pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    bind_poses: Vec<Transform>,
}

impl Skeleton {
    /// Build a skeleton with default options
    pub fn from_source<S: SourceModel + ?Sized>(source: &S) -> Result<Self> {
        Self::from_source_with(source, &LoadOptions::default())
    }

    /// Build a skeleton from the source model's bones and local bind poses.
    ///
    /// Fails with `NoBonesInSource` if the model has no bones; callers treat
    /// such an asset as not animated.
    pub fn from_source_with<S: SourceModel + ?Sized>(
        source: &S,
        options: &LoadOptions,
    ) -> Result<Self> {
        let bones = bones_from_source(source, options.max_bones)?;
        let bind_poses = bind_poses_from_source(source, &bones)?;

        debug!("Built skeleton with {} bones (sentinel included)", bones.len());

        Ok(Self { bones, bind_poses })
    }

    /// Number of bones, sentinel included
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// All bones, sentinel last
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Model-space bind poses, indexed like `bones()`
    pub fn bind_poses(&self) -> &[Transform] {
        &self.bind_poses
    }

    /// Index of the "no bone" sentinel
    pub fn sentinel_index(&self) -> usize {
        self.bones.len() - 1
    }

    /// Look up a bone index by (stored) name
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones[..self.sentinel_index()]
            .iter()
            .position(|b| b.name == name)
    }

    /// Whether bone `index` has no parent
    pub fn is_root(&self, index: usize) -> bool {
        self.bones.get(index).is_some_and(Bone::is_root)
    }

    /// Direct children of bone `index`
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent == Some(index))
            .map(|(i, _)| i)
    }
}

/// Model-space bind poses for `bones` (sentinel included)
pub(crate) fn bind_poses_from_source<S: SourceModel + ?Sized>(
    source: &S,
    bones: &[Bone],
) -> Result<Vec<Transform>> {
    let real = bones.len() - 1;
    let mut poses = Vec::with_capacity(bones.len());
    for index in 0..real {
        let src = source.bone(index);
        poses.push(read_local(source, src.position, src.rotation)?);
    }
    poses.push(Transform::IDENTITY);

    compose_in_place(bones, &mut poses);
    Ok(poses)
}
