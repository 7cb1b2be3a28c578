//! Load-time configuration shared by the skeleton builder and clip loader

/// Maximum number of bones in a palette, sentinel included.
///
/// Matches the size of the skinning uniform array the shaders declare.
pub const MAX_BONES: usize = 32;

/// What a keyframe holds when the source cannot sample its pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPosePolicy {
    /// Copy the previous keyframe's pose; the first keyframe gets the bind pose
    #[default]
    HoldPrevious,
    /// Use the model-space bind pose
    BindPose,
    /// Use the identity transform for every bone
    Identity,
}

/// Options for `Skeleton::from_source_with` and `load_clips_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Bone limit, sentinel included; larger models are rejected
    pub max_bones: usize,
    /// Handling of frames without a pose sample
    pub missing_pose: MissingPosePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_bones: MAX_BONES,
            missing_pose: MissingPosePolicy::default(),
        }
    }
}
