//! Skeletal animation for small 3D runtimes
//!
//! This crate turns a parsed model's bones and actions into data a GPU
//! skinning shader can consume:
//! - `Skeleton`: bone hierarchy with model-space bind poses
//! - `AnimationClip`: keyframes holding a model-space pose per bone
//! - `evaluate`: per-frame keyframe search, interpolation and skinning
//!   matrix computation into a caller-owned buffer
//!
//! Every skeleton and clip carries one extra trailing "no bone" sentinel with
//! an identity pose, for vertices that are not bound to any real bone.
//!
//! # Example
//!
//! ```rust
//! use glam::{Quat, Vec3};
//! use skelkit_anim::{BonePalette, MemoryModel, PlaybackState, Skeleton, evaluate, load_clips};
//!
//! let mut model = MemoryModel::new();
//! let root = model.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
//! model.add_bone("arm", Some(root), Vec3::Y, Quat::IDENTITY);
//! let wave = model.add_action("wave");
//! model.add_frame(wave, 0, &[(Vec3::ZERO, Quat::IDENTITY), (Vec3::Y, Quat::IDENTITY)]);
//! model.add_frame(wave, 1000, &[(Vec3::ZERO, Quat::IDENTITY), (Vec3::Y * 2.0, Quat::IDENTITY)]);
//!
//! let skeleton = Skeleton::from_source(&model)?;
//! let clips = load_clips(&model)?;
//!
//! let mut palette = BonePalette::new();
//! let mut state = PlaybackState::new(&clips[0], true);
//! evaluate(palette.as_mut_slice(), Some(&skeleton), &mut state, 0.5);
//!
//! let arm = palette.as_slice()[1].transpose();
//! assert!((arm.w_axis.y - 0.5).abs() < 1e-5);
//! # Ok::<(), skelkit_anim::AnimError>(())
//! ```

pub mod clip;
pub mod error;
pub mod hierarchy;
pub mod memory;
pub mod options;
pub mod palette;
pub mod player;
pub mod skeleton;
pub mod skinning;
pub mod source;
pub mod transform;

pub use clip::{AnimationClip, Keyframe, KeyframeSpan, load_clips, load_clips_with};
#[cfg(feature = "parallel")]
pub use clip::load_clips_parallel;
pub use error::{AnimError, Result};
pub use hierarchy::{Bone, MAX_NAME_LEN, NO_BONE_NAME};
pub use memory::MemoryModel;
pub use options::{LoadOptions, MAX_BONES, MissingPosePolicy};
pub use palette::BonePalette;
pub use player::{CLAMP_EPSILON_MS, PlaybackState, evaluate};
pub use skeleton::Skeleton;
pub use source::{PoseSample, SourceBone, SourceModel, VertexRef};
pub use transform::{Lerp, Transform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
