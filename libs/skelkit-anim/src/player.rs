//! Per-frame pose evaluation
//!
//! `evaluate` advances a `PlaybackState`, blends the two keyframes around the
//! new time and writes one skinning matrix per bone. It never allocates and
//! never fails: missing inputs or a clip with fewer than two keyframes leave
//! the output untouched.

use glam::Mat4;

use crate::clip::AnimationClip;
use crate::skeleton::Skeleton;

/// Amount (ms) a non-looping clip stops short of its duration
pub const CLAMP_EPSILON_MS: f32 = 1.0;

/// Playback of one clip on one animated instance.
///
/// With `looping` the time wraps modulo the clip duration; without it the time
/// saturates at `duration - CLAMP_EPSILON_MS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState<'a> {
    clip: Option<&'a AnimationClip>,
    time: f32,
    looping: bool,
}

impl<'a> PlaybackState<'a> {
    /// Start playing `clip` from time zero
    pub fn new(clip: &'a AnimationClip, looping: bool) -> Self {
        Self {
            clip: Some(clip),
            time: 0.0,
            looping,
        }
    }

    /// State without a clip; `evaluate` does nothing with it
    pub fn idle() -> Self {
        Self {
            clip: None,
            time: 0.0,
            looping: true,
        }
    }

    /// Active clip, `None` while nothing is loaded
    pub fn clip(&self) -> Option<&'a AnimationClip> {
        self.clip
    }

    /// Elapsed playback time in milliseconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Wrap (`true`) or clamp (`false`) at the end of the clip
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Switch between wrapping and clamping without touching the time
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Switch to another clip and restart from time zero
    pub fn set_clip(&mut self, clip: Option<&'a AnimationClip>) {
        self.clip = clip;
        self.time = 0.0;
    }

    /// Jump to `time` milliseconds; normalized on the next `evaluate`
    pub fn seek(&mut self, time: f32) {
        self.time = time;
    }

    /// Advance by `dt` seconds and normalize against the clip duration.
    ///
    /// Returns `false` (and changes nothing) when there is no playable clip.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(clip) = self.clip.filter(|c| c.is_playable()) else {
            return false;
        };
        let duration = clip.duration();
        if duration <= 0.0 {
            return false;
        }

        self.time += dt * 1000.0;
        self.time = normalize_time(self.time, duration, self.looping);
        true
    }
}

impl Default for PlaybackState<'_> {
    fn default() -> Self {
        Self::idle()
    }
}

fn normalize_time(time: f32, duration: f32, looping: bool) -> f32 {
    if looping {
        let wrapped = time.rem_euclid(duration);
        // rem_euclid can round up to `duration` for tiny negative inputs
        if wrapped >= duration { 0.0 } else { wrapped }
    } else if time >= duration {
        (duration - CLAMP_EPSILON_MS).max(0.0)
    } else if time < 0.0 {
        0.0
    } else {
        time
    }
}

/// Advance `state` by `dt` seconds and write skinning matrices to `out`.
///
/// Each bone's interpolated model-space pose is composed with the inverse of
/// the skeleton's bind pose, built as `Translate * Rotate * Scale`, and stored
/// transposed at `out[bone]`. Bones beyond `out.len()` or the skeleton's bone
/// count are skipped.
///
/// No-op when `skeleton` or `state.clip` is `None`, or the clip has fewer
/// than two keyframes.
pub fn evaluate(
    out: &mut [Mat4],
    skeleton: Option<&Skeleton>,
    state: &mut PlaybackState<'_>,
    dt: f32,
) {
    let (Some(skeleton), Some(clip)) = (skeleton, state.clip) else {
        return;
    };
    if !state.advance(dt) {
        return;
    }
    let Some(span) = clip.span_at(state.time, state.looping) else {
        return;
    };

    let keyframes = clip.keyframes();
    let pose0 = &keyframes[span.from].pose;
    let pose1 = &keyframes[span.to].pose;
    let bind_poses = skeleton.bind_poses();

    let count = clip
        .bone_count()
        .min(bind_poses.len())
        .min(pose0.len())
        .min(pose1.len())
        .min(out.len());

    for bone in 0..count {
        let animated = pose0[bone].interpolate(&pose1[bone], span.alpha);
        let skin = animated.skin_with(&bind_poses[bone].inverse());
        out[bone] = skin.to_matrix().transpose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{Keyframe, load_clips};
    use crate::hierarchy::Bone;
    use crate::memory::MemoryModel;
    use crate::transform::Transform;
    use glam::{Quat, Vec3};

    fn two_keyframe_clip(duration: f32) -> AnimationClip {
        let keyframes = vec![
            Keyframe {
                time: 0.0,
                pose: vec![Transform::IDENTITY],
            },
            Keyframe {
                time: duration,
                pose: vec![Transform::IDENTITY],
            },
        ];
        AnimationClip::new("test", vec![Bone::sentinel()], keyframes)
    }

    #[test]
    fn test_normalize_time_looping() {
        assert_eq!(normalize_time(1500.0, 1000.0, true), 500.0);
        assert_eq!(normalize_time(1000.0, 1000.0, true), 0.0);
        assert_eq!(normalize_time(-250.0, 1000.0, true), 750.0);
        assert_eq!(normalize_time(12_345_000.0, 1000.0, true), 0.0);
    }

    #[test]
    fn test_normalize_time_clamped() {
        assert_eq!(normalize_time(5000.0, 1000.0, false), 999.0);
        assert_eq!(normalize_time(-10.0, 1000.0, false), 0.0);
        assert_eq!(normalize_time(400.0, 1000.0, false), 400.0);
    }

    #[test]
    fn test_advance_converts_seconds() {
        let clip = two_keyframe_clip(1000.0);
        let mut state = PlaybackState::new(&clip, true);
        assert!(state.advance(0.25));
        assert_eq!(state.time, 250.0);
    }

    #[test]
    fn test_advance_without_clip() {
        let mut state = PlaybackState::idle();
        assert!(!state.advance(1.0));
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_set_clip_resets_time() {
        let clip = two_keyframe_clip(1000.0);
        let mut state = PlaybackState::new(&clip, true);
        state.seek(300.0);
        state.set_clip(Some(&clip));
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_evaluate_bind_pose_clip_is_identity() {
        let mut model = MemoryModel::new();
        let root = model.add_bone("root", None, Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_x(0.4));
        model.add_bone("child", Some(root), Vec3::new(0.0, 2.0, 0.5), Quat::from_rotation_y(1.1));
        let idle = model.add_action("idle");
        let bind = [
            (Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_x(0.4)),
            (Vec3::new(0.0, 2.0, 0.5), Quat::from_rotation_y(1.1)),
        ];
        model.add_frame(idle, 0, &bind);
        model.add_frame(idle, 800, &bind);

        let skeleton = Skeleton::from_source(&model).unwrap();
        let clips = load_clips(&model).unwrap();
        let mut state = PlaybackState::new(&clips[0], true);
        let mut out = [Mat4::ZERO; 3];

        evaluate(&mut out, Some(&skeleton), &mut state, 0.3);

        for m in &out {
            assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5), "{m:?}");
        }
    }

    #[test]
    fn test_evaluate_without_skeleton_is_noop() {
        let clip = two_keyframe_clip(1000.0);
        let mut state = PlaybackState::new(&clip, true);
        let mut out = [Mat4::ZERO; 1];

        evaluate(&mut out, None, &mut state, 0.5);

        assert_eq!(out[0], Mat4::ZERO);
        assert_eq!(state.time, 0.0);
    }
}
