//! Keyframe animation clips sampled from a source model's actions

use log::{debug, warn};

use crate::error::Result;
use crate::hierarchy::{Bone, bones_from_source, compose_in_place};
use crate::options::{LoadOptions, MissingPosePolicy};
use crate::skeleton::bind_poses_from_source;
use crate::source::{SourceModel, read_local};
use crate::transform::Transform;

/// A point in time with a model-space pose for every bone
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// Time in milliseconds
    pub time: f32,
    /// One model-space transform per bone; the sentinel entry is identity
    pub pose: Vec<Transform>,
}

/// The keyframe pair bracketing a playback time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeSpan {
    /// Index of the earlier keyframe
    pub from: usize,
    /// Index of the later keyframe (0 when wrapping around a loop)
    pub to: usize,
    /// Interpolation factor in `[0, 1]`
    pub alpha: f32,
}

impl KeyframeSpan {
    /// Whether this span interpolates from the last keyframe back to the first
    pub fn wraps(&self) -> bool {
        self.to < self.from
    }
}

/// A named, time-ordered sequence of keyframes.
///
/// Keeps its own copy of the bone list so it can be used without the source
/// model. Keyframe times are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: String,
    bones: Vec<Bone>,
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    /// Assemble a clip from parts, sorting keyframes by time and dropping
    /// duplicate timestamps.
    pub fn new(name: impl Into<String>, bones: Vec<Bone>, mut keyframes: Vec<Keyframe>) -> Self {
        let name = name.into();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        let before = keyframes.len();
        keyframes.dedup_by(|later, earlier| later.time == earlier.time);
        if keyframes.len() != before {
            warn!(
                "Clip '{name}': dropped {} keyframes with duplicate timestamps",
                before - keyframes.len()
            );
        }
        Self {
            name,
            bones,
            keyframes,
        }
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bone list, sentinel last
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Number of bones, sentinel included
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Keyframes in increasing time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Number of keyframes
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Duration in milliseconds: the time of the last keyframe
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Whether the clip has enough keyframes to interpolate
    pub fn is_playable(&self) -> bool {
        self.keyframes.len() >= 2
    }

    /// Find the keyframe pair around `time` and the factor between them.
    ///
    /// `time` is expected to be normalized already (see `PlaybackState`).
    /// When looping, times at or past the last keyframe interpolate from the
    /// last keyframe toward the first, which is treated as lying at
    /// `duration + first.time`. Without looping those times hold the last
    /// keyframe. Times before the first keyframe hold the first keyframe.
    pub fn span_at(&self, time: f32, looping: bool) -> Option<KeyframeSpan> {
        let count = self.keyframes.len();
        if count < 2 {
            return None;
        }
        let last = count - 1;
        let duration = self.keyframes[last].time;

        if time >= duration && !looping {
            return Some(KeyframeSpan {
                from: last - 1,
                to: last,
                alpha: 1.0,
            });
        }

        let (mut from, mut to) = (0, 1);
        for k in 0..last {
            if time >= self.keyframes[k].time && time < self.keyframes[k + 1].time {
                from = k;
                to = k + 1;
                break;
            }
        }

        let wraps = time >= duration;
        if wraps {
            from = last;
            to = 0;
        }

        let t0 = self.keyframes[from].time;
        let t1 = self.keyframes[to].time;
        let (elapsed, span) = if wraps {
            (time - t0, duration - t0 + t1)
        } else {
            (time - t0, t1 - t0)
        };

        let alpha = if span > 0.0 { elapsed / span } else { 0.0 };
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };

        Some(KeyframeSpan { from, to, alpha })
    }
}

/// Load every action of `source` as a clip with default options
pub fn load_clips<S: SourceModel + ?Sized>(source: &S) -> Result<Vec<AnimationClip>> {
    load_clips_with(source, &LoadOptions::default())
}

/// Load every action of `source` as a clip.
///
/// Returns an empty list for a model without actions. Bone-list problems fail
/// the whole load, while frames without a pose sample are filled according to
/// `options.missing_pose` and logged.
pub fn load_clips_with<S: SourceModel + ?Sized>(
    source: &S,
    options: &LoadOptions,
) -> Result<Vec<AnimationClip>> {
    let action_count = source.action_count();
    if action_count == 0 {
        return Ok(Vec::new());
    }

    let bones = bones_from_source(source, options.max_bones)?;
    let bind_poses = bind_poses_from_source(source, &bones)?;

    let clips = (0..action_count)
        .map(|action| load_clip(source, action, &bones, &bind_poses, options.missing_pose))
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} animation clips", clips.len());
    Ok(clips)
}

/// Parallel variant of `load_clips_with`; clips are sampled on the rayon pool
#[cfg(feature = "parallel")]
pub fn load_clips_parallel<S: SourceModel + Sync + ?Sized>(
    source: &S,
    options: &LoadOptions,
) -> Result<Vec<AnimationClip>> {
    use rayon::prelude::*;

    let action_count = source.action_count();
    if action_count == 0 {
        return Ok(Vec::new());
    }

    let bones = bones_from_source(source, options.max_bones)?;
    let bind_poses = bind_poses_from_source(source, &bones)?;

    let clips = (0..action_count)
        .into_par_iter()
        .map(|action| load_clip(source, action, &bones, &bind_poses, options.missing_pose))
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} animation clips in parallel", clips.len());
    Ok(clips)
}

fn load_clip<S: SourceModel + ?Sized>(
    source: &S,
    action: usize,
    bones: &[Bone],
    bind_poses: &[Transform],
    policy: MissingPosePolicy,
) -> Result<AnimationClip> {
    let name = source.action_name(action);
    let real = bones.len() - 1;

    let mut times: Vec<u32> = (0..source.frame_count(action))
        .map(|frame| source.frame_time(action, frame))
        .collect();
    if !times.is_sorted() {
        warn!("Clip '{name}': frames are not in time order, sorting");
        times.sort_unstable();
    }
    let declared = times.len();
    times.dedup();
    if times.len() != declared {
        warn!(
            "Clip '{name}': dropped {} frames with duplicate timestamps",
            declared - times.len()
        );
    }

    let mut keyframes: Vec<Keyframe> = Vec::with_capacity(times.len());
    for msec in times {
        let sampled = source.pose_at(action, msec).filter(|s| s.len() >= real);
        let pose = if let Some(samples) = sampled {
            let mut pose = Vec::with_capacity(bones.len());
            for sample in &samples[..real] {
                pose.push(read_local(source, sample.position, sample.rotation)?);
            }
            pose.push(Transform::IDENTITY);
            compose_in_place(bones, &mut pose);
            pose
        } else {
            warn!("Clip '{name}': no pose sample at {msec} ms, using {policy:?}");
            match policy {
                MissingPosePolicy::HoldPrevious => keyframes
                    .last()
                    .map_or_else(|| bind_poses.to_vec(), |k| k.pose.clone()),
                MissingPosePolicy::BindPose => bind_poses.to_vec(),
                MissingPosePolicy::Identity => vec![Transform::IDENTITY; bones.len()],
            }
        };
        keyframes.push(Keyframe {
            time: msec as f32,
            pose,
        });
    }

    debug!("Clip '{name}': {} keyframes", keyframes.len());

    Ok(AnimationClip {
        name,
        bones: bones.to_vec(),
        keyframes,
    })
}
