//! `skelkit pose`: evaluate a clip at a fixed time

use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::Mat4;
use log::warn;
use serde::Serialize;
use skelkit_anim::{
    AnimationClip, BonePalette, LoadOptions, PlaybackState, Skeleton, Transform, evaluate,
};
use skelkit_asset::ModelDocument;

use crate::cli::OutputFormat;
use crate::utils::{format_matrix, format_vec3};

#[derive(Serialize)]
struct PoseReport<'a> {
    clip: &'a str,
    /// Normalized playback time in milliseconds
    time: f32,
    looping: bool,
    bones: Vec<BoneReport<'a>>,
}

#[derive(Serialize)]
struct BoneReport<'a> {
    index: usize,
    name: &'a str,
    bind: Transform,
    /// Palette entry as uploaded: 16 floats, column-major of the stored
    /// (transposed) matrix
    matrix: [f32; 16],
}

pub fn execute(
    path: &Path,
    clip_arg: &str,
    time: f32,
    looping: bool,
    format: OutputFormat,
) -> Result<()> {
    let doc = ModelDocument::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;
    let options = LoadOptions::default();
    let skeleton = doc.skeleton(&options)?;
    let clips = doc.clips(&options)?;

    let clip = select_clip(&clips, clip_arg)?;
    if !clip.is_playable() {
        warn!(
            "Clip '{}' has {} keyframes and cannot be evaluated; printing the rest pose",
            clip.name(),
            clip.keyframe_count()
        );
    }

    let mut palette = BonePalette::new();
    let mut state = PlaybackState::new(clip, looping);
    state.seek(time);
    evaluate(palette.as_mut_slice(), Some(&skeleton), &mut state, 0.0);

    let report = PoseReport {
        clip: clip.name(),
        time: state.time(),
        looping,
        bones: bone_reports(&skeleton, &palette),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

/// Pick a clip by index, falling back to a name lookup
fn select_clip<'a>(clips: &'a [AnimationClip], arg: &str) -> Result<&'a AnimationClip> {
    if clips.is_empty() {
        bail!("Model has no clips");
    }
    if let Ok(index) = arg.parse::<usize>() {
        if let Some(clip) = clips.get(index) {
            return Ok(clip);
        }
    }
    clips
        .iter()
        .find(|c| c.name() == arg)
        .with_context(|| {
            let names: Vec<_> = clips.iter().map(AnimationClip::name).collect();
            format!("No clip '{arg}' (available: {})", names.join(", "))
        })
}

fn bone_reports<'a>(skeleton: &'a Skeleton, palette: &BonePalette) -> Vec<BoneReport<'a>> {
    skeleton
        .bones()
        .iter()
        .zip(skeleton.bind_poses())
        .zip(palette.as_slice())
        .enumerate()
        .map(|(index, ((bone, bind), matrix))| BoneReport {
            index,
            name: &bone.name,
            bind: *bind,
            matrix: matrix.to_cols_array(),
        })
        .collect()
}

fn print_text(report: &PoseReport<'_>) {
    println!(
        "Clip '{}' at {} ms ({})",
        report.clip,
        report.time,
        if report.looping { "looping" } else { "clamped" }
    );
    for bone in &report.bones {
        // Undo the storage transpose for display
        let skin = Mat4::from_cols_array(&bone.matrix).transpose();
        println!(
            "\n[{}] {}  translation {}",
            bone.index,
            bone.name,
            format_vec3(skin.w_axis.truncate())
        );
        println!("{}", format_matrix(&skin, "  "));
    }
}
