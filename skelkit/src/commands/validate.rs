//! `skelkit validate`: structural checks plus a trial load

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use skelkit_anim::LoadOptions;
use skelkit_asset::{ModelDocument, build_mesh};

pub fn execute(path: &Path) -> Result<()> {
    println!("Validating model: {}", path.display());

    // `load` runs the reference checks
    let doc = ModelDocument::load(path)
        .with_context(|| format!("Validation failed for {}", path.display()))?;

    let options = LoadOptions::default();
    if doc.bones.is_empty() {
        info!("No bones, skipping skeleton and clip checks");
    } else {
        let skeleton = doc
            .skeleton(&options)
            .context("Skeleton could not be built")?;
        let clips = doc.clips(&options).context("Clips could not be built")?;
        println!(
            "Skeleton: {} bones, {} clips",
            skeleton.bone_count(),
            clips.len()
        );
        for clip in clips.iter().filter(|c| !c.is_playable()) {
            println!(
                "⚠ Clip '{}' has {} keyframe(s) and will not animate",
                clip.name(),
                clip.keyframe_count()
            );
        }
    }

    let mesh = build_mesh(&doc).context("Mesh could not be built")?;
    println!(
        "Mesh: {} triangles, {} unique vertices",
        mesh.element_count() / 3,
        mesh.vertex_count()
    );

    println!("✓ Model is valid");
    Ok(())
}
