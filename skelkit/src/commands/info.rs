//! `skelkit info`: hierarchy, clip and mesh overview of a model

use std::path::Path;

use anyhow::{Context, Result};
use skelkit_anim::{AnimationClip, LoadOptions, Skeleton};
use skelkit_asset::{ModelDocument, build_mesh};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, format_duration_ms,
    format_rotation, format_vec3, render_tree,
};

pub fn execute(path: &Path, detailed: bool, no_color: bool) -> Result<()> {
    let doc = ModelDocument::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;
    let options = LoadOptions::default();

    let title = if doc.name.is_empty() {
        path.display().to_string()
    } else {
        doc.name.clone()
    };
    println!("=== Model: {title} ===");
    println!("Scale: {}", doc.scale);
    println!("Vertex pool: {} entries", doc.vertices.len());

    if doc.bones.is_empty() {
        println!("\nNo bones: model is not animated");
    } else {
        let skeleton = doc.skeleton(&options)?;
        println!("\n=== Skeleton ({} bones, sentinel included) ===", skeleton.bone_count());
        let tree = TreeOptions {
            no_color,
            show_metadata: detailed,
            ..TreeOptions::default()
        };
        print!("{}", render_tree(&skeleton_tree(&title, &skeleton, detailed), &tree));

        let clips = doc.clips(&options)?;
        println!("\n=== Clips ({}) ===", clips.len());
        if !clips.is_empty() {
            print_clips(&clips, detailed);
        }
    }

    let mesh = build_mesh(&doc)?;
    println!("\n=== Mesh ===");
    println!(
        "Layout: {}",
        if mesh.is_skinned() { "skinned" } else { "static" }
    );
    println!("Faces: {}", doc.faces.len());
    println!("Unique vertices: {}", mesh.vertex_count());
    println!("Indices: {}", mesh.element_count());

    Ok(())
}

fn skeleton_tree(title: &str, skeleton: &Skeleton, detailed: bool) -> TreeNode {
    let mut root = TreeNode::new(title, NodeType::Model);
    for index in 0..skeleton.sentinel_index() {
        if skeleton.is_root(index) {
            root = root.add_child(bone_node(skeleton, index, detailed));
        }
    }
    let sentinel = skeleton.sentinel_index();
    root.add_child(TreeNode::new(
        format!("[{sentinel}] {}", skeleton.bones()[sentinel].name),
        NodeType::Sentinel,
    ))
}

fn bone_node(skeleton: &Skeleton, index: usize, detailed: bool) -> TreeNode {
    let mut node = TreeNode::new(
        format!("[{index}] {}", skeleton.bones()[index].name),
        NodeType::Bone,
    );
    if detailed {
        let bind = &skeleton.bind_poses()[index];
        node = node
            .with_metadata("position", format_vec3(bind.position))
            .with_metadata("rotation", format_rotation(bind.rotation));
    }
    for child in skeleton.children(index) {
        node = node.add_child(bone_node(skeleton, child, detailed));
    }
    node
}

fn print_clips(clips: &[AnimationClip], detailed: bool) {
    let mut table = create_table(&["#", "Name", "Keyframes", "Duration", "Playable"]);
    for (i, clip) in clips.iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                clip.name().to_string(),
                clip.keyframe_count().to_string(),
                format_duration_ms(clip.duration()),
                if clip.is_playable() { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    table.printstd();

    if detailed {
        for clip in clips {
            let times: Vec<String> = clip
                .keyframes()
                .iter()
                .map(|k| format!("{}", k.time))
                .collect();
            println!("  {}: [{}] ms", clip.name(), times.join(", "));
        }
    }
}
