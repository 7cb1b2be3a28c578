//! Root CLI structure for skelkit

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "skelkit")]
#[command(about = "Inspect, validate and pose skeletal animation models", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Output format for evaluated poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display bone hierarchy, clips and mesh statistics of a model
    Info {
        /// Path to the model document
        file: PathBuf,

        /// Show bind poses and per-keyframe timings
        #[arg(short, long)]
        detailed: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Evaluate a clip at a point in time and print the skinning matrices
    Pose {
        /// Path to the model document
        file: PathBuf,

        /// Clip name or index
        #[arg(short, long)]
        clip: String,

        /// Playback time in milliseconds
        #[arg(short, long, default_value = "0")]
        time: f32,

        /// Clamp at the end of the clip instead of looping
        #[arg(long)]
        no_loop: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check a model document for broken references and load errors
    Validate {
        /// Path to the model document
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
