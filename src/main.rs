use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::info;

mod app;
mod core;

use crate::core::workflow::WorkflowChoice;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group = ArgGroup::new("mode").args([
    "m4a_only",
    "mp3_only",
    "audio_only",
    "text_only",
    "all",
]))]
struct Args {
    /// Convert a single file instead of scanning the input directory
    file: Option<PathBuf>,

    /// Only produce M4A audio
    #[arg(long)]
    m4a_only: bool,

    /// Only produce MP3 audio (via an intermediate M4A)
    #[arg(long)]
    mp3_only: bool,

    /// Produce both audio formats, no transcript
    #[arg(long)]
    audio_only: bool,

    /// Only produce a text transcript
    #[arg(long)]
    text_only: bool,

    /// Produce both audio formats and a transcript
    #[arg(long)]
    all: bool,

    /// Keep intermediate M4A files instead of deleting them
    #[arg(long)]
    keep_intermediate: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Override the input directory
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Override the output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batchscribe=info".into()),
        )
        .init();

    info!("batchscribe starting...");

    let args = Args::parse();
    let workflow = WorkflowChoice::from_flags(
        args.m4a_only,
        args.mp3_only,
        args.audio_only,
        args.text_only,
        args.all,
    );

    app::run(app::RunOptions {
        file: args.file,
        workflow,
        keep_intermediate: args.keep_intermediate,
        no_pause: args.no_pause,
        input_dir: args.input_dir,
        output_dir: args.output_dir,
    })
    .await
}
