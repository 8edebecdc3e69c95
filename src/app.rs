use anyhow::{bail, Context, Result};
use chrono::Local;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::info;

use crate::core::cleaner::TranscriptCleaner;
use crate::core::config::Config;
use crate::core::convert::FfmpegTranscoder;
use crate::core::discovery::{classify_file, discover_media, MediaFile};
use crate::core::orchestrator::{BatchSummary, Orchestrator};
use crate::core::transcription::WhisperTranscriber;
use crate::core::workflow::{select_workflow, WorkflowChoice};

pub struct RunOptions {
    /// Explicit input file; `None` means scan the whole input directory.
    pub file: Option<PathBuf>,
    /// Workflow fixed by CLI flags; `None` means ask interactively.
    pub workflow: Option<WorkflowChoice>,
    pub keep_intermediate: bool,
    pub no_pause: bool,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

pub async fn run(options: RunOptions) -> Result<()> {
    let config = Config::load()?;
    let input_dir = options
        .input_dir
        .unwrap_or_else(|| config.paths.input_dir.clone());
    let output_dir = options
        .output_dir
        .unwrap_or_else(|| config.paths.output_dir.clone());

    std::fs::create_dir_all(&input_dir)
        .with_context(|| format!("failed to create input directory {:?}", input_dir))?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {:?}", output_dir))?;

    print_banner();

    let files: Vec<MediaFile> = match &options.file {
        Some(path) => {
            if !path.exists() {
                bail!("input file not found: {:?}", path);
            }
            match classify_file(path) {
                Some(file) => vec![file],
                None => bail!("unsupported file type: {:?} (expected .mp4 or .m4a)", path),
            }
        }
        None => discover_media(&input_dir),
    };

    if files.is_empty() {
        println!("No MP4 or M4A files found in {}.", input_dir.display());
        println!("Put media files there and run again.");
        if !options.no_pause {
            pause_for_ack()?;
        }
        return Ok(());
    }

    for (i, file) in files.iter().enumerate() {
        println!("  {}. {}", i + 1, file.file_name());
    }
    println!();

    let workflow = match options.workflow {
        Some(choice) => choice,
        None => {
            let stdin = std::io::stdin();
            select_workflow(files.len(), stdin.lock(), std::io::stdout())?
        }
    };
    info!("Workflow for this run: {}", workflow.describe());
    println!("Workflow: {}\n", workflow.describe());

    let transcoder = FfmpegTranscoder::new(
        config.ffmpeg.binary.clone(),
        config.ffmpeg.probe_binary.clone(),
        config.ffmpeg.bitrate.clone(),
    );
    let transcriber = WhisperTranscriber::new(
        config.whisper.binary.clone(),
        config.whisper.model.clone(),
        config.whisper.transcription.clone(),
    );
    let cleaner = TranscriptCleaner::with_extra_phrases(&config.cleaner.extra_phrases);

    let orchestrator = Orchestrator::new(
        &transcoder,
        &transcriber,
        &cleaner,
        output_dir,
        options.keep_intermediate,
    );
    let outcome = orchestrator.run(files, workflow);

    print_summary(&outcome.summary);

    if !options.no_pause {
        pause_for_ack()?;
    }
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("         batchscribe - media to audio/transcript");
    println!("{}", "=".repeat(60));
    println!();
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("                    BATCH SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total files processed:     {}", summary.total);
    println!("Succeeded:                 {}", summary.succeeded);
    println!("Failed:                    {}", summary.failed);
    println!("Total time:                {}s", summary.elapsed.as_secs());
    if let Some(average) = summary.average() {
        println!("Average per file:          {}s", average.as_secs());
    }
    println!(
        "Finished at:               {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    if summary.failed == 0 {
        println!("\nAll files processed successfully.");
    } else {
        println!(
            "\n{} file(s) failed. Check the messages above.",
            summary.failed
        );
    }
}

fn pause_for_ack() -> Result<()> {
    println!("\nPress Enter to exit...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
