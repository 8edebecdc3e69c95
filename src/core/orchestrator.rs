use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::cleaner::TranscriptCleaner;
use crate::core::convert::Transcoder;
use crate::core::discovery::{MediaFile, MediaKind};
use crate::core::progress::{BatchEta, FileProgress};
use crate::core::transcription::SpeechToText;
use crate::core::workflow::WorkflowChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One file's trip through the pipeline. Terminal status is set exactly
/// once; a job is never retried.
#[derive(Debug)]
pub struct ConversionJob {
    pub file: MediaFile,
    pub workflow: WorkflowChoice,
    pub status: JobStatus,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl ConversionJob {
    fn new(file: MediaFile, workflow: WorkflowChoice) -> Self {
        Self {
            file,
            workflow,
            status: JobStatus::Pending,
            elapsed: Duration::ZERO,
            error: None,
        }
    }
}

/// Aggregate result of a batch run, finalized after the last job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn average(&self) -> Option<Duration> {
        if self.total == 0 {
            None
        } else {
            Some(self.elapsed / self.total as u32)
        }
    }
}

pub struct BatchOutcome {
    pub summary: BatchSummary,
    pub jobs: Vec<ConversionJob>,
}

/// Runs one workflow choice across a list of files, strictly sequentially.
///
/// The external speech model saturates a single accelerator, so there is no
/// point running files concurrently. A failed job never stops the batch;
/// the orchestrator records the error and moves to the next file.
pub struct Orchestrator<'a> {
    transcoder: &'a dyn Transcoder,
    speech: &'a dyn SpeechToText,
    cleaner: &'a TranscriptCleaner,
    output_dir: PathBuf,
    keep_intermediate: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        transcoder: &'a dyn Transcoder,
        speech: &'a dyn SpeechToText,
        cleaner: &'a TranscriptCleaner,
        output_dir: PathBuf,
        keep_intermediate: bool,
    ) -> Self {
        Self {
            transcoder,
            speech,
            cleaner,
            output_dir,
            keep_intermediate,
        }
    }

    pub fn run(&self, files: Vec<MediaFile>, workflow: WorkflowChoice) -> BatchOutcome {
        let total = files.len();
        let mut eta = BatchEta::new(total);
        let mut jobs = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;

        for (index, mut file) in files.into_iter().enumerate() {
            if file.duration.is_none() {
                file.duration = self.transcoder.probe_duration(&file.path);
            }

            let mut job = ConversionJob::new(file, workflow);
            println!(
                "[{}/{}] Processing: {}",
                index + 1,
                total,
                job.file.file_name()
            );

            job.status = JobStatus::Running;
            let mut progress = FileProgress::start(job.file.duration);
            let started = Instant::now();

            match self.process(&job.file, workflow, &progress) {
                Ok(outputs) => {
                    progress.finish();
                    job.status = JobStatus::Succeeded;
                    succeeded += 1;
                    for output in &outputs {
                        println!("  ✓ wrote {}", output.display());
                    }
                    println!("  done ({}%)", progress.percent());
                }
                Err(e) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(format!("{:#}", e));
                    failed += 1;
                    warn!("Job failed for {}: {:#}", job.file.file_name(), e);
                    println!("  ✗ failed: {:#}", e);
                }
            }

            job.elapsed = started.elapsed();
            eta.record(job.elapsed);
            if index + 1 < total {
                if let Some(remaining) = eta.remaining() {
                    println!("  estimated time remaining: {}s", remaining.as_secs());
                }
            }
            jobs.push(job);
        }

        BatchOutcome {
            summary: BatchSummary {
                total,
                succeeded,
                failed,
                elapsed: eta.total_elapsed(),
            },
            jobs,
        }
    }

    /// Pipeline for one file: audio conversion, then transcription, then
    /// transcript cleanup. Returns the final artifacts written. Partial
    /// outputs of a failed job are left on disk; there is no rollback.
    fn process(
        &self,
        file: &MediaFile,
        workflow: WorkflowChoice,
        progress: &FileProgress,
    ) -> Result<Vec<PathBuf>> {
        let stem = file.stem();
        let m4a_path = self.output_dir.join(format!("{}.m4a", stem));
        let mp3_path = self.output_dir.join(format!("{}.mp3", stem));
        let txt_path = self.output_dir.join(format!("{}.txt", stem));

        let mut outputs = Vec::new();
        let mut intermediate: Option<PathBuf> = None;

        // Every workflow needs an M4A artifact: either a requested output,
        // or the stepping stone to MP3 and/or the transcript.
        let artifact = match file.kind {
            MediaKind::Mp4 => {
                self.transcoder.extract_m4a(&file.path, &m4a_path)?;
                println!("  audio extracted ({}%)", progress.percent());
                if workflow.wants_m4a() {
                    outputs.push(m4a_path.clone());
                } else {
                    intermediate = Some(m4a_path.clone());
                }
                m4a_path
            }
            MediaKind::M4a => {
                if workflow.wants_m4a() && file.path != m4a_path {
                    std::fs::copy(&file.path, &m4a_path)
                        .with_context(|| format!("failed to copy {:?} to {:?}", file.path, m4a_path))?;
                    outputs.push(m4a_path.clone());
                    m4a_path
                } else {
                    // The source is its own audio artifact; it is never
                    // treated as a deletable intermediate.
                    file.path.clone()
                }
            }
        };

        if workflow.wants_mp3() {
            self.transcoder.to_mp3(&artifact, &mp3_path)?;
            println!("  MP3 written ({}%)", progress.percent());
            outputs.push(mp3_path.clone());
        }

        if workflow.wants_text() {
            let raw = self.speech.transcribe(&artifact)?;
            let cleaned = self.cleaner.clean(&raw);
            std::fs::write(&txt_path, &cleaned)
                .with_context(|| format!("failed to write transcript {:?}", txt_path))?;
            println!("  transcript written ({}%)", progress.percent());
            outputs.push(txt_path);
        }

        if let Some(path) = intermediate {
            if !self.keep_intermediate {
                match std::fs::remove_file(&path) {
                    Ok(()) => info!("Removed intermediate file {:?}", path),
                    Err(e) => println!("  warning: could not remove {}: {}", path.display(), e),
                }
            }
        }

        Ok(outputs)
    }
}
