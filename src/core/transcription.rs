use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::core::config::TranscriptionConfig;
use crate::core::error::ToolError;

#[cfg(test)]
use mockall::automock;

/// Seam over the external speech-recognition model.
#[cfg_attr(test, automock)]
pub trait SpeechToText {
    /// Transcribe one audio artifact, returning the raw (uncleaned) text.
    fn transcribe(&self, audio: &Path) -> Result<String, ToolError>;
}

/// Invokes the Whisper CLI once per audio artifact.
///
/// The decoding parameters are process-wide constants, not derived per file.
/// The language is forced rather than auto-detected: detection on a short
/// leading silence misidentifies the language, forcing removes that failure
/// mode entirely.
pub struct WhisperTranscriber {
    binary: PathBuf,
    model: String,
    config: TranscriptionConfig,
}

impl WhisperTranscriber {
    pub fn new(binary: PathBuf, model: String, config: TranscriptionConfig) -> Self {
        Self {
            binary,
            model,
            config,
        }
    }
}

impl SpeechToText for WhisperTranscriber {
    fn transcribe(&self, audio: &Path) -> Result<String, ToolError> {
        info!("Transcribing audio file: {:?}", audio);

        let work_dir = work_dir(audio);
        let args = whisper_args(audio, work_dir, &self.model, &self.config);
        debug!("Running whisper {:?}", args);

        let result = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| ToolError::Launch {
                tool: "whisper".to_string(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(ToolError::Failed {
                tool: "whisper".to_string(),
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        // Whisper writes a <stem>.txt sidecar into the output directory.
        // Read it, then remove it; the cleaned transcript is written by the
        // orchestrator, not the model.
        let sidecar = transcript_sidecar(audio, work_dir);
        if sidecar.exists() {
            let text =
                std::fs::read_to_string(&sidecar).map_err(|e| ToolError::UnreadableOutput {
                    tool: "whisper".to_string(),
                    path: sidecar.clone(),
                    source: e,
                })?;
            std::fs::remove_file(&sidecar).ok();
            Ok(text.trim().to_string())
        } else {
            // Fallback: some whisper builds only print to stdout.
            Ok(String::from_utf8_lossy(&result.stdout).trim().to_string())
        }
    }
}

/// Directory whisper should write its sidecar into.
///
/// `Path::parent` returns `Some("")` for a bare relative filename, which
/// would hand whisper an empty `--output_dir`; treat that as the current
/// directory.
fn work_dir(audio: &Path) -> &Path {
    audio
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Path of the plain-text sidecar whisper writes for `audio`.
fn transcript_sidecar(audio: &Path, work_dir: &Path) -> PathBuf {
    let stem = audio
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut name = stem;
    name.push(".txt");
    work_dir.join(name)
}

fn whisper_args(
    audio: &Path,
    output_dir: &Path,
    model: &str,
    cfg: &TranscriptionConfig,
) -> Vec<OsString> {
    vec![
        audio.into(),
        "--model".into(),
        model.into(),
        "--language".into(),
        cfg.language.as_str().into(),
        "--task".into(),
        "transcribe".into(),
        "--output_format".into(),
        "txt".into(),
        "--output_dir".into(),
        output_dir.into(),
        "--no_speech_threshold".into(),
        cfg.no_speech_threshold.to_string().into(),
        "--compression_ratio_threshold".into(),
        cfg.compression_ratio_threshold.to_string().into(),
        "--condition_on_previous_text".into(),
        bool_flag(cfg.condition_on_previous_text).into(),
        "--suppress_tokens".into(),
        cfg.suppress_tokens.as_str().into(),
        "--word_timestamps".into(),
        "False".into(),
        "--verbose".into(),
        "False".into(),
    ]
}

fn bool_flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> Vec<String> {
        whisper_args(
            Path::new("talk.m4a"),
            Path::new("out"),
            "medium",
            &TranscriptionConfig::default(),
        )
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
    }

    fn value_of(args: &[String], flag: &str) -> String {
        let pos = args.iter().position(|a| a == flag).unwrap();
        args[pos + 1].clone()
    }

    #[test]
    fn language_is_forced_not_auto_detected() {
        let args = default_args();
        assert_eq!(
            value_of(&args, "--language"),
            TranscriptionConfig::default().language
        );
        assert!(!args.contains(&"auto".to_string()));
    }

    #[test]
    fn quiet_leading_speech_is_kept_by_a_low_no_speech_threshold() {
        let args = default_args();
        let threshold: f32 = value_of(&args, "--no_speech_threshold").parse().unwrap();
        assert!(threshold <= 0.2);
    }

    #[test]
    fn previous_text_conditioning_and_timestamps_are_disabled() {
        let args = default_args();
        assert_eq!(value_of(&args, "--condition_on_previous_text"), "False");
        assert_eq!(value_of(&args, "--word_timestamps"), "False");
        assert_eq!(value_of(&args, "--output_format"), "txt");
    }

    #[test]
    fn sidecar_path_follows_audio_stem() {
        let sidecar = transcript_sidecar(Path::new("out/talk.m4a"), Path::new("out"));
        assert_eq!(sidecar, PathBuf::from("out/talk.txt"));
    }

    #[test]
    fn bare_filename_transcribes_into_the_current_directory() {
        assert_eq!(work_dir(Path::new("memo.m4a")), Path::new("."));
        assert_eq!(work_dir(Path::new("out/talk.m4a")), Path::new("out"));
        let sidecar = transcript_sidecar(Path::new("memo.m4a"), work_dir(Path::new("memo.m4a")));
        assert_eq!(sidecar, PathBuf::from("./memo.txt"));
    }
}
