use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::error::ToolError;

#[cfg(test)]
use mockall::automock;

/// Seam over the external transcoding tool.
///
/// The orchestrator only talks to this trait, so tests can substitute a mock
/// and the batch logic never depends on ffmpeg being installed.
#[cfg_attr(test, automock)]
pub trait Transcoder {
    /// Extract the audio track of `input` into an AAC/M4A file at `output`.
    fn extract_m4a(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Transcode an M4A file into a 128 kbps MP3 at `output`.
    fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Best-effort media duration in seconds; `None` when probing fails.
    fn probe_duration(&self, input: &Path) -> Option<f64>;
}

/// ffmpeg/ffprobe-backed transcoder.
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: PathBuf, ffprobe: PathBuf, bitrate: String) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            bitrate,
        }
    }

    fn run_ffmpeg(&self, args: Vec<OsString>, output: &Path) -> Result<(), ToolError> {
        debug!("Running ffmpeg {:?}", args);
        let result = Command::new(&self.ffmpeg)
            .args(&args)
            .output()
            .map_err(|e| ToolError::Launch {
                tool: "ffmpeg".to_string(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(ToolError::Failed {
                tool: "ffmpeg".to_string(),
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        // ffmpeg can exit zero without writing anything, e.g. for an input
        // with no audio track.
        if !output.exists() {
            return Err(ToolError::MissingOutput {
                tool: "ffmpeg".to_string(),
                path: output.to_path_buf(),
            });
        }

        Ok(())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn extract_m4a(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        info!("Extracting audio: {:?} -> {:?}", input, output);
        self.run_ffmpeg(m4a_args(input, output, &self.bitrate), output)
    }

    fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        info!("Transcoding to MP3: {:?} -> {:?}", input, output);
        self.run_ffmpeg(mp3_args(input, output, &self.bitrate), output)
    }

    fn probe_duration(&self, input: &Path) -> Option<f64> {
        let result = Command::new(&self.ffprobe)
            .arg("-v")
            .arg("error")
            .arg("-print_format")
            .arg("json")
            .arg("-show_format")
            .arg(input)
            .output()
            .ok()?;

        if !result.status.success() {
            debug!(
                "ffprobe failed for {:?}: {}",
                input,
                String::from_utf8_lossy(&result.stderr).trim()
            );
            return None;
        }

        let json: Value = serde_json::from_slice(&result.stdout).ok()?;
        json.get("format")?
            .get("duration")?
            .as_str()?
            .parse::<f64>()
            .ok()
    }
}

fn m4a_args(input: &Path, output: &Path, bitrate: &str) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.into(),
        "-vn".into(),
        "-acodec".into(),
        "aac".into(),
        "-b:a".into(),
        bitrate.into(),
        output.into(),
    ]
}

fn mp3_args(input: &Path, output: &Path, bitrate: &str) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.into(),
        "-acodec".into(),
        "libmp3lame".into(),
        "-b:a".into(),
        bitrate.into(),
        output.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn m4a_extraction_strips_video_and_uses_aac_at_configured_bitrate() {
        let args = as_strings(&m4a_args(
            Path::new("in.mp4"),
            Path::new("out.m4a"),
            "128k",
        ));
        assert!(args.contains(&"-vn".to_string()));
        let codec_pos = args.iter().position(|a| a == "-acodec").unwrap();
        assert_eq!(args[codec_pos + 1], "aac");
        let rate_pos = args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(args[rate_pos + 1], "128k");
        assert_eq!(args.last().unwrap(), "out.m4a");
    }

    #[test]
    fn mp3_transcode_uses_lame_encoder() {
        let args = as_strings(&mp3_args(
            Path::new("in.m4a"),
            Path::new("out.mp3"),
            "128k",
        ));
        let codec_pos = args.iter().position(|a| a == "-acodec").unwrap();
        assert_eq!(args[codec_pos + 1], "libmp3lame");
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[test]
    fn conversions_overwrite_existing_outputs() {
        // The original tool always ran with overwrite enabled; re-running a
        // batch must not stall on an interactive ffmpeg prompt.
        let args = as_strings(&m4a_args(Path::new("a"), Path::new("b"), "128k"));
        assert_eq!(args[0], "-y");
    }
}
