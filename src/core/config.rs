use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub ffmpeg: FfmpegConfig,
    pub whisper: WhisperConfig,
    pub cleaner: CleanerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    pub binary: PathBuf,
    pub probe_binary: PathBuf,
    pub bitrate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    pub binary: PathBuf,
    pub model: String,
    pub transcription: TranscriptionConfig,
}

/// Decoding parameters passed to the speech model. Process-wide constants,
/// never derived per file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub language: String,
    pub no_speech_threshold: f32,
    pub compression_ratio_threshold: f32,
    pub condition_on_previous_text: bool,
    pub suppress_tokens: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Extra hallucination phrases removed in addition to the built-in list.
    pub extra_phrases: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            ffmpeg: FfmpegConfig::default(),
            whisper: WhisperConfig::default(),
            cleaner: CleanerConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            probe_binary: PathBuf::from("ffprobe"),
            bitrate: "128k".to_string(),
        }
    }
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("whisper"),
            model: "medium".to_string(),
            transcription: TranscriptionConfig::default(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            // Forced: auto-detection on a short leading silence picks the
            // wrong language.
            language: "ko".to_string(),
            // Low enough that quiet leading segments are still emitted.
            no_speech_threshold: 0.1,
            compression_ratio_threshold: 2.4,
            condition_on_previous_text: false,
            suppress_tokens: "-1".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, then the per-user
    /// config directory; fall back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        for path in Self::candidate_paths() {
            if path.exists() {
                debug!("Loading config from {:?}", path);
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {:?}", path))?;
                let config: Config = toml::from_str(&content)
                    .with_context(|| format!("invalid config file {:?}", path))?;
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file {:?}", path))?;
        Ok(())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "batchscribe") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }
}
