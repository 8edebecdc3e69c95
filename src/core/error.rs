use std::path::PathBuf;
use thiserror::Error;

/// Failure of an external tool invocation (ffmpeg, ffprobe, whisper).
///
/// The stderr of a failed tool is preserved verbatim so the operator can see
/// what the tool itself reported.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {code}: {stderr}")]
    Failed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} reported success but {path:?} was not created")]
    MissingOutput { tool: String, path: PathBuf },

    #[error("could not read {tool} output file {path:?}: {source}")]
    UnreadableOutput {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_preserves_tool_stderr() {
        let err = ToolError::Failed {
            tool: "ffmpeg".to_string(),
            code: 1,
            stderr: "Invalid data found when processing input".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("Invalid data found"));
    }
}
