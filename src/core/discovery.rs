use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Container kind of a discovered input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp4,
    M4a,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Some(MediaKind::Mp4),
            "m4a" => Some(MediaKind::M4a),
            _ => None,
        }
    }
}

/// An input media file, fixed at discovery time.
///
/// `duration` is probed from ffprobe after discovery and is only a hint for
/// the progress display.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub duration: Option<f64>,
}

impl MediaFile {
    pub fn new(path: PathBuf, kind: MediaKind) -> Self {
        Self {
            path,
            kind,
            duration: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}

/// Scan `dir` (non-recursive) for files with a supported media extension.
///
/// Matching is case-insensitive. The result is sorted by path so batches run
/// in a stable order. An empty result is not an error; the caller decides
/// what to tell the operator.
pub fn discover_media(dir: &Path) -> Vec<MediaFile> {
    let mut files: Vec<MediaFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let kind = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .and_then(MediaKind::from_extension)?;
            Some(MediaFile::new(entry.into_path(), kind))
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    files
}

/// Classify a single explicitly-named input file.
pub fn classify_file(path: &Path) -> Option<MediaFile> {
    let kind = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(MediaKind::from_extension)?;
    Some(MediaFile::new(path.to_path_buf(), kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn finds_supported_extensions_case_insensitively() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.mp4");
        touch(dir.path(), "b.MP4");
        touch(dir.path(), "c.m4a");
        touch(dir.path(), "d.M4A");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "clip.mkv");

        let files = discover_media(dir.path());
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.mp4", "b.MP4", "c.m4a", "d.M4A"]);
        assert_eq!(files[0].kind, MediaKind::Mp4);
        assert_eq!(files[2].kind, MediaKind::M4a);
    }

    #[test]
    fn empty_directory_yields_empty_list() {
        let dir = tempdir().unwrap();
        assert!(discover_media(dir.path()).is_empty());
    }

    #[test]
    fn ignores_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.mp4")).unwrap();
        touch(dir.path(), "real.mp4");

        let files = discover_media(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "real.mp4");
    }

    #[test]
    fn classify_rejects_unsupported_extension() {
        assert!(classify_file(Path::new("movie.avi")).is_none());
        let m = classify_file(Path::new("talk.mp4")).unwrap();
        assert_eq!(m.kind, MediaKind::Mp4);
    }
}
