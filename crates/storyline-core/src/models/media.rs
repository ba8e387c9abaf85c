use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Media kinds the editor can embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file picked by the user, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name, including extension
    pub name: String,
    /// Declared MIME type; empty when the picker could not tell
    pub content_type: String,
    pub size: u64,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();
        let content_type = content_type_for_filename(&name).unwrap_or_default().to_string();

        Ok(Self::new(name, content_type, data))
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// File-selection event from a file input. Only the first file is used.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    pub files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn single(file: SelectedFile) -> Self {
        Self { files: vec![file] }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }
}

/// Map a lowercased extension to the MIME type it implies.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/avi",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        _ => return None,
    };
    Some(content_type)
}

pub fn content_type_for_filename(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
    content_type_for_extension(&extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_content_type_for_filename() {
        assert_eq!(content_type_for_filename("a.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for_filename("clip.mov"), Some("video/quicktime"));
        assert_eq!(content_type_for_filename("notes.txt"), None);
        assert_eq!(content_type_for_filename("noextension"), None);
    }

    #[test]
    fn test_from_path_reads_size_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 42]).unwrap();

        let selected = SelectedFile::from_path(&path).unwrap();
        assert_eq!(selected.name, "cover.png");
        assert_eq!(selected.content_type, "image/png");
        assert_eq!(selected.size, 42);
        assert_eq!(selected.extension().as_deref(), Some("png"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(&dir.path().join("missing.jpg")).is_err());
    }

    #[test]
    fn test_file_selection_first() {
        assert!(FileSelection::empty().first().is_none());
        let selection = FileSelection::single(SelectedFile::new("a.jpg", "image/jpeg", vec![1, 2, 3]));
        assert_eq!(selection.first().map(|f| f.size), Some(3));
    }
}
