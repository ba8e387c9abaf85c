//! Test fixtures: selected files of a given declared size.

use storyline_core::{FileSelection, SelectedFile};

/// A file whose reported size is `size` without allocating it.
pub fn file_with_size(name: &str, content_type: &str, size: u64) -> SelectedFile {
    let mut file = SelectedFile::new(name, content_type, vec![0u8; 16]);
    file.size = size;
    file
}

pub fn jpeg(name: &str, size: u64) -> FileSelection {
    FileSelection::single(file_with_size(name, "image/jpeg", size))
}

pub fn mp4(name: &str, size: u64) -> FileSelection {
    FileSelection::single(file_with_size(name, "video/mp4", size))
}
