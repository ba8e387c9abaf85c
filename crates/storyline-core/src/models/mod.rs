//! Domain models for media uploads

pub mod media;
pub mod upload;

pub use media::{
    content_type_for_extension, content_type_for_filename, FileSelection, MediaKind, SelectedFile,
};
pub use upload::{MalformedResult, MediaDimensions, RawResponse, UploadResult};
