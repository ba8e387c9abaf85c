//! Storyline upload pipeline
//!
//! Validates a selected file against a [`MediaPolicy`](storyline_core::MediaPolicy),
//! sends it through an [`UploadTransport`], and splices the result into a
//! rich-text document with a placeholder shown while the upload runs.

pub mod adapter;
pub mod controller;
pub mod document;
pub mod markup;
pub mod transport;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use adapter::{
    ImageAdapter, ImageUploader, MediaAdapter, MediaUploader, UploadOutcome, VideoAdapter,
    VideoUploader,
};
pub use controller::{interpret_response, UploadController, UploadState, UploadStatus};
pub use document::{DocumentCommands, VideoEmbed, VideoEmbedAttrs};
pub use transport::{TransportError, UploadTransport};
pub use validator::{create_validation_error, MediaValidator, ValidationOutcome};
