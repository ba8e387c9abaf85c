//! Storyline Core Library
//!
//! Domain models, the upload error taxonomy and configuration shared by the
//! upload pipeline, the HTTP client and the CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ApiSettings, MediaPolicy, UploadConfig};
pub use error::{format_file_size, get_error_message, ErrorCode, ErrorDetails, Severity, StandardError};
pub use models::{FileSelection, MediaDimensions, MediaKind, RawResponse, SelectedFile, UploadResult};
