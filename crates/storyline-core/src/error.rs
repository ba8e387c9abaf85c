//! Error taxonomy module
//!
//! Every failure the upload pipeline can surface is expressed as a
//! [`StandardError`]: a closed [`ErrorCode`], a display-ready message and an
//! optional structured [`ErrorDetails`] payload. Validation failures built on
//! the client and failures returned by the upload endpoint share this shape,
//! so callers have a single code path for rendering and branching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::MediaKind;

/// Machine-readable error codes. The set is closed: a server body carrying a
/// code outside it is not treated as a structured error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Upload errors
    UploadFileTooLarge,
    UploadInvalidFormat,
    UploadProcessingFailed,
    UploadNetworkError,

    // Validation errors
    ValidationError,
    ValidationRequiredField,
    ValidationInvalidFormat,

    // Authentication errors
    AuthenticationRequired,
    AuthenticationExpired,
    AuthenticationInvalid,

    // Authorization errors
    PermissionDenied,
    ResourceNotFound,

    // Network/System errors
    NetworkError,
    InternalError,
    ServiceUnavailable,
}

/// Severity hint for rendering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Static metadata for each code: (http_status, severity, recoverable).
fn error_code_static_metadata(code: ErrorCode) -> (u16, Severity, bool) {
    match code {
        ErrorCode::UploadFileTooLarge => (400, Severity::Warning, false),
        ErrorCode::UploadInvalidFormat => (400, Severity::Warning, false),
        ErrorCode::UploadProcessingFailed => (500, Severity::Error, true),
        ErrorCode::UploadNetworkError => (503, Severity::Error, true),
        ErrorCode::ValidationError => (400, Severity::Warning, false),
        ErrorCode::ValidationRequiredField => (400, Severity::Warning, false),
        ErrorCode::ValidationInvalidFormat => (400, Severity::Warning, false),
        ErrorCode::AuthenticationRequired => (401, Severity::Info, false),
        ErrorCode::AuthenticationExpired => (401, Severity::Info, false),
        ErrorCode::AuthenticationInvalid => (401, Severity::Warning, false),
        ErrorCode::PermissionDenied => (403, Severity::Warning, false),
        ErrorCode::ResourceNotFound => (404, Severity::Warning, false),
        ErrorCode::NetworkError => (503, Severity::Error, true),
        ErrorCode::InternalError => (500, Severity::Critical, true),
        ErrorCode::ServiceUnavailable => (503, Severity::Error, true),
    }
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UploadFileTooLarge => "UPLOAD_FILE_TOO_LARGE",
            ErrorCode::UploadInvalidFormat => "UPLOAD_INVALID_FORMAT",
            ErrorCode::UploadProcessingFailed => "UPLOAD_PROCESSING_FAILED",
            ErrorCode::UploadNetworkError => "UPLOAD_NETWORK_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ValidationRequiredField => "VALIDATION_REQUIRED_FIELD",
            ErrorCode::ValidationInvalidFormat => "VALIDATION_INVALID_FORMAT",
            ErrorCode::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            ErrorCode::AuthenticationExpired => "AUTHENTICATION_EXPIRED",
            ErrorCode::AuthenticationInvalid => "AUTHENTICATION_INVALID",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn severity(&self) -> Severity {
        error_code_static_metadata(*self).1
    }

    /// HTTP status the upload endpoint uses for this code
    pub fn http_status_code(&self) -> u16 {
        error_code_static_metadata(*self).0
    }

    /// Whether retrying the same file may succeed
    pub fn is_recoverable(&self) -> bool {
        error_code_static_metadata(*self).2
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional context information for errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_formats: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ErrorDetails {
    pub fn is_empty(&self) -> bool {
        self.max_file_size.is_none()
            && self.current_file_size.is_none()
            && self.allowed_formats.is_none()
            && self.field_errors.is_none()
            && self.suggestions.is_none()
            && self.resource_id.is_none()
    }
}

/// Error carrier shared by client-side validation and server responses.
///
/// Serializes to the endpoint's `StandardErrorResponse` wire shape.
/// `raw_message` is local diagnostics only and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{user_message}")]
pub struct StandardError {
    pub error_code: ErrorCode,
    pub user_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip)]
    pub raw_message: Option<String>,
}

impl StandardError {
    pub fn new(error_code: ErrorCode, user_message: impl Into<String>) -> Self {
        Self {
            error_code,
            user_message: user_message.into(),
            details: None,
            request_id: None,
            raw_message: None,
        }
    }

    /// Attach details, dropping them when they carry no field.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = if details.is_empty() {
            None
        } else {
            Some(details)
        };
        self
    }

    pub fn with_raw_message(mut self, raw: impl Into<String>) -> Self {
        self.raw_message = Some(raw.into());
        self
    }

    /// Generic upload network failure, keeping the raw cause for diagnostics.
    pub fn upload_network(raw: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UploadNetworkError,
            get_error_message(ErrorCode::UploadNetworkError, None, None),
        )
        .with_raw_message(raw)
    }

    /// Parse a structured error out of a response body.
    ///
    /// Accepts the error object at the top level or nested under `detail`.
    /// Returns `None` when the body is not a structured error with a known code.
    pub fn from_response_body(body: &serde_json::Value) -> Option<Self> {
        let candidate = if body.get("error_code").is_some() {
            body
        } else {
            body.get("detail").filter(|d| d.get("error_code").is_some())?
        };
        let mut error: StandardError = serde_json::from_value(candidate.clone()).ok()?;
        if error.details.as_ref().is_some_and(ErrorDetails::is_empty) {
            error.details = None;
        }
        Some(error)
    }

    pub fn severity(&self) -> Severity {
        self.error_code.severity()
    }

    pub fn is_recoverable(&self) -> bool {
        self.error_code.is_recoverable()
    }

    pub fn allowed_formats(&self) -> Option<&[String]> {
        self.details.as_ref()?.allowed_formats.as_deref()
    }
}

/// Format file size in human-readable form (`512B`, `1.5KB`, `5.0MB`).
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_bytes < KB {
        format!("{}B", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1}KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{:.1}MB", size_bytes as f64 / MB as f64)
    }
}

/// Message template for a code, specialised by media kind where one exists.
fn message_template(code: ErrorCode, kind: Option<MediaKind>) -> &'static str {
    match (code, kind) {
        (ErrorCode::UploadFileTooLarge, Some(MediaKind::Image)) => {
            "The image file is too large. Please choose a file smaller than {max_size}."
        }
        (ErrorCode::UploadFileTooLarge, Some(MediaKind::Video)) => {
            "The video file is too large. Please choose a file smaller than {max_size}."
        }
        (ErrorCode::UploadFileTooLarge, None) => {
            "The file is too large. Please choose a file smaller than {max_size}."
        }
        (ErrorCode::UploadInvalidFormat, Some(MediaKind::Image)) => {
            "This image format is not supported. Please use JPEG, PNG, GIF, or WebP."
        }
        (ErrorCode::UploadInvalidFormat, Some(MediaKind::Video)) => {
            "This video format is not supported. Please use MP4, WebM, QuickTime, or AVI."
        }
        (ErrorCode::UploadInvalidFormat, None) => "This file format is not supported.",
        (ErrorCode::UploadProcessingFailed, Some(MediaKind::Image)) => {
            "There was an error processing your image. Please try again or use a different image."
        }
        (ErrorCode::UploadProcessingFailed, Some(MediaKind::Video)) => {
            "There was an error processing your video. Please try again or use a different video."
        }
        (ErrorCode::UploadProcessingFailed, None) => {
            "There was an error processing your file. Please try again."
        }
        (ErrorCode::UploadNetworkError, _) => {
            "The upload could not reach the server. Please check your connection and try again."
        }
        (ErrorCode::ValidationError, _) => "Please check your input and try again.",
        (ErrorCode::ValidationRequiredField, _) => "Please fill in all required fields.",
        (ErrorCode::ValidationInvalidFormat, _) => "One or more fields have an invalid format.",
        (ErrorCode::AuthenticationRequired, _) => {
            "You need to be logged in to perform this action."
        }
        (ErrorCode::AuthenticationExpired, _) => "Your session has expired. Please log in again.",
        (ErrorCode::AuthenticationInvalid, _) => {
            "Your authentication is invalid. Please log in again."
        }
        (ErrorCode::PermissionDenied, _) => "You don't have permission to perform this action.",
        (ErrorCode::ResourceNotFound, _) => "The requested resource was not found.",
        (ErrorCode::NetworkError, _) => {
            "Network error occurred. Please check your connection and try again."
        }
        (ErrorCode::InternalError, _) => "An unexpected error occurred. Please try again later.",
        (ErrorCode::ServiceUnavailable, _) => {
            "Service is temporarily unavailable. Please try again later."
        }
    }
}

/// Get the formatted message for a code.
///
/// `max_size` fills the `{max_size}` slot; when absent the slot is dropped
/// along with its sentence.
pub fn get_error_message(code: ErrorCode, kind: Option<MediaKind>, max_size: Option<&str>) -> String {
    let template = message_template(code, kind);
    match (template.contains("{max_size}"), max_size) {
        (false, _) => template.to_string(),
        (true, Some(size)) => template.replace("{max_size}", size),
        (true, None) => template
            .split_once(". ")
            .map(|(first, _)| format!("{}.", first))
            .unwrap_or_else(|| template.to_string()),
    }
}

/// Suggestions attached to upload errors.
pub fn upload_error_suggestions(code: ErrorCode, allowed_formats: &[String]) -> Option<Vec<String>> {
    match code {
        ErrorCode::UploadFileTooLarge => Some(vec![
            "Compress the file using an online tool".to_string(),
            "Use a different file with smaller size".to_string(),
            "For images: convert to WebP format for better compression".to_string(),
        ]),
        ErrorCode::UploadInvalidFormat => Some(vec![format!(
            "Convert the file to one of the supported formats: {}",
            allowed_formats.join(", ")
        )]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_table() {
        assert_eq!(ErrorCode::UploadFileTooLarge.severity(), Severity::Warning);
        assert_eq!(ErrorCode::UploadInvalidFormat.severity(), Severity::Warning);
        assert_eq!(ErrorCode::UploadProcessingFailed.severity(), Severity::Error);
        assert_eq!(ErrorCode::UploadNetworkError.severity(), Severity::Error);
        assert_eq!(ErrorCode::AuthenticationRequired.severity(), Severity::Info);
        assert_eq!(ErrorCode::AuthenticationExpired.severity(), Severity::Info);
        assert_eq!(ErrorCode::AuthenticationInvalid.severity(), Severity::Warning);
        assert_eq!(ErrorCode::ResourceNotFound.severity(), Severity::Warning);
        assert_eq!(ErrorCode::InternalError.severity(), Severity::Critical);
        assert_eq!(ErrorCode::ServiceUnavailable.severity(), Severity::Error);
    }

    #[test]
    fn test_error_code_wire_format() {
        let json = serde_json::to_string(&ErrorCode::UploadFileTooLarge).unwrap();
        assert_eq!(json, "\"UPLOAD_FILE_TOO_LARGE\"");
        let code: ErrorCode = serde_json::from_str("\"SERVICE_UNAVAILABLE\"").unwrap();
        assert_eq!(code, ErrorCode::ServiceUnavailable);
        assert_eq!(code.as_str(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512B");
        assert_eq!(format_file_size(1536), "1.5KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0MB");
        assert_eq!(format_file_size(8_598_323), "8.2MB");
    }

    #[test]
    fn test_get_error_message_interpolates_max_size() {
        let msg = get_error_message(ErrorCode::UploadFileTooLarge, Some(MediaKind::Image), Some("5.0MB"));
        assert_eq!(
            msg,
            "The image file is too large. Please choose a file smaller than 5.0MB."
        );

        let without = get_error_message(ErrorCode::UploadFileTooLarge, None, None);
        assert_eq!(without, "The file is too large.");
    }

    #[test]
    fn test_from_response_body_top_level() {
        let body = serde_json::json!({
            "error_code": "UPLOAD_FILE_TOO_LARGE",
            "user_message": "The image file is too large.",
            "details": { "max_file_size": "5.0MB", "current_file_size": "8.2MB" },
            "request_id": "req_abc123"
        });

        let err = StandardError::from_response_body(&body).unwrap();
        assert_eq!(err.error_code, ErrorCode::UploadFileTooLarge);
        assert_eq!(err.request_id.as_deref(), Some("req_abc123"));
        let details = err.details.unwrap();
        assert_eq!(details.max_file_size.as_deref(), Some("5.0MB"));
        assert!(err.raw_message.is_none());
    }

    #[test]
    fn test_from_response_body_nested_detail() {
        let body = serde_json::json!({
            "detail": {
                "error_code": "UPLOAD_INVALID_FORMAT",
                "user_message": "This image format is not supported.",
                "details": { "allowed_formats": ["JPEG", "PNG"] }
            }
        });

        let err = StandardError::from_response_body(&body).unwrap();
        assert_eq!(err.error_code, ErrorCode::UploadInvalidFormat);
        assert_eq!(
            err.allowed_formats(),
            Some(&["JPEG".to_string(), "PNG".to_string()][..])
        );
    }

    #[test]
    fn test_from_response_body_rejects_unstructured() {
        assert!(StandardError::from_response_body(&serde_json::json!("Bad Gateway")).is_none());
        assert!(StandardError::from_response_body(&serde_json::json!({"detail": "Not authenticated"})).is_none());
        assert!(StandardError::from_response_body(&serde_json::json!({
            "error_code": "SOMETHING_NEW",
            "user_message": "?"
        }))
        .is_none());
    }

    #[test]
    fn test_empty_details_are_dropped() {
        let err = StandardError::new(ErrorCode::InternalError, "boom").with_details(ErrorDetails::default());
        assert!(err.details.is_none());

        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("raw_message").is_none());
    }

    #[test]
    fn test_display_is_user_message() {
        let err = StandardError::upload_network("connection refused");
        assert_eq!(err.error_code, ErrorCode::UploadNetworkError);
        assert_eq!(err.to_string(), err.user_message);
        assert_eq!(err.raw_message.as_deref(), Some("connection refused"));
        assert!(err.is_recoverable());
    }
}
