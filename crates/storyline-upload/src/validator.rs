use storyline_core::config::MediaPolicy;
use storyline_core::error::{
    format_file_size, get_error_message, upload_error_suggestions, ErrorCode, ErrorDetails,
    StandardError,
};
use storyline_core::models::{content_type_for_extension, MediaKind, SelectedFile};

/// Result of checking a candidate file against a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accept,
    Reject(ErrorCode),
}

impl ValidationOutcome {
    pub fn is_accept(&self) -> bool {
        matches!(self, ValidationOutcome::Accept)
    }
}

/// Media file validator
///
/// Synchronous and side-effect free; runs before any network I/O.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    policy: MediaPolicy,
}

impl MediaValidator {
    pub fn new(policy: MediaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MediaPolicy {
        &self.policy
    }

    pub fn kind(&self) -> MediaKind {
        self.policy.kind
    }

    /// Effective MIME type: the declared one, or the one implied by the
    /// extension when nothing was declared.
    fn effective_content_type(&self, file: &SelectedFile) -> Option<String> {
        let declared = file.content_type.trim().to_lowercase();
        if !declared.is_empty() {
            return Some(declared);
        }
        file.extension()
            .and_then(|ext| content_type_for_extension(&ext))
            .map(str::to_string)
    }

    /// Validate content type against the allow-list
    pub fn validate_content_type(&self, file: &SelectedFile) -> Result<(), ErrorCode> {
        match self.effective_content_type(file) {
            Some(ct) if self.policy.allowed_content_types.contains(&ct) => Ok(()),
            _ => Err(ErrorCode::UploadInvalidFormat),
        }
    }

    /// Validate file size against the ceiling
    pub fn validate_file_size(&self, size: u64) -> Result<(), ErrorCode> {
        if size > self.policy.max_file_size {
            return Err(ErrorCode::UploadFileTooLarge);
        }
        Ok(())
    }

    /// Type first, then size.
    pub fn validate(&self, file: &SelectedFile) -> ValidationOutcome {
        match self
            .validate_content_type(file)
            .and_then(|_| self.validate_file_size(file.size))
        {
            Ok(()) => ValidationOutcome::Accept,
            Err(code) => ValidationOutcome::Reject(code),
        }
    }

    pub fn create_validation_error(&self, file: &SelectedFile, reason: ErrorCode) -> StandardError {
        create_validation_error(file, reason, &self.policy)
    }

    pub fn accept_types(&self) -> String {
        self.policy.accept_types()
    }
}

/// Convert a rejection into the shared error shape.
///
/// The message names the file; the details carry the policy's limits so a
/// caller can render them without parsing the message.
pub fn create_validation_error(
    file: &SelectedFile,
    reason: ErrorCode,
    policy: &MediaPolicy,
) -> StandardError {
    let kind = policy.kind;
    let max_size = format_file_size(policy.max_file_size);
    let allowed_formats = policy.allowed_formats();

    let (user_message, details) = match reason {
        ErrorCode::UploadFileTooLarge => (
            format!(
                "\"{}\" is too large ({}). Please choose a {} file smaller than {}.",
                file.name,
                format_file_size(file.size),
                kind,
                max_size
            ),
            ErrorDetails {
                max_file_size: Some(max_size),
                current_file_size: Some(format_file_size(file.size)),
                suggestions: upload_error_suggestions(reason, &allowed_formats),
                ..Default::default()
            },
        ),
        ErrorCode::UploadInvalidFormat => (
            format!(
                "\"{}\" is not a supported {} format. Please use {}.",
                file.name,
                kind,
                allowed_formats.join(", ")
            ),
            ErrorDetails {
                suggestions: upload_error_suggestions(reason, &allowed_formats),
                allowed_formats: Some(allowed_formats),
                ..Default::default()
            },
        ),
        other => (
            get_error_message(other, Some(kind), Some(&max_size)),
            ErrorDetails::default(),
        ),
    };

    StandardError::new(reason, user_message).with_details(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn image_validator() -> MediaValidator {
        MediaValidator::new(MediaPolicy::new(
            MediaKind::Image,
            5 * MB,
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        ))
    }

    fn video_validator() -> MediaValidator {
        MediaValidator::new(MediaPolicy::new(
            MediaKind::Video,
            20 * MB,
            vec!["video/mp4".to_string(), "video/webm".to_string()],
        ))
    }

    fn file_of(name: &str, content_type: &str, size: u64) -> SelectedFile {
        let mut file = SelectedFile::new(name, content_type, Vec::new());
        file.size = size;
        file
    }

    #[test]
    fn test_accepts_allowed_image() {
        let validator = image_validator();
        assert_eq!(
            validator.validate(&file_of("a.jpg", "image/jpeg", 2 * MB)),
            ValidationOutcome::Accept
        );
        assert!(validator
            .validate(&file_of("a.PNG", "IMAGE/PNG", 10))
            .is_accept());
    }

    #[test]
    fn test_rejects_disallowed_type() {
        let validator = image_validator();
        assert_eq!(
            validator.validate(&file_of("a.gif", "image/gif", 10)),
            ValidationOutcome::Reject(ErrorCode::UploadInvalidFormat)
        );
        assert_eq!(
            validator.validate(&file_of("clip.mp4", "video/mp4", 10)),
            ValidationOutcome::Reject(ErrorCode::UploadInvalidFormat)
        );
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        let validator = image_validator();
        assert!(validator.validate(&file_of("a.jpg", "image/jpeg", 5 * MB)).is_accept());
        assert_eq!(
            validator.validate(&file_of("a.jpg", "image/jpeg", 5 * MB + 1)),
            ValidationOutcome::Reject(ErrorCode::UploadFileTooLarge)
        );
    }

    #[test]
    fn test_type_checked_before_size() {
        let validator = image_validator();
        assert_eq!(
            validator.validate(&file_of("huge.bmp", "image/bmp", 50 * MB)),
            ValidationOutcome::Reject(ErrorCode::UploadInvalidFormat)
        );
    }

    #[test]
    fn test_empty_type_falls_back_to_extension() {
        let validator = image_validator();
        assert!(validator.validate(&file_of("photo.jpeg", "", 10)).is_accept());
        assert_eq!(
            validator.validate(&file_of("photo", "", 10)),
            ValidationOutcome::Reject(ErrorCode::UploadInvalidFormat)
        );
    }

    #[test]
    fn test_video_policy_is_independent() {
        let validator = video_validator();
        assert!(validator.validate(&file_of("clip.mp4", "video/mp4", 15 * MB)).is_accept());
        assert_eq!(
            validator.validate(&file_of("clip.mp4", "video/mp4", 50 * MB)),
            ValidationOutcome::Reject(ErrorCode::UploadFileTooLarge)
        );
    }

    #[test]
    fn test_too_large_error_details() {
        let validator = video_validator();
        let file = file_of("clip.mp4", "video/mp4", 50 * MB);
        let err = validator.create_validation_error(&file, ErrorCode::UploadFileTooLarge);

        assert_eq!(err.error_code, ErrorCode::UploadFileTooLarge);
        assert!(err.user_message.contains("clip.mp4"));
        assert!(err.user_message.contains("20.0MB"));
        let details = err.details.unwrap();
        assert_eq!(details.max_file_size.as_deref(), Some("20.0MB"));
        assert_eq!(details.current_file_size.as_deref(), Some("50.0MB"));
        assert!(details.suggestions.is_some());
    }

    #[test]
    fn test_invalid_format_error_details() {
        let validator = image_validator();
        let file = file_of("scan.tiff", "image/tiff", 10);
        let err = validator.create_validation_error(&file, ErrorCode::UploadInvalidFormat);

        assert!(err.user_message.contains("scan.tiff"));
        assert_eq!(
            err.allowed_formats(),
            Some(&["JPEG".to_string(), "PNG".to_string(), "WebP".to_string()][..])
        );
    }

    #[test]
    fn test_accept_types() {
        assert_eq!(
            image_validator().accept_types(),
            "image/jpeg,image/png,image/webp"
        );
    }
}
