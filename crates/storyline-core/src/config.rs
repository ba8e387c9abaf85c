//! Configuration module
//!
//! Upload limits are explicit values injected into validators rather than
//! module-level constants, so each deployment (and each test) can tune them.

use std::env;
use std::time::Duration;

use crate::models::MediaKind;

// Defaults match the upload endpoint's own limits
const IMAGE_MAX_FILE_SIZE_MB: u64 = 5;
const VIDEO_MAX_FILE_SIZE_MB: u64 = 100;
const DEFAULT_IMAGE_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";
const DEFAULT_VIDEO_CONTENT_TYPES: &str = "video/mp4,video/webm,video/quicktime,video/avi";
const DEFAULT_API_URL: &str = "http://localhost:5001";
const HTTP_TIMEOUT_SECS: u64 = 60;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Validation limits for one media kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaPolicy {
    pub kind: MediaKind,
    pub max_file_size: u64,
    /// Lowercased MIME types accepted for this kind
    pub allowed_content_types: Vec<String>,
}

impl MediaPolicy {
    pub fn new(kind: MediaKind, max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            kind,
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .filter(|ct| !ct.is_empty())
                .collect(),
        }
    }

    pub fn image_default() -> Self {
        Self::new(
            MediaKind::Image,
            IMAGE_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            split_list(DEFAULT_IMAGE_CONTENT_TYPES),
        )
    }

    pub fn video_default() -> Self {
        Self::new(
            MediaKind::Video,
            VIDEO_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            split_list(DEFAULT_VIDEO_CONTENT_TYPES),
        )
    }

    /// Human names of the allowed formats (`JPEG`, `WebP`, `QuickTime`, ...)
    pub fn allowed_formats(&self) -> Vec<String> {
        self.allowed_content_types
            .iter()
            .map(|ct| format_display_name(ct))
            .collect()
    }

    /// Comma-joined allow-list for a file picker's `accept` attribute
    pub fn accept_types(&self) -> String {
        self.allowed_content_types.join(",")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size == 0 {
            return Err(anyhow::anyhow!(
                "{} max file size must be greater than zero",
                self.kind
            ));
        }
        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "{} allowed content types cannot be empty",
                self.kind
            ));
        }
        Ok(())
    }
}

/// Display name for a MIME type.
pub fn format_display_name(content_type: &str) -> String {
    let subtype = content_type
        .split_once('/')
        .map(|(_, sub)| sub)
        .unwrap_or(content_type);
    match subtype {
        "jpeg" => "JPEG".to_string(),
        "webp" => "WebP".to_string(),
        "webm" => "WebM".to_string(),
        "quicktime" => "QuickTime".to_string(),
        "svg+xml" => "SVG".to_string(),
        other => other.to_uppercase(),
    }
}

/// Upload endpoint client settings
#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    /// Opaque bearer token obtained from the surrounding session
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

/// Full upload pipeline configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub image: MediaPolicy,
    pub video: MediaPolicy,
    pub api: ApiSettings,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            image: MediaPolicy::image_default(),
            video: MediaPolicy::video_default(),
            api: ApiSettings::default(),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let image_max_size = parse_mb(&lookup, "IMAGE_MAX_FILE_SIZE_MB", IMAGE_MAX_FILE_SIZE_MB)?;
        let video_max_size = parse_mb(&lookup, "VIDEO_MAX_FILE_SIZE_MB", VIDEO_MAX_FILE_SIZE_MB)?;

        let image = MediaPolicy::new(
            MediaKind::Image,
            image_max_size,
            split_list(
                &lookup("IMAGE_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPES.to_string()),
            ),
        );
        let video = MediaPolicy::new(
            MediaKind::Video,
            video_max_size,
            split_list(
                &lookup("VIDEO_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_VIDEO_CONTENT_TYPES.to_string()),
            ),
        );

        let base_url = lookup("STORYLINE_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let token = lookup("STORYLINE_API_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout_secs = parse_u64(&lookup, "STORYLINE_HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS)?;

        let config = Self {
            image,
            video,
            api: ApiSettings {
                base_url,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.image.validate()?;
        self.video.validate()?;
        if self.api.base_url.is_empty() {
            return Err(anyhow::anyhow!("STORYLINE_API_URL cannot be empty"));
        }
        if self.api.timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "STORYLINE_HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }
        Ok(())
    }

    pub fn policy(&self, kind: MediaKind) -> &MediaPolicy {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
        }
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

/// Megabyte value converted to bytes
fn parse_mb<F>(lookup: &F, key: &str, default: u64) -> Result<u64, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    parse_u64(lookup, key, default)?
        .checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
