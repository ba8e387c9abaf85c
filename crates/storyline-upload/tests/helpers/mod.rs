//! Shared setup for upload pipeline integration tests.
//!
//! Run from workspace root: `cargo test -p storyline-upload`.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use storyline_core::{MediaKind, MediaPolicy};
use storyline_upload::test_helpers::MockTransport;
use storyline_upload::{ImageUploader, VideoUploader};

pub const MB: u64 = 1024 * 1024;

/// 5MB ceiling, JPEG/PNG/WebP
pub fn image_policy() -> MediaPolicy {
    MediaPolicy::new(
        MediaKind::Image,
        5 * MB,
        vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
        ],
    )
}

/// 20MB ceiling, MP4/WebM
pub fn video_policy() -> MediaPolicy {
    MediaPolicy::new(
        MediaKind::Video,
        20 * MB,
        vec!["video/mp4".to_string(), "video/webm".to_string()],
    )
}

pub fn image_uploader(transport: &Arc<MockTransport>) -> ImageUploader {
    ImageUploader::with_policy(image_policy(), transport.clone())
}

pub fn video_uploader(transport: &Arc<MockTransport>) -> VideoUploader {
    VideoUploader::with_policy(video_policy(), transport.clone())
}
