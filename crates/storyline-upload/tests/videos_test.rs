//! Video upload pipeline integration tests.
//!
//! Run with: `cargo test -p storyline-upload --test videos_test`

mod helpers;

use std::sync::Arc;

use helpers::fixtures::mp4;
use helpers::{video_uploader, MB};
use serde_json::json;
use storyline_core::ErrorCode;
use storyline_upload::test_helpers::{MemoryDocument, MockTransport};
use storyline_upload::{UploadOutcome, UploadStatus, VideoEmbedAttrs};

#[tokio::test]
async fn test_oversized_video_rejected_before_transport() {
    let transport = Arc::new(MockTransport::new());
    let uploader = video_uploader(&transport);
    let mut doc = MemoryDocument::new("<p>Clip:</p>");

    let outcome = uploader
        .handle_file_change(&mp4("clip.mp4", 50 * MB), Some(&mut doc))
        .await;

    let error = match outcome {
        UploadOutcome::Failed(Some(error)) => error,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(error.error_code, ErrorCode::UploadFileTooLarge);
    let details = error.details.as_ref().unwrap();
    assert_eq!(details.max_file_size.as_deref(), Some("20.0MB"));
    assert_eq!(uploader.state().status(), UploadStatus::Failed);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(doc.html(), "<p>Clip:</p>");
}

#[tokio::test]
async fn test_video_embed_uses_default_dimensions() {
    let transport = Arc::new(MockTransport::new().with_success(json!({ "urls": ["https://x/clip.mp4"] })));
    let uploader = video_uploader(&transport);
    let mut doc = MemoryDocument::new("").with_video_embeds();

    let outcome = uploader
        .handle_file_change(&mp4("clip.mp4", 15 * MB), Some(&mut doc))
        .await;

    assert!(matches!(outcome, UploadOutcome::Inserted(_)));
    assert_eq!(
        doc.embeds(),
        &[VideoEmbedAttrs {
            src: "https://x/clip.mp4".to_string(),
            width: 1280,
            height: 720,
        }]
    );
    assert!(!doc.html().contains("Uploading video"));
}

#[tokio::test]
async fn test_video_embed_uses_server_dimensions() {
    let transport = Arc::new(MockTransport::new().with_success(json!({
        "urls": ["https://x/clip.mp4"],
        "dimensions": [{ "width": 640, "height": 360 }]
    })));
    let uploader = video_uploader(&transport);
    let mut doc = MemoryDocument::new("").with_video_embeds();

    uploader
        .handle_file_change(&mp4("clip.mp4", MB), Some(&mut doc))
        .await;

    assert_eq!(doc.embeds()[0].width, 640);
    assert_eq!(doc.embeds()[0].height, 360);
}

#[tokio::test]
async fn test_document_without_video_blocks_gets_video_element() {
    let transport = Arc::new(MockTransport::new().with_success(json!({ "urls": ["https://x/clip.mp4"] })));
    let uploader = video_uploader(&transport);
    let mut doc = MemoryDocument::new("<p>Watch:</p>");

    uploader
        .handle_file_change(&mp4("clip.mp4", MB), Some(&mut doc))
        .await;

    assert_eq!(
        doc.html(),
        r#"<p>Watch:</p><video src="https://x/clip.mp4" width="1280" height="720" controls></video>"#
    );
    assert!(doc.embeds().is_empty());
}

#[tokio::test]
async fn test_failure_cleanup_handles_awkward_names() {
    for name in ["take 2...].mp4", "line\nbreak.mp4"] {
        let transport = Arc::new(MockTransport::new().with_failure(502, json!("Bad Gateway")));
        let uploader = video_uploader(&transport);
        let mut doc = MemoryDocument::new("<p>x</p>");

        uploader
            .handle_file_change(&mp4(name, MB), Some(&mut doc))
            .await;

        assert_eq!(doc.html(), "<p>x</p>", "residue left for {:?}", name);
    }
}

#[tokio::test]
async fn test_failed_video_upload_cleans_placeholder() {
    let transport = Arc::new(MockTransport::new().with_failure(
        500,
        json!({
            "detail": {
                "error_code": "UPLOAD_PROCESSING_FAILED",
                "user_message": "There was an error processing your video. Please try a different file."
            }
        }),
    ));
    let uploader = video_uploader(&transport);
    let mut doc = MemoryDocument::new("<p>Before</p><p>After</p>").with_cursor("<p>Before</p>".len());

    let outcome = uploader
        .handle_file_change(&mp4("clip.mp4", MB), Some(&mut doc))
        .await;

    assert!(matches!(outcome, UploadOutcome::Failed(Some(_))));
    assert_eq!(doc.html(), "<p>Before</p><p>After</p>");
    assert_eq!(transport.calls()[0].kind, storyline_core::MediaKind::Video);
}
