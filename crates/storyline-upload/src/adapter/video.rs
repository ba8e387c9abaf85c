use std::sync::LazyLock;

use regex::Regex;
use storyline_core::models::{MediaKind, SelectedFile, UploadResult};

use super::MediaAdapter;
use crate::document::{DocumentCommands, VideoEmbedAttrs};
use crate::markup::{escape_html, video_markup};

/// Used when the endpoint returns no dimensions
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

static VIDEO_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[Uploading video: .*?\.\.\.\]").expect("valid video placeholder pattern")
});

/// Video attachments: bracketed placeholder, video block
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoAdapter;

impl VideoAdapter {
    pub fn embed_attrs(result: &UploadResult) -> Option<VideoEmbedAttrs> {
        let src = result.primary_url()?.to_string();
        let (width, height) = result
            .primary_dimensions()
            .map(|d| (d.width, d.height))
            .unwrap_or((DEFAULT_VIDEO_WIDTH, DEFAULT_VIDEO_HEIGHT));
        Some(VideoEmbedAttrs { src, width, height })
    }
}

impl MediaAdapter for VideoAdapter {
    const KIND: MediaKind = MediaKind::Video;

    fn placeholder(&self, file_name: &str) -> String {
        format!("[Uploading video: {}...]", escape_html(file_name))
    }

    fn placeholder_pattern(&self) -> &Regex {
        &VIDEO_PLACEHOLDER
    }

    fn insert_markup<D>(&self, document: &mut D, result: &UploadResult, _file: &SelectedFile)
    where
        D: DocumentCommands + ?Sized,
    {
        let Some(attrs) = Self::embed_attrs(result) else {
            return;
        };
        match document.video_embed() {
            Some(embed) => embed.embed_video(attrs),
            None => {
                tracing::debug!(src = %attrs.src, "Document has no video block, inserting <video> markup");
                document.insert_content(&video_markup(&attrs));
            }
        }
    }
}
