//! In-memory document and scripted transport.
//!
//! Enabled for this crate's own tests and, through the `test-helpers`
//! feature, for integration tests and downstream crates.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use storyline_core::models::{MediaKind, RawResponse, SelectedFile};
use tokio::sync::Semaphore;

use crate::document::{DocumentCommands, VideoEmbed, VideoEmbedAttrs};
use crate::markup::video_markup;
use crate::transport::{TransportError, UploadTransport};

/// HTML string with a caret, standing in for a rich-text editor
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    html: String,
    cursor: usize,
    video_blocks: bool,
    embeds: Vec<VideoEmbedAttrs>,
}

impl MemoryDocument {
    /// Document with the caret at the end of `html`
    pub fn new(html: impl Into<String>) -> Self {
        let html = html.into();
        let cursor = html.len();
        Self {
            html,
            cursor,
            ..Default::default()
        }
    }

    /// Place the caret at byte offset `cursor`, clamped to a char boundary
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = self.clamp(cursor);
        self
    }

    /// Advertise the video-block capability
    pub fn with_video_embeds(mut self) -> Self {
        self.video_blocks = true;
        self
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Video blocks embedded through the capability
    pub fn embeds(&self) -> &[VideoEmbedAttrs] {
        &self.embeds
    }

    fn clamp(&self, cursor: usize) -> usize {
        let mut cursor = cursor.min(self.html.len());
        while !self.html.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }
}

impl DocumentCommands for MemoryDocument {
    fn insert_content(&mut self, html: &str) {
        self.html.insert_str(self.cursor, html);
        self.cursor += html.len();
    }

    fn get_html(&self) -> String {
        self.html.clone()
    }

    fn set_content(&mut self, html: &str) {
        self.html = html.to_string();
        self.cursor = self.clamp(self.cursor);
    }

    fn video_embed(&mut self) -> Option<&mut dyn VideoEmbed> {
        if self.video_blocks {
            Some(self as &mut dyn VideoEmbed)
        } else {
            None
        }
    }
}

impl VideoEmbed for MemoryDocument {
    fn embed_video(&mut self, attrs: VideoEmbedAttrs) {
        let markup = video_markup(&attrs);
        self.insert_content(&markup);
        self.embeds.push(attrs);
    }
}

/// A call observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub kind: MediaKind,
}

/// Transport answering from a script of responses, in order
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Semaphore>>,
}

/// Holds gated calls until released
#[derive(Clone)]
pub struct TransportGate {
    semaphore: Arc<Semaphore>,
}

impl TransportGate {
    /// Let one pending (or future) call complete
    pub fn release(&self) {
        self.semaphore.add_permits(1);
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success(self, body: Value) -> Self {
        self.with_response(RawResponse::new(200, body))
    }

    pub fn with_failure(self, status: u16, body: Value) -> Self {
        self.with_response(RawResponse::new(status, body))
    }

    pub fn with_response(self, response: RawResponse) -> Self {
        self.responses.lock().push_back(Ok(response));
        self
    }

    pub fn with_error(self, error: TransportError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Make every call wait for a [`TransportGate::release`]
    pub fn gated(mut self) -> (Self, TransportGate) {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gate = Some(semaphore.clone());
        (self, TransportGate { semaphore })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl UploadTransport for MockTransport {
    async fn send_file(
        &self,
        file: &SelectedFile,
        kind: MediaKind,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().push(RecordedCall {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.size,
            kind,
        });

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            permit.forget();
        }

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".to_string())))
    }
}
