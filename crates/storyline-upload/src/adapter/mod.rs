//! Media-kind adapters
//!
//! [`MediaUploader`] drives one upload against a document:
//! insert placeholder → upload → read back and clean → insert final markup.
//! The kind-specific parts (placeholder syntax, cleanup pattern, markup)
//! come from a [`MediaAdapter`].

mod image;
mod video;

pub use image::ImageAdapter;
pub use video::{VideoAdapter, DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH};

use std::sync::Arc;

use regex::Regex;
use storyline_core::config::{MediaPolicy, UploadConfig};
use storyline_core::error::StandardError;
use storyline_core::models::{FileSelection, MediaKind, SelectedFile, UploadResult};

use crate::controller::{UploadController, UploadState};
use crate::document::DocumentCommands;
use crate::transport::UploadTransport;

/// Kind-specific behaviour plugged into [`MediaUploader`]
pub trait MediaAdapter: Send + Sync {
    const KIND: MediaKind;

    /// Placeholder text shown while `file_name` uploads
    fn placeholder(&self, file_name: &str) -> String;

    /// Pattern matching any placeholder of this kind
    fn placeholder_pattern(&self) -> &Regex;

    /// Insert the final markup for a successful upload
    fn insert_markup<D>(&self, document: &mut D, result: &UploadResult, file: &SelectedFile)
    where
        D: DocumentCommands + ?Sized;
}

/// What a file-change handler did
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// No file selected or no document available
    Skipped,
    /// Another upload is in flight on this uploader
    Busy,
    Inserted(UploadResult),
    /// Upload failed; the error is `None` when the attempt was superseded
    Failed(Option<StandardError>),
}

pub struct MediaUploader<A: MediaAdapter> {
    controller: UploadController,
    adapter: A,
}

pub type ImageUploader = MediaUploader<ImageAdapter>;
pub type VideoUploader = MediaUploader<VideoAdapter>;

impl<A: MediaAdapter + Default> MediaUploader<A> {
    pub fn new(config: &UploadConfig, transport: Arc<dyn UploadTransport>) -> Self {
        Self::with_policy(config.policy(A::KIND).clone(), transport)
    }

    /// Build with an explicit policy; its kind is forced to the adapter's.
    pub fn with_policy(policy: MediaPolicy, transport: Arc<dyn UploadTransport>) -> Self {
        let policy = MediaPolicy {
            kind: A::KIND,
            ..policy
        };
        Self {
            controller: UploadController::new(policy, transport),
            adapter: A::default(),
        }
    }
}

impl<A: MediaAdapter> MediaUploader<A> {
    pub fn controller(&self) -> &UploadController {
        &self.controller
    }

    pub fn state(&self) -> UploadState {
        self.controller.state()
    }

    pub fn reset(&self) {
        self.controller.reset()
    }

    pub fn is_uploading(&self) -> bool {
        self.controller.is_uploading()
    }

    /// Value for the file picker's `accept` attribute
    pub fn accept_types(&self) -> String {
        self.controller.validator().accept_types()
    }

    /// Upload the first selected file into `document`.
    ///
    /// A new selection starts a fresh attempt, so a terminal state left by a
    /// previous upload is reset first.
    pub async fn handle_file_change<D>(
        &self,
        selection: &FileSelection,
        document: Option<&mut D>,
    ) -> UploadOutcome
    where
        D: DocumentCommands + ?Sized,
    {
        let (Some(file), Some(document)) = (selection.first(), document) else {
            return UploadOutcome::Skipped;
        };

        if self.controller.is_uploading() {
            tracing::warn!(file_name = %file.name, kind = %A::KIND, "Upload already in progress");
            return UploadOutcome::Busy;
        }
        if self.controller.state().is_terminal() {
            self.controller.reset();
        }

        let placeholder = self.adapter.placeholder(&file.name);
        document.insert_content(&placeholder);

        let result = self.controller.upload(file).await;

        // Exact placeholder first: a name may contain the pattern's terminator
        let html = document.get_html().replacen(&placeholder, "", 1);
        let cleaned = match result {
            Some(_) => html,
            None => self
                .adapter
                .placeholder_pattern()
                .replace_all(&html, "")
                .into_owned(),
        };
        document.set_content(&cleaned);

        match result {
            Some(result) => {
                self.adapter.insert_markup(document, &result, file);
                UploadOutcome::Inserted(result)
            }
            None => UploadOutcome::Failed(self.controller.state().error().cloned()),
        }
    }
}
