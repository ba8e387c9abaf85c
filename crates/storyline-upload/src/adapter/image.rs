use std::sync::LazyLock;

use regex::Regex;
use storyline_core::models::{MediaKind, SelectedFile, UploadResult};

use super::MediaAdapter;
use crate::document::DocumentCommands;
use crate::markup::{escape_html, image_markup};

static IMAGE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)!\[Uploading .*?\.\.\.\]\(\)").expect("valid image placeholder pattern")
});

/// Image attachments: markdown-style placeholder, `<img>` markup
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAdapter;

impl MediaAdapter for ImageAdapter {
    const KIND: MediaKind = MediaKind::Image;

    fn placeholder(&self, file_name: &str) -> String {
        format!("![Uploading {}...]()", escape_html(file_name))
    }

    fn placeholder_pattern(&self) -> &Regex {
        &IMAGE_PLACEHOLDER
    }

    fn insert_markup<D>(&self, document: &mut D, result: &UploadResult, file: &SelectedFile)
    where
        D: DocumentCommands + ?Sized,
    {
        if let Some(markup) = image_markup(result, &file.name) {
            document.insert_content(&markup);
        }
    }
}
