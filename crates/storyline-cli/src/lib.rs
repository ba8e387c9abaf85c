use std::path::Path;

use anyhow::{Context, Result};
use storyline_core::error::StandardError;
use storyline_core::models::{content_type_for_filename, MediaKind, SelectedFile};
use storyline_upload::document::DocumentCommands;

const BODY_CLOSE: &str = "</body>";

/// HTML file edited in place. Content is inserted at the end of `<body>`,
/// or at the end of the file when there is no body element.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Load a document; a missing file starts empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        Ok(Self::new(html))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.html)
            .with_context(|| format!("Failed to write document: {}", path.display()))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    fn insertion_point(&self) -> usize {
        self.html
            .to_ascii_lowercase()
            .rfind(BODY_CLOSE)
            .unwrap_or(self.html.len())
    }
}

impl DocumentCommands for HtmlDocument {
    fn insert_content(&mut self, html: &str) {
        let at = self.insertion_point();
        self.html.insert_str(at, html);
    }

    fn get_html(&self) -> String {
        self.html.clone()
    }

    fn set_content(&mut self, html: &str) {
        self.html = html.to_string();
    }
}

/// Media kind implied by a file's declared type or extension.
pub fn detect_kind(file: &SelectedFile) -> Option<MediaKind> {
    let content_type = if file.content_type.is_empty() {
        content_type_for_filename(&file.name)?
    } else {
        file.content_type.as_str()
    };
    if content_type.starts_with("image/") {
        Some(MediaKind::Image)
    } else if content_type.starts_with("video/") {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// One-screen rendering of an upload error for the terminal.
pub fn render_error(error: &StandardError) -> String {
    let mut out = format!("[{}] {}", error.error_code, error.user_message);
    if let Some(details) = &error.details {
        if let (Some(current), Some(max)) = (&details.current_file_size, &details.max_file_size) {
            out.push_str(&format!("\n  size: {} (limit {})", current, max));
        }
        if let Some(formats) = &details.allowed_formats {
            out.push_str(&format!("\n  allowed: {}", formats.join(", ")));
        }
        for suggestion in details.suggestions.iter().flatten() {
            out.push_str(&format!("\n  - {}", suggestion));
        }
    }
    out
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
