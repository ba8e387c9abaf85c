//! Rich-text document seam
//!
//! The editor is external. Adapters only need to insert markup at the caret,
//! read the serialized document back, and replace it. Embedding a video block
//! is an optional capability the document declares through
//! [`DocumentCommands::video_embed`].

/// Attributes of an embedded video block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbedAttrs {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// Video-block capability of a document
pub trait VideoEmbed {
    fn embed_video(&mut self, attrs: VideoEmbedAttrs);
}

pub trait DocumentCommands {
    /// Insert markup at the current caret position
    fn insert_content(&mut self, html: &str);

    /// Serialized document content
    fn get_html(&self) -> String;

    /// Replace the whole document content
    fn set_content(&mut self, html: &str);

    /// Video-embed capability, if the document supports video blocks
    fn video_embed(&mut self) -> Option<&mut dyn VideoEmbed> {
        None
    }
}
