//! Final markup for uploaded media

use storyline_core::models::UploadResult;

use crate::document::VideoEmbedAttrs;

/// `sizes` attribute emitted with every responsive image
pub const RESPONSIVE_SIZES: &str = "(max-width: 500px) 500px, (max-width: 750px) 750px, 1200px";

/// Escape text for use inside a double-quoted attribute or element body
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Image element for the first uploaded asset.
///
/// srcset and dimensions → responsive image with explicit size;
/// srcset only → responsive image without size; neither → bare image.
pub fn image_markup(result: &UploadResult, alt: &str) -> Option<String> {
    let src = escape_html(result.primary_url()?);
    let alt = escape_html(alt);

    let markup = match (result.primary_srcset(), result.primary_dimensions()) {
        (Some(srcset), Some(dimensions)) => format!(
            r#"<img src="{}" srcset="{}" sizes="{}" width="{}" height="{}" alt="{}" />"#,
            src,
            escape_html(srcset),
            RESPONSIVE_SIZES,
            dimensions.width,
            dimensions.height,
            alt
        ),
        (Some(srcset), None) => format!(
            r#"<img src="{}" srcset="{}" sizes="{}" alt="{}" />"#,
            src,
            escape_html(srcset),
            RESPONSIVE_SIZES,
            alt
        ),
        (None, _) => format!(r#"<img src="{}" alt="{}" />"#, src, alt),
    };
    Some(markup)
}

/// Plain `<video>` element, used when the document has no video-block capability
pub fn video_markup(attrs: &VideoEmbedAttrs) -> String {
    format!(
        r#"<video src="{}" width="{}" height="{}" controls></video>"#,
        escape_html(&attrs.src),
        attrs.width,
        attrs.height
    )
}
