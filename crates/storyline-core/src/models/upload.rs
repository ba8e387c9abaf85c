use serde::{Deserialize, Serialize};

/// Dimensions of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

impl MediaDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Response from the upload endpoint, describing the stored media.
///
/// `srcsets` and `dimensions`, when present, are index-aligned with `urls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcsets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<MediaDimensions>>,
}

/// Why an upload response body could not be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedResult {
    #[error("response contained no urls")]
    NoUrls,

    #[error("{field} has {actual} entries but urls has {expected}")]
    Misaligned {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl UploadResult {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            srcsets: None,
            dimensions: None,
        }
    }

    /// Check the shape invariants a successful response must satisfy.
    pub fn validate(&self) -> Result<(), MalformedResult> {
        if self.urls.is_empty() {
            return Err(MalformedResult::NoUrls);
        }
        if let Some(srcsets) = &self.srcsets {
            if srcsets.len() != self.urls.len() {
                return Err(MalformedResult::Misaligned {
                    field: "srcsets",
                    expected: self.urls.len(),
                    actual: srcsets.len(),
                });
            }
        }
        if let Some(dimensions) = &self.dimensions {
            if dimensions.len() != self.urls.len() {
                return Err(MalformedResult::Misaligned {
                    field: "dimensions",
                    expected: self.urls.len(),
                    actual: dimensions.len(),
                });
            }
        }
        Ok(())
    }

    pub fn primary_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    /// First srcset; the endpoint sends an empty string for media without variants.
    pub fn primary_srcset(&self) -> Option<&str> {
        self.srcsets
            .as_ref()?
            .first()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn primary_dimensions(&self) -> Option<MediaDimensions> {
        self.dimensions.as_ref()?.first().copied()
    }
}

/// Raw response handed back by a transport.
///
/// `body` is the decoded JSON body; transports wrap non-JSON bodies as a
/// JSON string so the text survives for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub ok: bool,
    pub status: u16,
    pub body: serde_json::Value,
}

impl RawResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body,
        }
    }
}
