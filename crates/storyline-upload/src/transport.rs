//! Transport seam for sending a file to the upload endpoint

use async_trait::async_trait;
use storyline_core::models::{MediaKind, RawResponse, SelectedFile};

/// Transport-level failures (no response was obtained)
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Sends one file to the upload endpoint and returns the raw response.
///
/// Implementations must not interpret the body; the controller owns
/// parsing and error normalisation.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send_file(
        &self,
        file: &SelectedFile,
        kind: MediaKind,
    ) -> Result<RawResponse, TransportError>;
}
