//! Single-flight upload controller
//!
//! Owns the lifecycle of sending one file: validate, call the transport,
//! normalise the response, and expose the outcome as [`UploadState`].
//!
//! Every attempt is tagged with a generation number. `reset()` and each new
//! attempt advance it, and a completion whose generation is no longer
//! current is discarded without touching state.

use std::sync::Arc;

use parking_lot::Mutex;
use storyline_core::config::MediaPolicy;
use storyline_core::error::StandardError;
use storyline_core::models::{MediaKind, RawResponse, SelectedFile, UploadResult};

use crate::transport::UploadTransport;
use crate::validator::{MediaValidator, ValidationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// Observable controller state. A result exists only in `Succeeded` and an
/// error only in `Failed`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Succeeded(UploadResult),
    Failed(StandardError),
}

impl UploadState {
    pub fn status(&self) -> UploadStatus {
        match self {
            UploadState::Idle => UploadStatus::Idle,
            UploadState::Uploading => UploadStatus::Uploading,
            UploadState::Succeeded(_) => UploadStatus::Succeeded,
            UploadState::Failed(_) => UploadStatus::Failed,
        }
    }

    pub fn result(&self) -> Option<&UploadResult> {
        match self {
            UploadState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&StandardError> {
        match self {
            UploadState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded(_) | UploadState::Failed(_))
    }
}

struct Inner {
    state: UploadState,
    generation: u64,
}

pub struct UploadController {
    validator: MediaValidator,
    transport: Arc<dyn UploadTransport>,
    inner: Mutex<Inner>,
}

impl UploadController {
    pub fn new(policy: MediaPolicy, transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            validator: MediaValidator::new(policy),
            transport,
            inner: Mutex::new(Inner {
                state: UploadState::Idle,
                generation: 0,
            }),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.validator.kind()
    }

    pub fn validator(&self) -> &MediaValidator {
        &self.validator
    }

    /// Snapshot of the current state
    pub fn state(&self) -> UploadState {
        self.inner.lock().state.clone()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.inner.lock().state, UploadState::Uploading)
    }

    /// Return to `Idle`, clearing any result or error.
    ///
    /// An in-flight transport call is not cancelled; its completion is
    /// discarded when it settles.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = UploadState::Idle;
        tracing::debug!(kind = %self.kind(), generation = inner.generation, "Upload state reset");
    }

    /// Validate and upload one file.
    ///
    /// Only starts from `Idle`. A call made while another attempt is
    /// uploading, or before a terminal state has been reset, returns `None`
    /// immediately without touching state or the transport.
    pub async fn upload(&self, file: &SelectedFile) -> Option<UploadResult> {
        let kind = self.kind();

        let generation = {
            let mut inner = self.inner.lock();
            if !matches!(inner.state, UploadState::Idle) {
                tracing::warn!(
                    file_name = %file.name,
                    kind = %kind,
                    status = ?inner.state.status(),
                    "Upload rejected: controller is not idle"
                );
                return None;
            }

            inner.generation += 1;
            if let ValidationOutcome::Reject(reason) = self.validator.validate(file) {
                tracing::debug!(
                    file_name = %file.name,
                    kind = %kind,
                    error_code = %reason,
                    "Upload rejected by validation"
                );
                inner.state =
                    UploadState::Failed(self.validator.create_validation_error(file, reason));
                return None;
            }

            inner.state = UploadState::Uploading;
            inner.generation
        };

        tracing::info!(
            file_name = %file.name,
            kind = %kind,
            file_size = file.size,
            generation,
            "Uploading media"
        );

        let outcome = match self.transport.send_file(file, kind).await {
            Ok(response) => interpret_response(kind, response),
            Err(e) => {
                tracing::error!(error = %e, file_name = %file.name, "Upload transport failed");
                Err(StandardError::upload_network(e.to_string()))
            }
        };

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(
                file_name = %file.name,
                generation,
                current_generation = inner.generation,
                "Discarding stale upload completion"
            );
            return None;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(file_name = %file.name, urls = result.urls.len(), "Upload succeeded");
                inner.state = UploadState::Succeeded(result.clone());
                Some(result)
            }
            Err(error) => {
                inner.state = UploadState::Failed(error);
                None
            }
        }
    }
}

/// Normalise a raw response into a result or a [`StandardError`].
pub fn interpret_response(
    kind: MediaKind,
    response: RawResponse,
) -> Result<UploadResult, StandardError> {
    let RawResponse { ok, status, body } = response;

    if ok {
        let parsed = serde_json::from_value::<UploadResult>(body.clone())
            .map_err(|e| e.to_string())
            .and_then(|result| result.validate().map(|_| result).map_err(|e| e.to_string()));
        return parsed.map_err(|reason| {
            tracing::warn!(error = %reason, status, kind = %kind, "Upload response is malformed");
            StandardError::upload_network(format!(
                "HTTP {}: {}: {}",
                status,
                reason,
                raw_text(&body)
            ))
        });
    }

    match StandardError::from_response_body(&body) {
        Some(error) => {
            tracing::warn!(
                status,
                error_code = %error.error_code,
                request_id = ?error.request_id,
                "Upload endpoint returned an error"
            );
            Err(error.with_raw_message(raw_text(&body)))
        }
        None => {
            tracing::warn!(status, "Upload endpoint returned an unstructured error");
            Err(StandardError::upload_network(format!(
                "HTTP {}: {}",
                status,
                raw_text(&body)
            )))
        }
    }
}

fn raw_text(body: &serde_json::Value) -> String {
    match body {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
