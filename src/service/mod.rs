// codegen-preview: Code-generation service contract

pub mod http;

use crate::format::Format;
use crate::workflow::WorkflowDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown whenever the service gives no usable `detail`.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred while fetching code";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /generate-code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub workflow: WorkflowDefinition,
    pub language: Format,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub code: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("could not reach code-generation service: {0}")]
    Transport(String),
    #[error("code-generation service returned {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("malformed response from code-generation service: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Build a status error, pulling a non-empty string `detail` out of the body if there is one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail.as_str().map(str::to_string))
            .filter(|d| !d.is_empty());
        ServiceError::Status { status, detail }
    }

    /// Message shown to the user in the Failure view.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CodegenService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ServiceError>;
}
