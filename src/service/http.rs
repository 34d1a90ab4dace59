// codegen-preview: HTTP client for the code-generation service

use super::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HttpService talks to `POST {service_url}/generate-code`.
///
/// `service_url` is the address of the generation service itself. The
/// user-edited base URL travels inside the request body.
pub struct HttpService {
    service_url: String,
    client: Client,
}

impl HttpService {
    /// With `timeout` unset the client waits until the transport gives up.
    pub fn new(service_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            service_url: service_url.into(),
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/generate-code", self.service_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CodegenService for HttpService {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ServiceError> {
        let url = self.endpoint();

        tracing::debug!(
            url = %url,
            language = %request.language,
            base_url = %request.base_url,
            "Sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, body_len = body.len(), "Generation service error");
            return Err(ServiceError::from_status(status.as_u16(), &body));
        }

        tracing::debug!(status = %status, body_len = body.len(), "Generation response received");
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<GenerationResult, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse(e.to_string()))
}
