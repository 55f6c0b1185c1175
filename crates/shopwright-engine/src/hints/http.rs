use super::{HintRequest, HintSource, map_transport_error};
use async_trait::async_trait;
use reqwest::Client;
use shopwright_common::{Hint, HintError};
use std::time::Duration;
use tracing::debug;

/// Hint service speaking plain JSON: POST `{goal, description, snapshot}`,
/// receive a hint object.
#[derive(Clone)]
pub struct HttpHintSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpHintSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl HintSource for HttpHintSource {
    async fn suggest(&self, request: &HintRequest) -> Result<Hint, HintError> {
        debug!(endpoint = %self.endpoint, goal = %request.goal, "requesting hint");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HintError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        serde_json::from_str(&body).map_err(|e| HintError::Malformed(e.to_string()))
    }
}
