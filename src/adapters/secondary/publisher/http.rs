/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! HTTP data publisher for sending reports to remote endpoints

use crate::domain::{render_json_compact, PublishConfig, PublishError, ReportDocument};
use crate::ports::DataPublisher;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

/// HTTP data publisher that POSTs report documents as JSON
pub struct HttpDataPublisher {
    client: Client,
}

impl HttpDataPublisher {
    /// Create a new HTTP data publisher
    ///
    /// # Arguments
    /// * `skip_tls_verify` - Whether to skip TLS certificate verification
    pub fn new(skip_tls_verify: bool) -> Result<Self, PublishError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(skip_tls_verify)
            .build()
            .map_err(|e| PublishError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Create with default settings
    pub fn with_defaults() -> Result<Self, PublishError> {
        Self::new(false)
    }

    /// Build the POST request without sending it
    fn build_request(
        &self,
        document: &ReportDocument,
        config: &PublishConfig,
    ) -> Result<reqwest::RequestBuilder, PublishError> {
        if config.endpoint.trim().is_empty() {
            return Err(PublishError::InvalidEndpoint(
                "No endpoint URL provided".to_string(),
            ));
        }

        let body = render_json_compact(document)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let mut request = self
            .client
            .post(&config.endpoint)
            .timeout(config.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(value) = config.auth.header_value() {
            request = request.header(AUTHORIZATION, value);
        }

        Ok(request)
    }
}

#[async_trait]
impl DataPublisher for HttpDataPublisher {
    async fn publish(
        &self,
        document: &ReportDocument,
        config: &PublishConfig,
    ) -> Result<u16, PublishError> {
        let request = self.build_request(document, config)?;

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            Err(PublishError::HttpStatus {
                status: status.as_u16(),
            })
        } else {
            Ok(status.as_u16())
        }
    }
}
