//! Native HTTP transport using reqwest.

use super::config::ExecutionConfig;
use super::error::TransportError;
use super::Transport;
use crate::models::{HttpVersion, RequestDocument, StepResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::time::Instant;

/// Sends resolved documents over the network with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying client from the execution configuration.
    pub fn new(config: &ExecutionConfig) -> Result<Self, TransportError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.validate_ssl)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::BuildError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDocument) -> Result<StepResult, TransportError> {
        let start_time = Instant::now();

        let url = url::Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::BuildError(e.to_string()))?;

        let mut req_builder = self.client.request(method, url);

        // Only HTTP/1.0 is forwarded; 1.1 is the client default and 0.9/2.0
        // are left to negotiation.
        if request.version == HttpVersion::Http10 {
            req_builder = req_builder.version(reqwest::Version::HTTP_10);
        }

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_wire());
        }

        log::debug!("Sending {} {}", request.method, request.url);
        let response = req_builder.send().await?;

        let status = response.status().as_u16();

        // Repeated headers (e.g. Set-Cookie) are joined the way fetch does
        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let text = response.text().await?;

        log::debug!(
            "{} {} -> {} in {:?}",
            request.method,
            request.url,
            status,
            start_time.elapsed()
        );

        Ok(StepResult {
            status,
            headers,
            body: StepResult::sniff_body(text),
        })
    }
}
