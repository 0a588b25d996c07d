//! Shared HTTP client for calls to upstream services

use super::request::{HttpMethod, OutboundRequest, OutboundResponse, RequestBody};
use super::user_agent::default_user_agent;
use crate::config::OutgoingSettings;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper; cheap to clone, safe to share between tasks
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::from_secs_f64(settings.effective_timeout());

        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: default_user_agent(settings.useragent_suffix.as_deref()),
        })
    }

    /// Execute a request with the default timeout
    pub async fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request with a custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: OutboundRequest,
        timeout: Duration,
    ) -> Result<OutboundResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.timeout(timeout);

        if !request.has_header("User-Agent") {
            req_builder = req_builder.header("User-Agent", &self.user_agent);
        }

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        debug!("{:?} {}", request.method, request.url);

        let response = req_builder
            .send()
            .await
            .with_context(|| format!("Request to {} failed", request.url))?;

        Self::parse_response(response).await
    }

    /// Parse response into OutboundResponse
    async fn parse_response(response: Response) -> Result<OutboundResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(OutboundResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Current default user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Timeout applied when none is given per request
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
