//! HTTP client for making requests to search backends

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::error::FetchError;
use anyhow::Result;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single backend request, built by a source
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters (GET) or form fields (POST)
    pub params: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: Vec::new(),
        }
    }

    /// Create a POST request; params are sent form-urlencoded
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up a parameter by name
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The Fetcher: one bounded-timeout call per request, no retries
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::from_secs_f64(settings.request_timeout);
        let mut builder = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

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

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: settings
                .useragent
                .clone()
                .unwrap_or_else(generate_user_agent),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Default per-call timeout
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a request with the default timeout
    pub async fn fetch(&self, request: FetchRequest) -> Result<String, FetchError> {
        self.fetch_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request, returning the body of a 2xx response.
    ///
    /// The timeout covers connect, headers and body. It is applied to the
    /// reqwest request and, as an outer bound, around the whole future.
    pub async fn fetch_with_timeout(
        &self,
        request: FetchRequest,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let url = request.url.clone();
        match tokio::time::timeout(timeout, self.send(request, timeout)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("Fetch of {} exceeded {:?}", url, timeout);
                Err(FetchError::Timeout(timeout))
            }
        }
    }

    async fn send(&self, request: FetchRequest, timeout: Duration) -> Result<String, FetchError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept-Language", accept_language("en"))
            .header("DNT", "1");

        if !request.headers.contains_key("Accept") {
            req_builder = req_builder.header("Accept", accept_html());
        }

        for (key, value) in self.extra_headers.iter().chain(request.headers.iter()) {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = match request.method {
                HttpMethod::Get => req_builder.query(&request.params),
                HttpMethod::Post => req_builder.form(&request.params),
            };
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(format!("HTTP status {}", status.as_u16())));
        }

        response.text().await.map_err(|e| classify(e, timeout))
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Http(err.to_string())
    }
}
