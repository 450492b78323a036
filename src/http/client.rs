// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::session::ProxyConfig;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
    /// Proxy configuration
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            proxy: None,
        }
    }
}

/// HTTP client shared by a session's page and routes
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    ///
    /// Fails with `Error::Launch` when the proxy server URI is malformed or
    /// the underlying client cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut default_headers = reqwest::header::HeaderMap::new();
        default_headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            "accept-language",
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(default_headers)
            .cookie_store(true);

        if let Some(ref proxy) = config.proxy {
            let mut p = reqwest::Proxy::all(&proxy.server)
                .map_err(|e| Error::launch(format!("invalid proxy server '{}': {}", proxy.server, e)))?;
            if let (Some(user), Some(pass)) = (&proxy.username, &proxy.password) {
                p = p.basic_auth(user, pass);
            }
            builder = builder.proxy(p);
        }

        let client = builder
            .build()
            .map_err(|e| Error::launch(format!("client build failed: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Fetch a URL with GET
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;

        let final_url = response.url().clone();
        let redirected = &final_url != url;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            redirected,
            start.elapsed().as_millis() as u64,
        ))
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_proxy_is_launch_error() {
        let config = HttpClientConfig {
            proxy: Some(ProxyConfig::new("not a uri")),
            ..Default::default()
        };
        let err = HttpClient::with_config(config).unwrap_err();
        assert!(matches!(err, Error::Launch(_)));
    }
}
