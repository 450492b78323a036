// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session configuration and settle policy

use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;

/// Proxy endpoint with optional credentials
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy server URI, e.g. "http://proxy.example.com:7777"
    pub server: String,
    /// Proxy username
    pub username: Option<String>,
    /// Proxy password
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Create a proxy config without credentials
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            username: None,
            password: None,
        }
    }

    /// Set basic-auth credentials
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run without a visible display. Informational only: there is no real
    /// display either way, but callers porting scripts expect the knob.
    pub headless: bool,
    /// Proxy configuration
    pub proxy: Option<ProxyConfig>,
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

impl SessionConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the headless flag
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// Wait strategy applied after navigation, before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Load subresources, then sleep a fixed delay
    Delay(Duration),
    /// Document parsed; subresources are not fetched
    DomReady,
    /// Document parsed and every subresource fetch resolved
    Idle,
}

impl Default for Settle {
    fn default() -> Self {
        Settle::Idle
    }
}

impl Settle {
    /// Whether this policy loads subresources during navigation
    pub(crate) fn loads_resources(&self) -> bool {
        !matches!(self, Settle::DomReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .headless(false)
            .timeout(Duration::from_secs(5))
            .proxy(ProxyConfig::new("http://proxy.test:7777").credentials("user", "pass"));

        assert!(!config.headless);
        assert_eq!(config.timeout, Duration::from_secs(5));
        let proxy = config.proxy.unwrap();
        assert_eq!(proxy.server, "http://proxy.test:7777");
        assert_eq!(proxy.username.as_deref(), Some("user"));
    }

    #[test]
    fn test_settle_policies() {
        assert!(Settle::Idle.loads_resources());
        assert!(Settle::Delay(Duration::from_millis(10)).loads_resources());
        assert!(!Settle::DomReady.loads_resources());
        assert_eq!(Settle::default(), Settle::Idle);
    }
}
