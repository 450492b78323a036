// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session implementation

use std::sync::Arc;

use parking_lot::RwLock;

use super::config::{SessionConfig, Settle};
use super::page::Page;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, Response};
use crate::net::{NetworkLog, RequestEntry, RouteRule, RouteTable};

/// One browser session: an HTTP client, a route table, and one page
///
/// Teardown is RAII: the session closes itself on drop, so the underlying
/// resources are released on every exit path, including error paths.
pub struct Session {
    config: SessionConfig,
    routes: Arc<RouteTable>,
    log: NetworkLog,
    page: Page,
    closed: Arc<RwLock<bool>>,
}

impl Session {
    /// Launch a new session
    ///
    /// Fails with `Error::Launch` when the client cannot be constructed,
    /// e.g. a malformed proxy server URI.
    pub async fn launch(config: SessionConfig) -> Result<Self> {
        let client = HttpClient::with_config(HttpClientConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
            proxy: config.proxy.clone(),
            ..Default::default()
        })?;

        tracing::debug!(headless = config.headless, proxy = config.proxy.is_some(), "session launched");

        let routes = Arc::new(RouteTable::new());
        let log = NetworkLog::new();
        let closed = Arc::new(RwLock::new(false));
        let page = Page::new(client, routes.clone(), log.clone(), closed.clone());

        Ok(Self {
            config,
            routes,
            log,
            page,
            closed,
        })
    }

    /// Launch with default configuration
    pub async fn launch_default() -> Result<Self> {
        Self::launch(SessionConfig::default()).await
    }

    /// Register an interception rule
    ///
    /// Must be called before the first navigation; interception is
    /// evaluated against all requests issued during page load.
    pub fn route(&self, rule: RouteRule) -> Result<()> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        self.routes.add(rule)
    }

    /// Navigate the session's page
    pub async fn navigate(&self, url: &str, settle: Settle) -> Result<Response> {
        self.page.navigate(url, settle).await
    }

    /// The session's page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// All logged requests, in request order
    pub fn network_log(&self) -> Vec<RequestEntry> {
        self.log.entries()
    }

    /// Check if the session is closed
    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Close the session; idempotent
    pub fn close(&self) {
        let mut closed = self.closed.write();
        if !*closed {
            *closed = true;
            tracing::debug!("session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

// The page and route table hold non-Debug members (trait objects, locks).
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_launch_and_close() {
        let session = Session::launch_default().await.unwrap();
        assert!(!session.is_closed());
        session.close();
        assert!(session.is_closed());
        session.close(); // idempotent
        assert!(format!("{:?}", session).contains("closed: true"));
    }

    #[tokio::test]
    async fn test_closed_session_rejects_operations() {
        let session = Session::launch_default().await.unwrap();
        session.close();

        let err = session
            .route(RouteRule::abort(r"\.png$").unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed));

        let err = session
            .navigate("http://localhost:1/", Settle::DomReady)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed));
    }

    #[tokio::test]
    async fn test_launch_rejects_bad_proxy() {
        let config = SessionConfig::new()
            .proxy(crate::session::ProxyConfig::new("::not a proxy::"));
        let err = Session::launch(config).await.unwrap_err();
        assert!(matches!(err, Error::Launch(_)));
    }
}
