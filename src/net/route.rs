// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Route rules and dispatch
//!
//! A rule pairs a URL pattern with an action: abort the request, or fetch
//! the real response and rewrite its body before it reaches the page.
//! Rules are evaluated in registration order and the first match governs;
//! no match means the request passes through untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use url::Url;

use super::log::{Disposition, NetworkLog, RequestEntry, ResourceKind};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Response};

/// Body transform applied by a rewrite rule
///
/// Implemented for plain closures, so
/// `RouteRule::rewrite(pattern, |body: String| Ok(body.replace(..)))`
/// works without a named type.
#[async_trait]
pub trait BodyRewriter: Send + Sync {
    /// Produce the replacement body. An error here is not fatal: the
    /// original response passes through unmodified.
    async fn rewrite(&self, body: String) -> Result<String>;
}

#[async_trait]
impl<F> BodyRewriter for F
where
    F: Fn(String) -> Result<String> + Send + Sync,
{
    async fn rewrite(&self, body: String) -> Result<String> {
        (self)(body)
    }
}

/// Rewriter that replaces the first occurrence of a fixed string
pub struct ReplaceRewriter {
    find: String,
    replace_with: String,
}

impl ReplaceRewriter {
    /// Replace the first occurrence of `find` with `replace_with`
    pub fn new(find: impl Into<String>, replace_with: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace_with: replace_with.into(),
        }
    }
}

#[async_trait]
impl BodyRewriter for ReplaceRewriter {
    async fn rewrite(&self, body: String) -> Result<String> {
        Ok(body.replacen(&self.find, &self.replace_with, 1))
    }
}

enum RouteAction {
    Abort,
    Rewrite {
        rewriter: Arc<dyn BodyRewriter>,
        content_type: Option<String>,
    },
}

/// One interception rule: URL pattern plus action
pub struct RouteRule {
    pattern: Regex,
    action: RouteAction,
}

impl RouteRule {
    /// Abort every request whose URL matches `pattern`
    pub fn abort(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            action: RouteAction::Abort,
        })
    }

    /// Fetch matching requests for real, then rewrite the body
    pub fn rewrite<R: BodyRewriter + 'static>(pattern: &str, rewriter: R) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            action: RouteAction::Rewrite {
                rewriter: Arc::new(rewriter),
                content_type: None,
            },
        })
    }

    /// Override the content-type of the fulfilled response (rewrite only)
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        if let RouteAction::Rewrite {
            content_type: ref mut ct,
            ..
        } = self.action
        {
            *ct = Some(content_type.into());
        }
        self
    }

    /// Check whether a URL matches this rule
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid route pattern: {}", e)))
}

/// Ordered rule list for one session
///
/// Sealed at the first navigation: interception is evaluated against all
/// requests issued during page load, so late registration would be silently
/// partial.
#[derive(Default)]
pub struct RouteTable {
    rules: RwLock<Vec<RouteRule>>,
    sealed: AtomicBool,
}

impl RouteTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; fails once navigation has started
    pub fn add(&self, rule: RouteRule) -> Result<()> {
        if self.sealed.load(Ordering::Acquire) {
            return Err(Error::RoutesSealed);
        }
        self.rules.write().push(rule);
        Ok(())
    }

    /// Stop accepting new rules
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Registered rule count
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// True when no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    /// Run one request through the table
    ///
    /// Returns `Ok(None)` when an abort rule cancelled the request, the
    /// (possibly rewritten) response otherwise. Every outcome is recorded
    /// in `log`.
    pub async fn dispatch(
        &self,
        client: &HttpClient,
        log: &NetworkLog,
        url: &Url,
        kind: ResourceKind,
    ) -> Result<Option<Response>> {
        enum Matched {
            None,
            Abort,
            Rewrite(Arc<dyn BodyRewriter>, Option<String>),
        }

        // First match wins; snapshot under the lock, run the fetch outside it.
        let matched = {
            let rules = self.rules.read();
            match rules.iter().find(|r| r.matches(url.as_str())) {
                None => Matched::None,
                Some(rule) => match &rule.action {
                    RouteAction::Abort => Matched::Abort,
                    RouteAction::Rewrite {
                        rewriter,
                        content_type,
                    } => Matched::Rewrite(rewriter.clone(), content_type.clone()),
                },
            }
        };

        match matched {
            Matched::Abort => {
                tracing::debug!(url = %url, "request aborted by route");
                log.record(RequestEntry {
                    url: url.to_string(),
                    kind,
                    disposition: Disposition::Aborted,
                    status: None,
                    error: None,
                });
                Ok(None)
            }
            Matched::None => {
                let response = self.fetch(client, log, url, kind).await?;
                log.record(RequestEntry {
                    url: url.to_string(),
                    kind,
                    disposition: Disposition::Completed,
                    status: Some(response.status_code()),
                    error: None,
                });
                Ok(Some(response))
            }
            Matched::Rewrite(rewriter, content_type) => {
                let response = self.fetch(client, log, url, kind).await?;
                let status = response.status_code();
                let original = response.text_lossy();
                match rewriter.rewrite(original).await {
                    Ok(body) => {
                        log.record(RequestEntry {
                            url: url.to_string(),
                            kind,
                            disposition: Disposition::Rewritten,
                            status: Some(status),
                            error: None,
                        });
                        Ok(Some(response.with_body(body, content_type.as_deref())))
                    }
                    Err(e) => {
                        // Pass-through fallback: a failing transform must not
                        // lose the response.
                        tracing::warn!(url = %url, error = %e, "rewrite failed, passing original through");
                        log.record(RequestEntry {
                            url: url.to_string(),
                            kind,
                            disposition: Disposition::Completed,
                            status: Some(status),
                            error: None,
                        });
                        Ok(Some(response))
                    }
                }
            }
        }
    }

    async fn fetch(
        &self,
        client: &HttpClient,
        log: &NetworkLog,
        url: &Url,
        kind: ResourceKind,
    ) -> Result<Response> {
        match client.get(url).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log.record(RequestEntry {
                    url: url.to_string(),
                    kind,
                    disposition: Disposition::Failed,
                    status: None,
                    error: Some(e.to_string()),
                });
                Err(Error::fetch(url.to_string(), e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_matching() {
        let rule = RouteRule::abort(r"\.(png|jpe?g|svg)$").unwrap();
        assert!(rule.matches("https://example.com/logo.png"));
        assert!(rule.matches("https://example.com/photo.jpeg"));
        assert!(!rule.matches("https://example.com/page.html"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RouteRule::abort("(unclosed").is_err());
    }

    #[test]
    fn test_table_seals() {
        let table = RouteTable::new();
        table.add(RouteRule::abort(r"\.png$").unwrap()).unwrap();
        table.seal();
        let err = table.add(RouteRule::abort(r"\.css$").unwrap()).unwrap_err();
        assert!(matches!(err, Error::RoutesSealed));
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_rewriter_replaces_once() {
        let rewriter = ReplaceRewriter::new("<title>", "<title>Modified Response ");
        let out = rewriter
            .rewrite("<title>A</title><title>B</title>".to_string())
            .await
            .unwrap();
        assert_eq!(out.matches("Modified Response").count(), 1);
    }
}
