// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page implementation

use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::config::Settle;
use crate::dom::{parse_html_with_url, Document};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Response};
use crate::net::{NetworkLog, ResourceKind, RouteTable};

/// The single page of a session
pub struct Page {
    client: HttpClient,
    routes: Arc<RouteTable>,
    log: NetworkLog,
    closed: Arc<RwLock<bool>>,
    url: RwLock<Option<Url>>,
    document: RwLock<Option<Arc<Document>>>,
    last_response: RwLock<Option<Response>>,
}

impl Page {
    pub(crate) fn new(
        client: HttpClient,
        routes: Arc<RouteTable>,
        log: NetworkLog,
        closed: Arc<RwLock<bool>>,
    ) -> Self {
        Self {
            client,
            routes,
            log,
            closed,
            url: RwLock::new(None),
            document: RwLock::new(None),
            last_response: RwLock::new(None),
        }
    }

    /// Navigate to a URL and apply the settle policy
    ///
    /// Seals the route table: rules registered after this point are
    /// rejected, because they would only see part of the page load.
    pub async fn navigate(&self, url: &str, settle: Settle) -> Result<Response> {
        if *self.closed.read() {
            return Err(Error::SessionClosed);
        }

        let parsed = Url::parse(url)?;
        self.routes.seal();

        tracing::info!(url = %parsed, ?settle, "navigating");

        let response = self
            .routes
            .dispatch(&self.client, &self.log, &parsed, ResourceKind::Document)
            .await
            .map_err(|e| match e {
                Error::Fetch { url, reason } => Error::Navigation {
                    url,
                    reason,
                    status: None,
                },
                other => other,
            })?
            .ok_or_else(|| Error::navigation(url, "document request aborted by route"))?;

        *self.url.write() = Some(response.url.clone());

        if response.is_html() {
            let doc = parse_html_with_url(&response.text_lossy(), Some(response.url.clone()))?;
            let doc = Arc::new(doc);
            if settle.loads_resources() {
                self.load_resources(&doc, &response.url).await;
            }
            *self.document.write() = Some(doc);
        } else {
            *self.document.write() = None;
        }

        if let Settle::Delay(delay) = settle {
            tokio::time::sleep(delay).await;
        }

        *self.last_response.write() = Some(response.clone());
        Ok(response)
    }

    /// Fetch the page's subresources through the route table
    ///
    /// Fetches run concurrently; individual failures are logged and do not
    /// fail the navigation, matching how a browser treats a broken image.
    async fn load_resources(&self, doc: &Document, base: &Url) {
        let mut targets: Vec<(Url, ResourceKind)> = Vec::new();
        let mut push = |href: &str, kind: ResourceKind| match base.join(href) {
            Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
                targets.push((resolved, kind));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(href, error = %e, "skipping unresolvable resource URL");
            }
        };

        for img in doc.select_all("img[src]").unwrap_or_default() {
            if let Some(src) = img.attr("src") {
                push(src, ResourceKind::Image);
            }
        }
        for link in doc.select_all("link[rel~=stylesheet][href]").unwrap_or_default() {
            if let Some(href) = link.attr("href") {
                push(href, ResourceKind::Stylesheet);
            }
        }
        for script in doc.select_all("script[src]").unwrap_or_default() {
            if let Some(src) = script.attr("src") {
                push(src, ResourceKind::Script);
            }
        }

        let fetches = targets.into_iter().map(|(url, kind)| {
            let routes = self.routes.clone();
            let client = self.client.clone();
            let log = self.log.clone();
            async move {
                if let Err(e) = routes.dispatch(&client, &log, &url, kind).await {
                    tracing::warn!(url = %url, error = %e, "subresource fetch failed");
                }
            }
        });
        futures::future::join_all(fetches).await;
    }

    /// Current URL after redirects
    pub fn url(&self) -> Option<String> {
        self.url.read().as_ref().map(|u| u.to_string())
    }

    /// Current document, when the last navigation yielded HTML
    ///
    /// `None` once the session is closed.
    pub fn document(&self) -> Option<Arc<Document>> {
        if *self.closed.read() {
            return None;
        }
        self.document.read().clone()
    }

    /// Current document, or an error when none is loaded
    ///
    /// Fails with `Error::SessionClosed` after close, like every other
    /// operation on a closed session.
    pub fn require_document(&self) -> Result<Arc<Document>> {
        if *self.closed.read() {
            return Err(Error::SessionClosed);
        }
        self.document
            .read()
            .clone()
            .ok_or_else(|| Error::other("no document loaded; navigate first"))
    }

    /// Last response
    pub fn response(&self) -> Option<Response> {
        self.last_response.read().clone()
    }

    /// Page title
    pub fn title(&self) -> Option<String> {
        self.document().and_then(|d| d.title())
    }

    /// Rendered text of the whole page
    pub fn text(&self) -> Option<String> {
        self.document().map(|d| d.text())
    }

    /// All link targets on the page, as written in the markup
    pub fn links(&self) -> Vec<String> {
        self.document()
            .and_then(|d| d.select_all("a[href]").ok().map(|links| {
                links
                    .iter()
                    .filter_map(|a| a.attr("href"))
                    .map(String::from)
                    .collect()
            }))
            .unwrap_or_default()
    }

    /// Fetch raw bytes through the session's client (not the route table)
    ///
    /// Used for harvesting binary content such as images after extraction.
    pub async fn fetch_bytes(&self, url: &str) -> Result<bytes::Bytes> {
        if *self.closed.read() {
            return Err(Error::SessionClosed);
        }
        let base = self.url.read().clone();
        let resolved = match base {
            Some(b) => b.join(url)?,
            None => Url::parse(url)?,
        };
        let response = self.client.get(&resolved).await?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::net::{Disposition, ReplaceRewriter, ResourceKind, RouteRule};
    use crate::session::{Session, Settle};

    // set_body_string would pin content-type to text/plain; the raw form
    // carries the mime through.
    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
    }

    #[tokio::test]
    async fn test_navigate_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                "<html><head><title>Catalog</title></head><body><a href='/p1'>one</a></body></html>",
            ))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        let response = session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        assert!(response.is_success());
        assert!(response.is_html());
        assert_eq!(session.page().title().as_deref(), Some("Catalog"));
        assert_eq!(session.page().links(), vec!["/p1"]);
        assert!(session.page().url().unwrap().starts_with(&server.uri()));
    }

    #[tokio::test]
    async fn test_navigate_invalid_url() {
        let session = Session::launch_default().await.unwrap();
        let err = session
            .navigate("not a url at all", Settle::DomReady)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Url(_)));
    }

    #[tokio::test]
    async fn test_abort_rule_blocks_images_during_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                "<html><body><img src='/a.png'><img src='/b.png'><p>text</p></body></html>",
            ))
            .mount(&server)
            .await;
        // The image endpoints must never be hit.
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session.route(RouteRule::abort(r"\.png$").unwrap()).unwrap();
        session.navigate(&server.uri(), Settle::Idle).await.unwrap();

        let log = session.network_log();
        let aborted: Vec<_> = log
            .iter()
            .filter(|e| e.disposition == Disposition::Aborted)
            .collect();
        assert_eq!(aborted.len(), 2);
        assert!(aborted.iter().all(|e| e.kind == ResourceKind::Image));
        assert!(log
            .iter()
            .filter(|e| e.kind == ResourceKind::Image)
            .all(|e| e.disposition == Disposition::Aborted));
    }

    #[tokio::test]
    async fn test_dom_ready_skips_subresources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page("<html><body><img src='/a.png'></body></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        assert_eq!(session.network_log().len(), 1);
        assert_eq!(session.network_log()[0].kind, ResourceKind::Document);
    }

    #[tokio::test]
    async fn test_rewrite_rule_changes_rendered_title_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                "<html><head><title>Original</title></head><body>body says title too</body></html>",
            ))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session
            .route(
                RouteRule::rewrite(
                    r"/$",
                    ReplaceRewriter::new("<title>", "<title>Modified Response - "),
                )
                .unwrap()
                .content_type("text/html; charset=utf-8"),
            )
            .unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        let title = session.page().title().unwrap();
        assert_eq!(title, "Modified Response - Original");
        assert_eq!(
            session.network_log()[0].disposition,
            Disposition::Rewritten
        );
    }

    #[tokio::test]
    async fn test_failed_rewrite_passes_original_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page("<html><head><title>Kept</title></head></html>"))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session
            .route(
                RouteRule::rewrite(r"/$", |_body: String| -> crate::error::Result<String> {
                    Err(crate::error::Error::other("transform refused"))
                })
                .unwrap(),
            )
            .unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        assert_eq!(session.page().title().as_deref(), Some("Kept"));
        assert_eq!(
            session.network_log()[0].disposition,
            Disposition::Completed
        );
    }

    #[tokio::test]
    async fn test_routes_sealed_after_navigation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page("<html></html>"))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        let err = session
            .route(RouteRule::abort(r"\.png$").unwrap())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::RoutesSealed));
    }

    #[tokio::test]
    async fn test_settle_delay_waits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page("<html></html>"))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        let start = Instant::now();
        session
            .navigate(&server.uri(), Settle::Delay(Duration::from_millis(100)))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_navigation_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        // 404 still navigates; the document is simply what the server sent.
        let response = session
            .navigate(&format!("{}/missing", server.uri()), Settle::DomReady)
            .await
            .unwrap();
        assert_eq!(response.status_code(), 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_fetch_bytes_resolves_relative_to_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page("<html><body><img src='/pic.jpg'></body></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pic.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF])
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        let bytes = session.page().fetch_bytes("/pic.jpg").await.unwrap();
        assert_eq!(bytes.as_ref(), &[0xFF, 0xD8, 0xFF]);

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("image_0.jpg");
        std::fs::write(&target, &bytes).unwrap();
        assert_eq!(std::fs::read(&target).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_close_blocks_document_access() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                "<html><head><title>T</title></head><body><p class='item'>x</p></body></html>",
            ))
            .mount(&server)
            .await;

        let session = Session::launch_default().await.unwrap();
        session.navigate(&server.uri(), Settle::DomReady).await.unwrap();

        let doc = session.page().require_document().unwrap();
        let fields = vec![crate::extract::FieldSpec::new("value", ".item")];
        assert_eq!(crate::extract::extract_all(&doc, ".item", &fields).unwrap().len(), 1);

        session.close();
        let err = session.page().require_document().unwrap_err();
        assert!(matches!(err, crate::error::Error::SessionClosed));
        assert!(session.page().document().is_none());
        assert!(session.page().title().is_none());
        assert!(session.page().links().is_empty());
    }

    #[tokio::test]
    async fn test_document_abort_is_navigation_error() {
        let session = Session::launch_default().await.unwrap();
        session.route(RouteRule::abort(r".*").unwrap()).unwrap();
        let err = session
            .navigate("http://127.0.0.1:9/", Settle::DomReady)
            .await
            .unwrap_err();
        assert!(err.is_navigation());
    }
}
