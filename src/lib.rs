// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Pagelift - Headless Page Fetcher and Extractor
//!
//! A pure Rust headless page fetcher for structured extraction.
//! No Chrome/Chromium dependency - fetches, parses, and queries pages
//! with an in-process HTML engine.
//!
//! ## Features
//!
//! - Lightweight: no browser process to spawn
//! - Proxied sessions: HTTP/SOCKS proxy with credentials
//! - Settle policies: fixed delay, DOM-ready, or resource-idle
//! - Structured extraction: container + field selectors to records
//! - Attribute harvesting: batch attribute reads in document order
//! - Request interception: abort or rewrite matched requests
//! - Network log: per-request disposition for every fetch
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagelift::{Session, SessionConfig, Settle, FieldSpec, extract_all};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::launch(SessionConfig::default()).await?;
//!     session.navigate("https://example.com", Settle::default()).await?;
//!
//!     let doc = session.page().require_document()?;
//!     let fields = vec![
//!         FieldSpec::new("name", "h3"),
//!         FieldSpec::new("price", ".price_color"),
//!     ];
//!     for record in extract_all(&doc, ".product_pod", &fields)? {
//!         println!("{:?}", record.get("name"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod http;
pub mod net;
pub mod session;

// Re-exports for convenience

// Session and Page
pub use session::{Page, ProxyConfig, Session, SessionConfig, Settle};

// Extraction
pub use extract::{extract_all, extract_attribute, FieldSpec, Record};

// Interception and network log
pub use net::{BodyRewriter, ReplaceRewriter, RouteRule, RouteTable};
pub use net::{Disposition, NetworkLog, RequestEntry, ResourceKind};

// DOM
pub use dom::{parse_html, parse_html_with_url, Document, ElementRef, Selector};

// HTTP
pub use http::{HttpClient, HttpClientConfig, Response};

// Errors
pub use error::{Error, Result};

/// Pagelift version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
