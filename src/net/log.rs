// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-session request log

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

/// What a request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The navigated document itself
    Document,
    /// <img src>
    Image,
    /// <link rel="stylesheet">
    Stylesheet,
    /// <script src>
    Script,
    /// Anything fetched directly through the client
    Other,
}

/// How a request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Response delivered unmodified (includes rewrite fallback)
    Completed,
    /// Cancelled by an abort rule before any network activity
    Aborted,
    /// Response delivered with a rewritten body
    Rewritten,
    /// Transport failure
    Failed,
}

/// One logged request
#[derive(Debug, Clone, Serialize)]
pub struct RequestEntry {
    /// Request URL
    pub url: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Outcome
    pub disposition: Disposition,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Error text, when the request failed
    pub error: Option<String>,
}

/// Shared append-only request log
#[derive(Debug, Clone, Default)]
pub struct NetworkLog {
    entries: Arc<RwLock<Vec<RequestEntry>>>,
}

impl NetworkLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry
    pub fn record(&self, entry: RequestEntry) {
        self.entries.write().push(entry);
    }

    /// All entries in request order
    pub fn entries(&self) -> Vec<RequestEntry> {
        self.entries.read().clone()
    }

    /// Entries of one resource kind
    pub fn entries_of_kind(&self, kind: ResourceKind) -> Vec<RequestEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Count entries with the given disposition
    pub fn count_disposition(&self, disposition: Disposition) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.disposition == disposition)
            .count()
    }

    /// Entry count
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Export as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries())
    }
}
