// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM engine for HTML parsing and querying
//!
//! An arena-backed read-only tree built from html5ever output, with a
//! simplified CSS selector engine for the query shapes extraction needs.

mod element;
mod parser;
mod selector;
mod tree;

pub use element::ElementRef;
pub use parser::{parse_html, parse_html_with_url};
pub use selector::Selector;
pub use tree::{Document, NodeId, NodeKind};
