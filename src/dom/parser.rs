// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::tree::{Document, NodeId, NodeKind};
use crate::error::Result;

/// Parse an HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_url(html, None)
}

/// Parse an HTML string with the URL it was fetched from
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let rcdom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| crate::error::Error::other(format!("HTML parse failed: {}", e)))?;

    let mut doc = Document::new(url);
    let root = doc.root();
    for child in rcdom.document.children.borrow().iter() {
        convert(child, root, &mut doc);
    }
    Ok(doc)
}

/// Copy one rcdom node (and its subtree) into the arena
fn convert(handle: &Handle, parent: NodeId, doc: &mut Document) {
    let kind = match handle.data {
        RcNodeData::Document => return,
        RcNodeData::Doctype { .. } => NodeKind::Doctype,
        RcNodeData::Text { ref contents } => NodeKind::Text(contents.borrow().to_string()),
        RcNodeData::Comment { ref contents } => NodeKind::Comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => NodeKind::Element {
            name: name.local.to_lowercase(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_lowercase(), a.value.to_string()))
                .collect(),
        },
        RcNodeData::ProcessingInstruction { .. } => return,
    };

    let id = doc.push(kind, parent);
    for child in handle.children.borrow().iter() {
        convert(child, id, doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>").unwrap();
        let p = doc.select("p").unwrap().unwrap();
        assert_eq!(p.text(), "Hello");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse_html("<div id=\"test\" class=\"foo bar\">content</div>").unwrap();
        let div = doc.select("div#test").unwrap().unwrap();
        assert!(div.has_class("foo"));
        assert_eq!(div.attr("id"), Some("test"));
    }

    #[test]
    fn test_parse_fixes_broken_markup() {
        // html5ever recovers from unclosed tags the way a browser does
        let doc = parse_html("<ul><li>a<li>b</ul>").unwrap();
        assert_eq!(doc.select_all("li").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_full_page() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head><title>Test Page</title></head>
            <body>
                <div id="container">
                    <h1>Hello World</h1>
                    <a href="https://example.com">Link</a>
                </div>
            </body>
            </html>
        "#;
        let doc = parse_html(html).unwrap();
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        let a = doc.select("#container a").unwrap().unwrap();
        assert_eq!(a.attr("href"), Some("https://example.com"));
    }
}
