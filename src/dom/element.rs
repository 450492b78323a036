// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Borrowed element view over the document arena

use super::selector::Selector;
use super::tree::{Document, NodeId, NodeKind};
use crate::error::Result;

/// A borrowed view of one element node
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// Node id of this element
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        match &self.doc.entry(self.id).kind {
            NodeKind::Element { name, .. } => name,
            _ => unreachable!("ElementRef always points at an element"),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        match &self.doc.entry(self.id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Check if an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// All attributes as (name, value) pairs
    pub fn attrs(&self) -> &'a [(String, String)] {
        match &self.doc.entry(self.id).kind {
            NodeKind::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Class list, split on whitespace
    pub fn classes(&self) -> Vec<&'a str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| *c == class)
    }

    /// Parent element, if any
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        let parent = self.doc.entry(self.id).parent?;
        self.doc.element(parent)
    }

    /// Child elements in order
    pub fn children(&self) -> Vec<ElementRef<'a>> {
        self.doc
            .entry(self.id)
            .children
            .iter()
            .filter_map(|&id| self.doc.element(id))
            .collect()
    }

    /// Rendered text: descendant text nodes concatenated with whitespace
    /// collapsed to single spaces and the ends trimmed. This is the value
    /// extraction records, matching what a browser's innerText would show
    /// for simple content.
    pub fn text(&self) -> String {
        Self::collapse_text(self.doc, self.id)
    }

    /// Raw text: descendant text nodes concatenated verbatim
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        Self::gather_text(self.doc, self.id, &mut out);
        out
    }

    /// First descendant matching `selector`
    pub fn select(&self, selector: &str) -> Result<Option<ElementRef<'a>>> {
        let sel = Selector::parse(selector)?;
        Ok(self.doc.select_with(&sel, self.id).into_iter().next())
    }

    /// All descendants matching `selector`, in document order
    pub fn select_all(&self, selector: &str) -> Result<Vec<ElementRef<'a>>> {
        let sel = Selector::parse(selector)?;
        Ok(self.doc.select_with(&sel, self.id))
    }

    pub(crate) fn collapse_text(doc: &Document, id: NodeId) -> String {
        let mut raw = String::new();
        Self::gather_text(doc, id, &mut raw);
        let mut out = String::new();
        for word in raw.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    fn gather_text(doc: &Document, id: NodeId, out: &mut String) {
        for &child in &doc.entry(id).children {
            match &doc.entry(child).kind {
                NodeKind::Text(t) => out.push_str(t),
                NodeKind::Element { name, .. } => {
                    // Script and style bodies are not rendered text
                    if name != "script" && name != "style" {
                        Self::gather_text(doc, child, out);
                    }
                }
                _ => {}
            }
        }
    }
}
