// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Arena-backed document tree
//!
//! Nodes live in one `Vec`; a `NodeId` is an index into it. The tree is
//! built once by the parser and never mutated afterwards, so queries can
//! hand out cheap borrowed views (`ElementRef`).

use url::Url;

use super::element::ElementRef;
use super::selector::Selector;
use crate::error::Result;

/// Index of a node in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Get the raw index value
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node payload
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Synthetic root (the document itself)
    Root,
    /// Element node with lowercase tag name and attribute list
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
    /// <!DOCTYPE>
    Doctype,
}

/// One arena slot
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    /// Document URL, when known
    pub url: Option<Url>,
    nodes: Vec<NodeEntry>,
}

impl Document {
    /// Create an empty document containing only the root node
    pub(crate) fn new(url: Option<Url>) -> Self {
        Self {
            url,
            nodes: vec![NodeEntry {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The synthetic root node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node under `parent`, returning its id
    pub(crate) fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeEntry {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.index()]
    }

    /// Total node count, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing beyond the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// View a node as an element, if it is one
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match self.nodes[id.index()].kind {
            NodeKind::Element { .. } => Some(ElementRef::new(self, id)),
            _ => None,
        }
    }

    /// Elements in document order (preorder over the whole tree)
    pub fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.entry(scope).children.clone();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if matches!(self.entry(id).kind, NodeKind::Element { .. }) {
                out.push(id);
            }
            for &child in self.entry(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First element matching `selector`, in document order
    pub fn select(&self, selector: &str) -> Result<Option<ElementRef<'_>>> {
        let sel = Selector::parse(selector)?;
        Ok(self.select_with(&sel, self.root()).into_iter().next())
    }

    /// All elements matching `selector`, in document order
    pub fn select_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let sel = Selector::parse(selector)?;
        Ok(self.select_with(&sel, self.root()))
    }

    /// Run a parsed selector over the descendants of `scope`
    pub(crate) fn select_with(&self, selector: &Selector, scope: NodeId) -> Vec<ElementRef<'_>> {
        self.descendant_elements(scope)
            .into_iter()
            .filter(|&id| selector.matches(self, id, scope))
            .map(|id| ElementRef::new(self, id))
            .collect()
    }

    /// Rendered text of the <title> element, when present
    pub fn title(&self) -> Option<String> {
        self.select("title").ok().flatten().map(|e| e.text())
    }

    /// Rendered text of the whole document
    pub fn text(&self) -> String {
        ElementRef::collapse_text(self, self.root())
    }
}
