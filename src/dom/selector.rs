// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS selector parsing and matching
//!
//! Covers the shapes extraction plans use: tag, `#id`, `.class`,
//! `[attr]`/`[attr=value]` (with `^=`, `$=`, `*=`, `~=`, `|=`), compound
//! selectors, and descendant / child combinators. Pseudo-classes are not
//! supported and fail at parse time rather than silently matching.

use crate::error::{Error, Result};

use super::tree::{Document, NodeId, NodeKind};

/// A parsed CSS selector: a chain of compound steps joined by combinators
#[derive(Debug, Clone)]
pub struct Selector {
    steps: Vec<Step>,
}

/// One compound selector plus the combinator linking it to the step before
#[derive(Debug, Clone)]
struct Step {
    combinator: Combinator,
    compound: Compound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// Descendant (whitespace); also used for the first step
    Descendant,
    /// Child (>)
    Child,
}

/// A compound selector: everything between two combinators
#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCheck>,
}

#[derive(Debug, Clone)]
struct AttrCheck {
    name: String,
    op: Option<AttrOp>,
    value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    /// [attr=value]
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or hyphen prefix
    DashMatch,
    /// [attr^=value]
    Prefix,
    /// [attr$=value]
    Suffix,
    /// [attr*=value]
    Substring,
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::selector(input, "empty selector"));
        }

        let mut parser = Parser {
            source: input,
            chars: trimmed.chars().collect(),
            pos: 0,
        };
        let steps = parser.parse_steps()?;
        Ok(Self { steps })
    }

    /// Check whether the element `id` matches, with ancestor steps resolved
    /// no higher than `scope` (exclusive for element checks, so a scoped
    /// query never matches through structure outside its container).
    pub(crate) fn matches(&self, doc: &Document, id: NodeId, scope: NodeId) -> bool {
        let last = self.steps.len() - 1;
        if !self.steps[last].compound.matches(doc, id) {
            return false;
        }
        self.matches_upward(doc, id, scope, last)
    }

    fn matches_upward(&self, doc: &Document, id: NodeId, scope: NodeId, step: usize) -> bool {
        if step == 0 {
            return true;
        }
        let prev = step - 1;
        match self.steps[step].combinator {
            Combinator::Child => {
                let Some(parent) = element_parent(doc, id, scope) else {
                    return false;
                };
                self.steps[prev].compound.matches(doc, parent)
                    && self.matches_upward(doc, parent, scope, prev)
            }
            Combinator::Descendant => {
                let mut current = element_parent(doc, id, scope);
                while let Some(ancestor) = current {
                    if self.steps[prev].compound.matches(doc, ancestor)
                        && self.matches_upward(doc, ancestor, scope, prev)
                    {
                        return true;
                    }
                    current = element_parent(doc, ancestor, scope);
                }
                false
            }
        }
    }
}

/// Parent of `id` if it is an element inside the scope
fn element_parent(doc: &Document, id: NodeId, scope: NodeId) -> Option<NodeId> {
    let parent = doc.entry(id).parent?;
    if parent == scope {
        return None;
    }
    match doc.entry(parent).kind {
        NodeKind::Element { .. } => Some(parent),
        _ => None,
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let NodeKind::Element { name, attrs } = &doc.entry(id).kind else {
            return false;
        };

        if let Some(ref tag) = self.tag {
            if !name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        let get = |wanted: &str| {
            attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
                .map(|(_, v)| v.as_str())
        };

        if let Some(ref id_sel) = self.id {
            if get("id") != Some(id_sel.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let class_attr = get("class").unwrap_or("");
            for class in &self.classes {
                if !class_attr.split_whitespace().any(|c| c == class) {
                    return false;
                }
            }
        }

        for check in &self.attrs {
            let Some(value) = get(&check.name) else {
                return false;
            };
            let (Some(op), Some(target)) = (check.op, check.value.as_deref()) else {
                continue; // existence check only
            };
            let ok = match op {
                AttrOp::Equals => value == target,
                AttrOp::Includes => value.split_whitespace().any(|w| w == target),
                AttrOp::DashMatch => {
                    value == target || value.starts_with(&format!("{}-", target))
                }
                AttrOp::Prefix => value.starts_with(target),
                AttrOp::Suffix => value.ends_with(target),
                AttrOp::Substring => value.contains(target),
            };
            if !ok {
                return false;
            }
        }

        true
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_steps(&mut self) -> Result<Vec<Step>> {
        let mut steps = Vec::new();
        let mut combinator = Combinator::Descendant;

        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    if steps.is_empty() || combinator == Combinator::Child {
                        return Err(Error::selector(
                            self.source,
                            "combinator without preceding selector",
                        ));
                    }
                    self.pos += 1;
                    combinator = Combinator::Child;
                    continue;
                }
                Some(',') => {
                    return Err(Error::selector(self.source, "selector lists not supported"));
                }
                Some(_) => {
                    if steps.is_empty() {
                        combinator = Combinator::Descendant;
                    } else if combinator != Combinator::Child && !had_space {
                        return Err(Error::selector(self.source, "expected combinator"));
                    }
                    let compound = self.parse_compound()?;
                    steps.push(Step {
                        combinator,
                        compound,
                    });
                    combinator = Combinator::Descendant;
                }
            }
        }

        if steps.is_empty() {
            return Err(Error::selector(self.source, "invalid selector"));
        }
        if combinator == Combinator::Child {
            return Err(Error::selector(self.source, "dangling combinator"));
        }
        Ok(steps)
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut saw_part = false;

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    compound.attrs.push(self.attr_check()?);
                }
                // Universal: no constraint to record
                '*' => {
                    self.pos += 1;
                }
                ':' => {
                    return Err(Error::selector(self.source, "pseudo-classes not supported"));
                }
                c if c.is_alphabetic() || c == '_' => {
                    if compound.tag.is_some() {
                        return Err(Error::selector(self.source, "duplicate tag name"));
                    }
                    compound.tag = Some(self.ident()?.to_lowercase());
                }
                _ => break,
            }
            saw_part = true;
        }

        if !saw_part {
            return Err(Error::selector(self.source, "empty compound selector"));
        }
        Ok(compound)
    }

    fn attr_check(&mut self) -> Result<AttrCheck> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.ident()?.to_lowercase();
        self.skip_whitespace();

        let mut op = None;
        let mut value = None;

        match self.peek() {
            Some(']') => {}
            Some(c) => {
                op = Some(match c {
                    '=' => {
                        self.pos += 1;
                        AttrOp::Equals
                    }
                    '~' => {
                        self.pos += 1;
                        self.expect('=')?;
                        AttrOp::Includes
                    }
                    '|' => {
                        self.pos += 1;
                        self.expect('=')?;
                        AttrOp::DashMatch
                    }
                    '^' => {
                        self.pos += 1;
                        self.expect('=')?;
                        AttrOp::Prefix
                    }
                    '$' => {
                        self.pos += 1;
                        self.expect('=')?;
                        AttrOp::Suffix
                    }
                    '*' => {
                        self.pos += 1;
                        self.expect('=')?;
                        AttrOp::Substring
                    }
                    other => {
                        return Err(Error::selector(
                            self.source,
                            format!("unknown attribute operator '{}'", other),
                        ));
                    }
                });
                self.skip_whitespace();
                value = Some(self.string_or_ident()?);
                self.skip_whitespace();
            }
            None => {
                return Err(Error::selector(self.source, "unterminated attribute"));
            }
        }

        self.expect(']')?;
        Ok(AttrCheck { name, op, value })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Result<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(Error::selector(self.source, "expected identifier"));
        }
        Ok(out)
    }

    fn string_or_ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.peek() {
                        Some(c) if c == quote => {
                            self.pos += 1;
                            break;
                        }
                        Some('\\') => {
                            self.pos += 1;
                            if let Some(escaped) = self.peek() {
                                out.push(escaped);
                                self.pos += 1;
                            }
                        }
                        Some(c) => {
                            out.push(c);
                            self.pos += 1;
                        }
                        None => {
                            return Err(Error::selector(self.source, "unterminated string"));
                        }
                    }
                }
                Ok(out)
            }
            _ => self.ident(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(Error::selector(
                self.source,
                format!("expected '{}', got '{}'", expected, c),
            )),
            None => Err(Error::selector(
                self.source,
                format!("expected '{}', got end of input", expected),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_parse_shapes() {
        assert!(Selector::parse("div").is_ok());
        assert!(Selector::parse(".price_color").is_ok());
        assert!(Selector::parse("#main").is_ok());
        assert!(Selector::parse("span.a-price").is_ok());
        assert!(Selector::parse("div.pod > h3 a").is_ok());
        assert!(Selector::parse("[href]").is_ok());
        assert!(Selector::parse("a[href^='https']").is_ok());
        assert!(Selector::parse("img[src$=\".svg\"]").is_ok());
    }

    #[test]
    fn test_parse_rejects() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("p:first-child").is_err());
        assert!(Selector::parse("a, b").is_err());
        assert!(Selector::parse("[unclosed").is_err());
        assert!(Selector::parse("> h3").is_err());
        assert!(Selector::parse("div > > p").is_err());
        assert!(Selector::parse("div >").is_err());
    }

    #[test]
    fn test_compound_match() {
        let doc = parse_html(r#"<span class="a-price whole" id="p1">3</span>"#).unwrap();
        assert!(doc.select("span.a-price").unwrap().is_some());
        assert!(doc.select("span.a-price.whole").unwrap().is_some());
        assert!(doc.select("#p1").unwrap().is_some());
        assert!(doc.select("span#p1.whole").unwrap().is_some());
        assert!(doc.select("div.a-price").unwrap().is_none());
        assert!(doc.select("span.other").unwrap().is_none());
    }

    #[test]
    fn test_descendant_and_child() {
        let html = r#"
            <div class="outer"><section><p class="deep">x</p></section></div>
            <p class="shallow">y</p>
        "#;
        let doc = parse_html(html).unwrap();
        assert_eq!(doc.select_all(".outer p").unwrap().len(), 1);
        assert!(doc.select(".outer > p").unwrap().is_none());
        assert!(doc.select("section > p").unwrap().is_some());
    }

    #[test]
    fn test_attribute_operators() {
        let doc =
            parse_html(r#"<a href="https://example.com/a.svg" rel="nofollow external">x</a>"#)
                .unwrap();
        assert!(doc.select("a[href]").unwrap().is_some());
        assert!(doc.select("a[href^='https']").unwrap().is_some());
        assert!(doc.select("a[href$='.svg']").unwrap().is_some());
        assert!(doc.select("a[href*='example']").unwrap().is_some());
        assert!(doc.select("a[rel~='external']").unwrap().is_some());
        assert!(doc.select("a[rel='nofollow']").unwrap().is_none());
    }

    #[test]
    fn test_scoped_match_does_not_escape_container() {
        let html = r#"
            <div class="pod"><article><h3>inside</h3></article></div>
        "#;
        let doc = parse_html(html).unwrap();
        let article = doc.select("article").unwrap().unwrap();
        // ".pod h3" requires an ancestor outside the article scope
        assert!(article.select(".pod h3").unwrap().is_none());
        assert!(article.select("h3").unwrap().is_some());
    }
}
