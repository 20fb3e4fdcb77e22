// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small CSS selector subset over [`crate::rcdom`] trees.
//!
//! This is a thin consumer of the parsed tree, not a CSS engine: it
//! covers type, `#id`, `.class`, and `[attr]`/`[attr=value]` simple
//! selectors, descendant (whitespace) and child (`>`) combinators, and
//! comma-separated selector lists. No pseudo-classes, attribute
//! operators beyond `=`, or specificity ordering -- callers that need
//! more should walk [`crate::rcdom::Node`] directly, the way
//! [`crate::text`] and [`crate::markdown`] do.

use std::fmt;
use std::rc::Rc;

use crate::rcdom::{Handle, NodeData};

/// A selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector: {}", self.message)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    Type(String),
    Id(String),
    Class(String),
    AttrPresent(String),
    AttrEquals(String, String),
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One compound selector (`div.foo[bar]`) plus the combinator that joins
/// it to the compound selector to its *left* (`None` for the first one
/// in a sequence).
#[derive(Debug, Clone)]
struct Compound {
    simples: Vec<SimpleSelector>,
    combinator: Option<Combinator>,
}

/// A parsed selector list (comma-separated alternatives); a node matches
/// the list if it matches any one alternative.
#[derive(Debug, Clone)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector string. Whitespace between tokens is significant
    /// only as the descendant combinator; otherwise it's insignificant.
    pub fn parse(input: &str) -> Result<Selector, SelectorError> {
        let alternatives = input
            .split(',')
            .map(|part| parse_sequence(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        if alternatives.iter().any(|seq| seq.is_empty()) {
            return Err(SelectorError {
                message: "empty selector".to_owned(),
            });
        }
        Ok(Selector { alternatives })
    }

    /// Does `node` itself match this selector?
    pub fn matches(&self, node: &Handle) -> bool {
        self.alternatives.iter().any(|seq| matches_sequence(node, seq))
    }
}

enum RawToken {
    Compound(String),
    GreaterThan,
}

/// Split `input` into bare compound-selector strings and `>` markers,
/// collapsing runs of whitespace into the gaps between them.
fn tokenize_sequence(input: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '>' => {
                if !current.is_empty() {
                    tokens.push(RawToken::Compound(std::mem::take(&mut current)));
                }
                tokens.push(RawToken::GreaterThan);
            },
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(RawToken::Compound(std::mem::take(&mut current)));
                }
            },
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(RawToken::Compound(current));
    }
    tokens
}

fn parse_sequence(input: &str) -> Result<Vec<Compound>, SelectorError> {
    let mut compounds = Vec::new();
    let mut pending_combinator = None;
    for token in tokenize_sequence(input) {
        match token {
            RawToken::GreaterThan => pending_combinator = Some(Combinator::Child),
            RawToken::Compound(text) => {
                let combinator = if compounds.is_empty() {
                    None
                } else {
                    Some(pending_combinator.take().unwrap_or(Combinator::Descendant))
                };
                compounds.push(Compound {
                    simples: parse_compound(&text)?,
                    combinator,
                });
                pending_combinator = None;
            },
        }
    }
    Ok(compounds)
}

fn parse_compound(token: &str) -> Result<Vec<SimpleSelector>, SelectorError> {
    let mut simples = Vec::new();
    let mut rest = token;

    if rest == "*" {
        return Ok(vec![SimpleSelector::Any]);
    }

    // Leading type selector, if any.
    if let Some(c) = rest.chars().next() {
        if c.is_ascii_alphabetic() || c == '_' {
            let end = rest
                .find(['#', '.', '['])
                .unwrap_or(rest.len());
            simples.push(SimpleSelector::Type(rest[..end].to_ascii_lowercase()));
            rest = &rest[end..];
        }
    }

    while !rest.is_empty() {
        match rest.chars().next().unwrap() {
            '#' => {
                let end = rest[1..]
                    .find(['#', '.', '['])
                    .map(|i| i + 1)
                    .unwrap_or(rest.len());
                simples.push(SimpleSelector::Id(rest[1..end].to_owned()));
                rest = &rest[end..];
            },
            '.' => {
                let end = rest[1..]
                    .find(['#', '.', '['])
                    .map(|i| i + 1)
                    .unwrap_or(rest.len());
                simples.push(SimpleSelector::Class(rest[1..end].to_owned()));
                rest = &rest[end..];
            },
            '[' => {
                let close = rest.find(']').ok_or_else(|| SelectorError {
                    message: format!("unterminated attribute selector in `{token}`"),
                })?;
                let body = &rest[1..close];
                simples.push(parse_attr_selector(body)?);
                rest = &rest[close + 1..];
            },
            other => {
                return Err(SelectorError {
                    message: format!("unexpected character `{other}` in `{token}`"),
                })
            },
        }
    }

    if simples.is_empty() {
        return Err(SelectorError {
            message: format!("empty compound selector in `{token}`"),
        });
    }
    Ok(simples)
}

fn parse_attr_selector(body: &str) -> Result<SimpleSelector, SelectorError> {
    match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim_matches(['"', '\'']);
            Ok(SimpleSelector::AttrEquals(
                name.trim().to_ascii_lowercase(),
                value.to_owned(),
            ))
        },
        None => Ok(SimpleSelector::AttrPresent(body.trim().to_ascii_lowercase())),
    }
}

fn matches_simple(node: &Handle, simple: &SimpleSelector) -> bool {
    let NodeData::Element { name, attrs, .. } = &node.data else {
        return false;
    };
    match simple {
        SimpleSelector::Any => true,
        SimpleSelector::Type(t) => name.local.as_str() == t,
        SimpleSelector::Id(id) => attrs
            .borrow()
            .iter()
            .any(|a| a.name.local == "id" && &*a.value == id.as_str()),
        SimpleSelector::Class(class) => attrs.borrow().iter().any(|a| {
            a.name.local == "class" && a.value.split_ascii_whitespace().any(|c| c == class)
        }),
        SimpleSelector::AttrPresent(name_) => {
            attrs.borrow().iter().any(|a| a.name.local.as_str() == name_)
        },
        SimpleSelector::AttrEquals(name_, value) => attrs
            .borrow()
            .iter()
            .any(|a| a.name.local.as_str() == name_ && &*a.value == value.as_str()),
    }
}

fn matches_compound(node: &Handle, compound: &Compound) -> bool {
    compound.simples.iter().all(|s| matches_simple(node, s))
}

fn parent_of(node: &Handle) -> Option<Handle> {
    node.parent.take().inspect(|weak| node.parent.set(Some(weak.clone()))).and_then(|weak| weak.upgrade())
}

/// Does `node` match the last compound of `sequence`, with every earlier
/// compound satisfied by some ancestor (descendant) or the immediate
/// parent (child), walking right to left?
fn matches_sequence(node: &Handle, sequence: &[Compound]) -> bool {
    let Some((last, rest)) = sequence.split_last() else {
        return false;
    };
    matches_compound(node, last) && matches_ancestors(node, rest, last.combinator)
}

/// `node` has already been matched against the compound to the right of
/// `rest`; `combinator` is *that* compound's combinator, i.e. how it
/// relates to `rest`'s last element.
fn matches_ancestors(node: &Handle, rest: &[Compound], combinator: Option<Combinator>) -> bool {
    let Some((compound, earlier)) = rest.split_last() else {
        return true;
    };
    match combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => {
            let Some(parent) = parent_of(node) else {
                return false;
            };
            matches_compound(&parent, compound)
                && matches_ancestors(&parent, earlier, compound.combinator)
        },
        Combinator::Descendant => {
            let mut current = node.clone();
            while let Some(parent) = parent_of(&current) {
                if matches_compound(&parent, compound)
                    && matches_ancestors(&parent, earlier, compound.combinator)
                {
                    return true;
                }
                current = parent;
            }
            false
        },
    }
}

/// Walk `root` in document order, returning every descendant (not
/// `root` itself) matching `selector`.
pub fn select_all(root: &Handle, selector: &Selector) -> Vec<Handle> {
    let mut ordered = Vec::new();
    collect_in_order(root, &mut ordered);
    ordered
        .into_iter()
        .filter(|node| !Rc::ptr_eq(node, root) && selector.matches(node))
        .collect()
}

fn collect_in_order(node: &Handle, out: &mut Vec<Handle>) {
    out.push(node.clone());
    for child in node.children.borrow().iter() {
        collect_in_order(child, out);
    }
}

/// The first descendant of `root` (not `root` itself) matching
/// `selector`, in document order.
pub fn select_first(root: &Handle, selector: &Selector) -> Option<Handle> {
    select_all(root, selector).into_iter().next()
}

/// Convenience one-shot: parse `selector` and run [`select_all`].
pub fn select(root: &Handle, selector: &str) -> Result<Vec<Handle>, SelectorError> {
    Ok(select_all(root, &Selector::parse(selector)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{parse_bytes_to_dom, DocumentOpts};

    fn dom_for(html: &str) -> crate::rcdom::RcDom {
        parse_bytes_to_dom(html.as_bytes(), DocumentOpts::default())
            .unwrap()
            .dom
    }

    #[test]
    fn type_selector_matches_tag() {
        let dom = dom_for("<html><body><p>one</p><p>two</p></body></html>");
        let matches = select(&dom.document, "p").unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn id_and_class_selectors() {
        let dom = dom_for(
            r#"<html><body><div id="main" class="a b"><span class="a">x</span></div></body></html>"#,
        );
        assert_eq!(select(&dom.document, "#main").unwrap().len(), 1);
        assert_eq!(select(&dom.document, ".a").unwrap().len(), 2);
        assert_eq!(select(&dom.document, "div.b").unwrap().len(), 1);
    }

    #[test]
    fn descendant_and_child_combinators() {
        let dom = dom_for("<html><body><div><p><span>x</span></p></div></body></html>");
        assert_eq!(select(&dom.document, "div span").unwrap().len(), 1);
        assert!(select(&dom.document, "div > span").unwrap().is_empty());
        assert_eq!(select(&dom.document, "p > span").unwrap().len(), 1);
    }

    #[test]
    fn attribute_selectors() {
        let dom = dom_for(r#"<html><body><a href="x">one</a><a>two</a></body></html>"#);
        assert_eq!(select(&dom.document, "a[href]").unwrap().len(), 1);
        assert_eq!(select(&dom.document, r#"a[href="x"]"#).unwrap().len(), 1);
    }

    #[test]
    fn invalid_selector_reports_error() {
        assert!(Selector::parse("div[").is_err());
    }
}
