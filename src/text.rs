// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Whitespace-aware text extraction over [`crate::rcdom`] trees.
//!
//! This walks the tree the way [`crate::serialize`] does, but collects
//! the human-readable text content instead of markup: `<script>`/
//! `<style>` (and other raw-text elements) are skipped, `<br>` becomes a
//! newline, block-level elements are separated from their neighbors by a
//! newline, and runs of ASCII whitespace collapse to a single space --
//! roughly what a browser's `.innerText` would report, not `.textContent`
//! (which keeps every character verbatim, whitespace included).

use crate::rcdom::{Handle, NodeData};

/// Element names whose contents are never visible text.
fn is_hidden_content(name: &str) -> bool {
    matches!(name, "script" | "style" | "template" | "title" | "textarea" | "noscript" | "noembed" | "noframes")
}

/// Element names that introduce a line break before and after their
/// content, matching the rough shape of the CSS `display: block` set.
fn is_block_level(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "details"
            | "dialog"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "tr"
            | "ul"
    )
}

/// Extract the visible text of `node` and its descendants, collapsing
/// whitespace the way a browser's `innerText` would.
pub fn extract_text(node: &Handle) -> String {
    let mut out = String::new();
    collect(node, &mut out);
    normalize_whitespace(&out)
}

fn collect(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } => {
            let local = name.local.as_str();
            if is_hidden_content(local) {
                return;
            }
            if local == "br" {
                out.push('\n');
                return;
            }
            let block = is_block_level(local);
            if block && !out.is_empty() {
                out.push('\n');
            }
            for child in node.children.borrow().iter() {
                collect(child, out);
            }
            if block {
                out.push('\n');
            }
        },
        _ => {
            for child in node.children.borrow().iter() {
                collect(child, out);
            }
        },
    }
}

/// Collapse runs of ASCII whitespace (other than the newlines we
/// deliberately inserted above) to a single space, and trim blank lines
/// down to at most one in a row.
fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    let mut pending_newlines = 0u32;
    for c in input.chars() {
        if c == '\n' {
            pending_newlines = (pending_newlines + 1).min(2);
            pending_space = false;
            continue;
        }
        if c.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_newlines > 0 {
            if !out.is_empty() {
                out.push('\n');
                if pending_newlines > 1 {
                    out.push('\n');
                }
            }
            pending_newlines = 0;
            pending_space = false;
        } else if pending_space {
            if !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{parse_bytes_to_dom, DocumentOpts};

    fn text_of(html: &str) -> String {
        let dom = parse_bytes_to_dom(html.as_bytes(), DocumentOpts::default())
            .unwrap()
            .dom;
        extract_text(&dom.document)
    }

    #[test]
    fn minimal_document_extracts_hello() {
        assert_eq!(
            text_of("<html><head></head><body><p>Hello</p></body></html>"),
            "Hello"
        );
    }

    #[test]
    fn script_and_style_contents_are_skipped() {
        let text = text_of(
            "<body><script>var x = 1;</script><style>p{color:red}</style><p>Visible</p></body>",
        );
        assert_eq!(text, "Visible");
    }

    #[test]
    fn br_becomes_a_newline() {
        let text = text_of("<body><p>one<br>two</p></body>");
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn block_elements_separate_with_newlines() {
        let text = text_of("<body><p>one</p><p>two</p></body>");
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn collapses_interior_whitespace() {
        let text = text_of("<body><p>one   two\n\nthree</p></body>");
        assert_eq!(text, "one two three");
    }
}
