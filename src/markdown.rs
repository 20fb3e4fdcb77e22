// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small, best-effort HTML → Markdown converter over [`crate::rcdom`]
//! trees.
//!
//! This covers the common subset a hand-written document would actually
//! use -- headings, paragraphs, emphasis, links, images, lists, code,
//! blockquotes, and `<br>`/`<hr>` -- and falls back to the element's
//! text content for anything else. It is not a general HTML rendering
//! engine: tables, nested lists with mixed markers, and footnotes are
//! not a goal (callers who need that much fidelity should walk the tree
//! themselves, as [`crate::select`] does).

use crate::rcdom::{Handle, NodeData};

/// Render `node` (typically a `#document` or `<body>` handle) as
/// Markdown.
pub fn to_markdown(node: &Handle) -> String {
    let mut out = String::new();
    render_children(node, &mut out, 0);
    trim_blank_runs(&out)
}

fn attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|a| a.name.local.as_str() == name)
        .map(|a| a.value.to_string())
}

fn render_children(node: &Handle, out: &mut String, list_depth: usize) {
    for child in node.children.borrow().iter() {
        render_node(child, out, list_depth);
    }
}

fn ensure_blank_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
}

fn render_inline_children(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        render_inline(child, out);
    }
}

/// Render `node` as inline Markdown (no block-level spacing), the form
/// used inside headings, paragraphs, and list items.
fn render_inline(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&collapse_whitespace(&contents.borrow())),
        NodeData::Element { name, .. } => {
            let local = name.local.as_str();
            match local {
                "strong" | "b" => {
                    out.push_str("**");
                    render_inline_children(node, out);
                    out.push_str("**");
                },
                "em" | "i" => {
                    out.push('*');
                    render_inline_children(node, out);
                    out.push('*');
                },
                "code" => {
                    out.push('`');
                    render_inline_children(node, out);
                    out.push('`');
                },
                "a" => {
                    let href = attr(node, "href").unwrap_or_default();
                    out.push('[');
                    render_inline_children(node, out);
                    out.push_str("](");
                    out.push_str(&href);
                    out.push(')');
                },
                "img" => {
                    let alt = attr(node, "alt").unwrap_or_default();
                    let src = attr(node, "src").unwrap_or_default();
                    out.push_str("![");
                    out.push_str(&alt);
                    out.push_str("](");
                    out.push_str(&src);
                    out.push(')');
                },
                "br" => out.push_str("  \n"),
                _ => render_inline_children(node, out),
            }
        },
        _ => render_inline_children(node, out),
    }
}

fn render_node(node: &Handle, out: &mut String, list_depth: usize) {
    let NodeData::Element { name, .. } = &node.data else {
        if let NodeData::Text { contents } = &node.data {
            let text = collapse_whitespace(&contents.borrow());
            if !text.trim().is_empty() {
                out.push_str(&text);
            }
        }
        return;
    };

    match name.local.as_str() {
        "script" | "style" | "template" | "head" => {},
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name.local.as_bytes()[1] - b'0';
            ensure_blank_line(out);
            out.push_str(&"#".repeat(level as usize));
            out.push(' ');
            render_inline_children(node, out);
            out.push('\n');
        },
        "p" | "div" => {
            ensure_blank_line(out);
            render_inline_children(node, out);
            out.push('\n');
        },
        "blockquote" => {
            ensure_blank_line(out);
            let mut inner = String::new();
            render_children(node, &mut inner, list_depth);
            for line in trim_blank_runs(&inner).lines() {
                out.push_str("> ");
                out.push_str(line);
                out.push('\n');
            }
        },
        "pre" => {
            ensure_blank_line(out);
            out.push_str("```\n");
            let mut inner = String::new();
            collect_raw_text(node, &mut inner);
            out.push_str(inner.trim_end_matches('\n'));
            out.push('\n');
            out.push_str("```\n");
        },
        "ul" => {
            ensure_blank_line(out);
            for child in node.children.borrow().iter() {
                if is_element(child, "li") {
                    render_list_item(child, out, list_depth, None);
                }
            }
        },
        "ol" => {
            ensure_blank_line(out);
            let mut n = 1;
            for child in node.children.borrow().iter() {
                if is_element(child, "li") {
                    render_list_item(child, out, list_depth, Some(n));
                    n += 1;
                }
            }
        },
        "hr" => {
            ensure_blank_line(out);
            out.push_str("---\n");
        },
        "br" => out.push_str("  \n"),
        _ => render_children(node, out, list_depth),
    }
}

fn render_list_item(node: &Handle, out: &mut String, list_depth: usize, ordinal: Option<u32>) {
    out.push_str(&"  ".repeat(list_depth));
    match ordinal {
        Some(n) => out.push_str(&format!("{n}. ")),
        None => out.push_str("- "),
    }
    let mut inline = String::new();
    render_inline_children(node, &mut inline);
    out.push_str(inline.trim());
    out.push('\n');

    for child in node.children.borrow().iter() {
        if is_element(child, "ul") || is_element(child, "ol") {
            render_node(child, out, list_depth + 1);
        }
    }
}

fn is_element(node: &Handle, local: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if name.local.as_str() == local)
}

fn collect_raw_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_raw_text(child, out);
            }
        },
    }
}

/// Collapse runs of ASCII whitespace to a single space, same as a
/// browser's inline layout would. Unlike [`trim`], a whitespace-only
/// input collapses to a single space rather than the empty string --
/// dropping it would glue together the inline elements on either side.
fn collapse_whitespace(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    if input.chars().all(|c| c.is_ascii_whitespace()) {
        return " ".to_owned();
    }
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for c in input.chars() {
        if c.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    if pending_space {
        out.push(' ');
    }
    out
}

/// Collapse three-or-more consecutive newlines down to two, and trim
/// leading/trailing blank lines.
fn trim_blank_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut newline_run = 0u32;
    for c in input.chars() {
        if c == '\n' {
            newline_run += 1;
            if newline_run <= 2 {
                out.push(c);
            }
        } else {
            newline_run = 0;
            out.push(c);
        }
    }
    out.trim_matches('\n').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{parse_bytes_to_dom, DocumentOpts};

    fn markdown_of(html: &str) -> String {
        let dom = parse_bytes_to_dom(html.as_bytes(), DocumentOpts::default())
            .unwrap()
            .dom;
        to_markdown(&dom.document)
    }

    #[test]
    fn heading_and_paragraph() {
        let md = markdown_of("<h1>Title</h1><p>Body text</p>");
        assert_eq!(md, "# Title\n\nBody text");
    }

    #[test]
    fn emphasis_and_links() {
        let md = markdown_of(r#"<p><strong>bold</strong> <em>em</em> <a href="http://x">link</a></p>"#);
        assert_eq!(md, "**bold** *em* [link](http://x)");
    }

    #[test]
    fn unordered_list() {
        let md = markdown_of("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(md, "- one\n- two");
    }

    #[test]
    fn ordered_list() {
        let md = markdown_of("<ol><li>first</li><li>second</li></ol>");
        assert_eq!(md, "1. first\n2. second");
    }

    #[test]
    fn code_block_preserves_whitespace() {
        let md = markdown_of("<pre>fn main() {\n    println!();\n}</pre>");
        assert_eq!(md, "```\nfn main() {\n    println!();\n}\n```");
    }

    #[test]
    fn blockquote_prefixes_lines() {
        let md = markdown_of("<blockquote><p>one</p><p>two</p></blockquote>");
        assert_eq!(md, "> one\n> \n> two");
    }
}
