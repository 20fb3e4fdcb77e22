// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `html5lib-tests` canonical tree dump: one indented line per node,
//! every line prefixed with `"| "`. This is the conformance oracle the
//! tree-construction fixtures compare against, not a format meant for
//! human consumption beyond that.

use crate::interface::Namespace;
use crate::rcdom::{Handle, NodeData};

fn indent(out: &mut String, depth: usize) {
    out.push_str("| ");
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn display_attr_name(attr: &crate::interface::Attribute) -> String {
    match &attr.name.prefix {
        Some(prefix) => format!("{} {}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    }
}

fn write_node(handle: &Handle, depth: usize, out: &mut String) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                write_node(child, depth, out);
            }
        },

        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            indent(out, 0);
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            if !public_id.is_empty() || !system_id.is_empty() {
                out.push_str(" \"");
                out.push_str(public_id);
                out.push_str("\" \"");
                out.push_str(system_id);
                out.push('"');
            }
            out.push('>');
            out.push('\n');
        },

        NodeData::Text { contents } => {
            indent(out, depth);
            out.push('"');
            out.push_str(&contents.borrow());
            out.push('"');
            out.push('\n');
        },

        NodeData::Comment { contents } => {
            indent(out, depth);
            out.push_str("<!-- ");
            out.push_str(contents);
            out.push_str(" -->\n");
        },

        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            indent(out, depth);
            out.push('<');
            match name.ns {
                Namespace::Svg => out.push_str("svg "),
                Namespace::MathMl => out.push_str("math "),
                _ => {},
            }
            out.push_str(&name.local);
            out.push('>');
            out.push('\n');

            let mut attr_lines: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|attr| (display_attr_name(attr), attr.value.to_string()))
                .collect();
            attr_lines.sort_by(|a, b| a.0.cmp(&b.0));
            for (attr_name, value) in attr_lines {
                indent(out, depth + 1);
                out.push_str(&attr_name);
                out.push_str("=\"");
                out.push_str(&value);
                out.push_str("\"\n");
            }

            if let Some(contents) = template_contents.borrow().as_ref() {
                indent(out, depth + 1);
                out.push_str("content\n");
                for child in contents.children.borrow().iter() {
                    write_node(child, depth + 2, out);
                }
            }

            for child in handle.children.borrow().iter() {
                write_node(child, depth + 1, out);
            }
        },
    }
}

/// Render `root` (a `Document` or `DocumentFragment` handle) in the
/// indented canonical form the tree-construction fixtures expect.
///
/// The returned string always ends with a trailing newline; callers
/// comparing against fixture `#document` blocks should trim both sides
/// before comparing, matching the fixtures' own right-stripped lines.
pub fn serialize_test_format(root: &Handle) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out);
    out
}

/// As [`serialize_test_format`], but for fragment parses: `root` is the
/// synthetic `<html>` context element the tree builder seeds the stack
/// with, and its *children* -- not `root` itself -- are what a
/// `#document-fragment` fixture's expected output describes.
pub fn serialize_test_format_fragment(root: &Handle) -> String {
    let mut out = String::new();
    for child in root.children.borrow().iter() {
        write_node(child, 0, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{Attribute, ElementFlags, LocalName, QualName, TreeSink};
    use crate::rcdom::RcDom;
    use crate::tendril::StrTendril;

    #[test]
    fn renders_nested_elements_and_attrs() {
        let dom = RcDom::default();
        let html = dom.create_element(QualName::html("html"), vec![], ElementFlags::default());
        dom.append(&dom.get_document(), crate::interface::AppendNode(html.clone()));

        let body = dom.create_element(
            QualName::html("body"),
            vec![Attribute {
                name: QualName::new(None, Namespace::None, LocalName::new("class")),
                value: StrTendril::from("a"),
            }],
            ElementFlags::default(),
        );
        dom.append(&html, crate::interface::AppendNode(body.clone()));
        dom.append(&body, crate::interface::AppendText(StrTendril::from("hi")));

        let out = serialize_test_format(&dom.document);
        assert_eq!(
            out,
            "| <html>\n|   <body>\n|     class=\"a\"\n|     \"hi\"\n"
        );
    }
}
