// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for [`conform_html5::markdown`] over real parsed
//! documents and fragments.

use conform_html5::driver::{parse_bytes_to_dom, parse_fragment_bytes_to_dom, DocumentOpts};
use conform_html5::markdown::to_markdown;

fn markdown_of(html: &str) -> String {
    let dom = parse_bytes_to_dom(html.as_bytes(), DocumentOpts::default())
        .unwrap()
        .dom;
    to_markdown(&dom.document)
}

#[test]
fn image_renders_alt_and_src() {
    let md = markdown_of(r#"<p><img src="a.png" alt="Alt text"></p>"#);
    assert_eq!(md, "![Alt text](a.png)");
}

#[test]
fn horizontal_rule_gets_its_own_paragraph() {
    let md = markdown_of("<p>before</p><hr><p>after</p>");
    assert_eq!(md, "before\n\n---\n\nafter");
}

#[test]
fn inline_code_span() {
    let md = markdown_of("<p>Run <code>cargo test</code> now</p>");
    assert_eq!(md, "Run `cargo test` now");
}

#[test]
fn link_without_href_leaves_the_target_blank() {
    let md = markdown_of("<p><a>no href</a></p>");
    assert_eq!(md, "[no href]()");
}

#[test]
fn head_contents_are_never_rendered() {
    let md = markdown_of(
        "<html><head><title>T</title></head><body><h1>H</h1><p>P</p></body></html>",
    );
    assert_eq!(md, "# H\n\nP");
}

#[test]
fn fragment_parse_renders_without_a_full_document() {
    let parsed =
        parse_fragment_bytes_to_dom(b"<p>a</p><p>b</p>", "body", DocumentOpts::default())
            .unwrap();
    let root = parsed.dom.document.children.borrow()[0].clone();
    assert_eq!(to_markdown(&root), "a\n\nb");
}
