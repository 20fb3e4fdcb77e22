// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for [`conform_html5::text`] over real parsed
//! documents and fragments.

use conform_html5::driver::{parse_fragment_bytes_to_dom, parse_str_to_dom, DocumentOpts};
use conform_html5::text::extract_text;

#[test]
fn nested_lists_separate_items_with_newlines() {
    let dom = parse_str_to_dom(
        "<ul><li>one</li><li>two</li><li>three</li></ul>",
        DocumentOpts::default(),
    )
    .unwrap();
    assert_eq!(extract_text(&dom.dom.document), "one\ntwo\nthree");
}

#[test]
fn title_is_not_visible_text() {
    let dom = parse_str_to_dom(
        "<html><head><title>Ignored</title></head><body><p>Shown</p></body></html>",
        DocumentOpts::default(),
    )
    .unwrap();
    assert_eq!(extract_text(&dom.dom.document), "Shown");
}

#[test]
fn fragment_extraction_does_not_require_a_full_document() {
    let parsed =
        parse_fragment_bytes_to_dom(b"<p>a</p><p>b</p>", "body", DocumentOpts::default()).unwrap();
    let root = parsed.dom.document.children.borrow()[0].clone();
    assert_eq!(extract_text(&root), "a\nb");
}

#[test]
fn entities_decode_before_extraction() {
    let dom = parse_str_to_dom("<p>Tom &amp; Jerry</p>", DocumentOpts::default()).unwrap();
    assert_eq!(extract_text(&dom.dom.document), "Tom & Jerry");
}
