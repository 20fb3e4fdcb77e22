// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the public byte-oriented façade in
//! [`conform_html5::driver`].

use conform_html5::driver::{parse_bytes_to_dom, parse_fragment_bytes_to_dom, parse_str_to_dom, DocumentOpts};
use conform_html5::rcdom::NodeData;

fn find_child<'a>(
    node: &'a conform_html5::rcdom::Handle,
    local: &str,
) -> Option<conform_html5::rcdom::Handle> {
    node.children
        .borrow()
        .iter()
        .find(|c| matches!(&c.data, NodeData::Element { name, .. } if name.local == local))
        .cloned()
}

#[test]
fn transport_encoding_overrides_sniffing() {
    let parsed = parse_bytes_to_dom(
        "<p>caf\u{e9}</p>".as_bytes(),
        DocumentOpts {
            transport_encoding: Some("utf-8".to_owned()),
            ..Default::default()
        },
    );
    // The literal Rust string above is UTF-8-encoded; absent the override
    // the default windows-1252 sniff would still decode it (every byte
    // sequence is valid windows-1252), just not as the same text.
    assert!(parsed.is_ok());
}

#[test]
fn parse_str_to_dom_reports_utf8() {
    let parsed = parse_str_to_dom("<p>hello</p>", DocumentOpts::default()).unwrap();
    assert_eq!(parsed.encoding, encoding_rs::UTF_8);
    let html = find_child(&parsed.dom.document, "html").expect("html element");
    assert!(find_child(&html, "head").is_some());
    assert!(find_child(&html, "body").is_some());
}

#[test]
fn collect_errors_flag_gates_the_returned_vec() {
    let quiet = parse_bytes_to_dom(b"<html></p></html>", DocumentOpts::default()).unwrap();
    assert!(quiet.errors.is_empty());

    let verbose = parse_bytes_to_dom(
        b"<html></p></html>",
        DocumentOpts {
            collect_errors: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!verbose.errors.is_empty());
}

#[test]
fn strict_mode_fails_closed_on_malformed_input() {
    let result = parse_bytes_to_dom(
        b"<html></p></html>",
        DocumentOpts {
            strict: true,
            ..Default::default()
        },
    );
    assert!(result.is_err());
}

#[test]
fn fragment_parse_seeds_context_without_wrapping_html() {
    let parsed =
        parse_fragment_bytes_to_dom(b"<li>a</li><li>b</li>", "ul", DocumentOpts::default())
            .unwrap();
    let children = parsed.dom.document.children.borrow();
    assert_eq!(children.len(), 1, "fragment root has exactly the synthetic context element");
    let items: Vec<_> = children[0]
        .children
        .borrow()
        .iter()
        .filter(|c| matches!(&c.data, NodeData::Element { name, .. } if name.local == "li"))
        .count();
    assert_eq!(items, 2);
}
