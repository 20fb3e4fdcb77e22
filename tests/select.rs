// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for [`conform_html5::select`], exercised through a
//! real parsed document rather than a hand-built tree.

use conform_html5::driver::{parse_str_to_dom, DocumentOpts};
use conform_html5::rcdom::NodeData;
use conform_html5::select::{select, select_first, Selector};

fn text_of(node: &conform_html5::rcdom::Handle) -> String {
    let mut out = String::new();
    fn walk(n: &conform_html5::rcdom::Handle, out: &mut String) {
        if let NodeData::Text { contents } = &n.data {
            out.push_str(&contents.borrow());
        }
        for c in n.children.borrow().iter() {
            walk(c, out);
        }
    }
    walk(node, &mut out);
    out
}

#[test]
fn type_selector_finds_all_matches() {
    let dom = parse_str_to_dom(
        "<ul><li>a</li><li>b</li><li>c</li></ul>",
        DocumentOpts::default(),
    )
    .unwrap();
    let matches = select(&dom.dom.document, "li").unwrap();
    assert_eq!(matches.len(), 3);
}

#[test]
fn id_and_class_selectors() {
    let dom = parse_str_to_dom(
        r#"<div id="main"><p class="note">hi</p><p>bye</p></div>"#,
        DocumentOpts::default(),
    )
    .unwrap();
    let main = select_first(&dom.dom.document, &Selector::parse("#main").unwrap())
        .expect("#main exists");
    assert!(matches!(&main.data, NodeData::Element { name, .. } if name.local == "div"));

    let note = select_first(&dom.dom.document, &Selector::parse(".note").unwrap())
        .expect(".note exists");
    assert_eq!(text_of(&note), "hi");
}

#[test]
fn child_vs_descendant_combinator() {
    let dom = parse_str_to_dom(
        "<div><section><p>nested</p></section><p>direct</p></div>",
        DocumentOpts::default(),
    )
    .unwrap();

    let all_p = select(&dom.dom.document, "div p").unwrap();
    assert_eq!(all_p.len(), 2);

    let direct_children = select(&dom.dom.document, "div > p").unwrap();
    assert_eq!(direct_children.len(), 1);
    assert_eq!(text_of(&direct_children[0]), "direct");
}

#[test]
fn attribute_selector() {
    let dom = parse_str_to_dom(
        r#"<input type="text"><input type="checkbox">"#,
        DocumentOpts::default(),
    )
    .unwrap();
    let checkboxes = select(&dom.dom.document, r#"input[type="checkbox"]"#).unwrap();
    assert_eq!(checkboxes.len(), 1);
}

#[test]
fn selector_list_matches_any_alternative() {
    let dom = parse_str_to_dom("<h1>t</h1><h2>u</h2><p>v</p>", DocumentOpts::default()).unwrap();
    let headings = select(&dom.dom.document, "h1, h2").unwrap();
    assert_eq!(headings.len(), 2);
}

#[test]
fn invalid_selector_is_an_error() {
    assert!(Selector::parse("").is_err());
}
