// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parse-then-serialize round trips against [`conform_html5::serialize`],
//! grounded in the upstream `html5ever` serializer test suite's shape:
//! parse a `<body>` fragment, serialize the resulting subtree, and check
//! it comes back out the way a browser's `outerHTML` would render it.

use conform_html5::driver::{parse_document, parse_fragment, ParseOpts};
use conform_html5::rcdom::{RcDom, SerializableHandle};
use conform_html5::serialize::{serialize, SerializeOpts};
use conform_html5::tendril::stream::TendrilSink;
use conform_html5::tendril::StrTendril;
use conform_html5::QualName;

fn parse_and_serialize(input: &str) -> String {
    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::html("body"),
        vec![],
        None,
    )
    .one(StrTendril::from(input));
    let root = dom.document.children.borrow()[0].clone();
    let mut out = Vec::new();
    for child in root.children.borrow().iter() {
        serialize(&mut out, &SerializableHandle::from(child.clone()), SerializeOpts::default()).unwrap();
    }
    String::from_utf8(out).unwrap()
}

macro_rules! round_trip {
    ($name:ident, $input:expr) => {
        #[test]
        fn $name() {
            assert_eq!(parse_and_serialize($input), $input);
        }
    };
    ($name:ident, $input:expr, $output:expr) => {
        #[test]
        fn $name() {
            assert_eq!(parse_and_serialize($input), $output);
        }
    };
}

round_trip!(empty, "");
round_trip!(smoke_test, r#"<p><i>Hello</i>, World!</p>"#);
round_trip!(
    misnest,
    r#"<p><i>Hello!</p>, World!</i>"#,
    r#"<p><i>Hello!</i></p><i>, World!</i>"#
);

round_trip!(attr_literal, r#"<base foo="<'>">"#);
round_trip!(attr_escape_amp, r#"<base foo="&amp;">"#);
round_trip!(attr_escape_amp_2, r#"<base foo=&amp>"#, r#"<base foo="&amp;">"#);
round_trip!(attr_escape_quot, r#"<base foo='"'>"#, r#"<base foo="&quot;">"#);

round_trip!(text_escape_amp, r#"<p>&amp;</p>"#);
round_trip!(text_escape_lt, r#"<p>&lt;</p>"#);
round_trip!(text_escape_gt, r#"<p>&gt;</p>"#);
round_trip!(text_escape_gt2, r#"<p>></p>"#, r#"<p>&gt;</p>"#);

round_trip!(
    script_literal,
    r#"<script>(x & 1) < 2; y > "foo" + 'bar'</script>"#
);
round_trip!(
    style_literal,
    r#"<style>(x & 1) < 2; y > "foo" + 'bar'</style>"#
);

round_trip!(pre_lf_0, "<pre>foo bar</pre>");
round_trip!(pre_lf_1, "<pre>\nfoo bar</pre>", "<pre>foo bar</pre>");
round_trip!(pre_lf_2, "<pre>\n\nfoo bar</pre>", "<pre>\nfoo bar</pre>");

round_trip!(void_element_has_no_closing_tag, "<br><hr><img>");

#[test]
fn doctype_only_document() {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one("<!doctype html>");
    dom.document.children.borrow_mut().truncate(1); // drop the implied <html>
    let mut out = Vec::new();
    for child in dom.document.children.borrow().iter() {
        serialize(&mut out, &SerializableHandle::from(child.clone()), SerializeOpts::default()).unwrap();
    }
    assert_eq!(String::from_utf8(out).unwrap(), "<!DOCTYPE html>");
}
