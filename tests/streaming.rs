// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for [`conform_html5::streaming`]'s token-level event
//! façade.

use conform_html5::streaming::{stream_events, StreamEvent};
use conform_html5::tokenizer::TokenizerOpts;

#[test]
fn nested_elements_emit_balanced_start_and_end_events() {
    let events: Vec<_> =
        stream_events("<div><p>hi</p></div>", TokenizerOpts::default()).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Start("div".to_owned(), vec![]),
            StreamEvent::Start("p".to_owned(), vec![]),
            StreamEvent::Text("hi".to_owned()),
            StreamEvent::End("p".to_owned()),
            StreamEvent::End("div".to_owned()),
        ]
    );
}

#[test]
fn misnested_tags_pass_through_without_tree_correction() {
    // No tree builder underneath: the `<b>` close simply shows up out of
    // order, unlike what a full parse would reconstruct.
    let events: Vec<_> = stream_events("<b><i>x</b></i>", TokenizerOpts::default()).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Start("b".to_owned(), vec![]),
            StreamEvent::Start("i".to_owned(), vec![]),
            StreamEvent::Text("x".to_owned()),
            StreamEvent::End("b".to_owned()),
            StreamEvent::End("i".to_owned()),
        ]
    );
}

#[test]
fn multiple_attributes_preserve_document_order() {
    let events: Vec<_> =
        stream_events(r#"<input type="text" name="q" value="">"#, TokenizerOpts::default())
            .collect();
    assert_eq!(
        events[0],
        StreamEvent::Start(
            "input".to_owned(),
            vec![
                ("type".to_owned(), "text".to_owned()),
                ("name".to_owned(), "q".to_owned()),
                ("value".to_owned(), "".to_owned()),
            ]
        )
    );
}

#[test]
fn character_references_are_decoded_in_text_events() {
    let events: Vec<_> = stream_events("<p>a &amp; b &lt; c</p>", TokenizerOpts::default())
        .collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Start("p".to_owned(), vec![]),
            StreamEvent::Text("a & b < c".to_owned()),
            StreamEvent::End("p".to_owned()),
        ]
    );
}

#[test]
fn empty_input_yields_no_events() {
    let events: Vec<_> = stream_events("", TokenizerOpts::default()).collect();
    assert!(events.is_empty());
}
