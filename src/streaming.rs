// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A lazy, token-level event façade over the tokenizer, for callers who
//! want a SAX-style walk without building a tree at all.
//!
//! Unlike [`crate::driver`], this runs the tokenizer on its own --
//! there's no tree builder underneath, so there's no insertion-mode
//! error correction (misnested tags, foster parenting, and the like
//! pass through verbatim as the raw token stream saw them). Adjacent
//! character tokens are coalesced into a single `Text` event, matching
//! what the tree builder would have inserted as one coalesced text
//! node.

use std::cell::RefCell;

use crate::buffer_queue::BufferQueue;
use crate::tendril::StrTendril;
use crate::tokenizer::{
    Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts, TokenizerResult,
};

/// One token-level parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A start tag, with its lowercased name and attributes in document
    /// order. Emitted for self-closing tags too (immediately followed by
    /// a matching `End`).
    Start(String, Vec<(String, String)>),
    /// An end tag.
    End(String),
    /// A run of coalesced character data.
    Text(String),
    /// A comment's contents.
    Comment(String),
    /// A `DOCTYPE`, with its name, public id, and system id.
    Doctype(String, Option<String>, Option<String>),
}

struct EventSink {
    events: RefCell<Vec<StreamEvent>>,
    pending_text: RefCell<String>,
}

impl EventSink {
    fn new() -> EventSink {
        EventSink {
            events: RefCell::new(Vec::new()),
            pending_text: RefCell::new(String::new()),
        }
    }

    fn flush_text(&self) {
        let mut pending = self.pending_text.borrow_mut();
        if !pending.is_empty() {
            self.events
                .borrow_mut()
                .push(StreamEvent::Text(std::mem::take(&mut pending)));
        }
    }

    fn push_tag(&self, tag: Tag) {
        self.flush_text();
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let attrs = tag
                    .attrs
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                self.events
                    .borrow_mut()
                    .push(StreamEvent::Start(name.clone(), attrs));
                if tag.self_closing {
                    self.events.borrow_mut().push(StreamEvent::End(name));
                }
            },
            TagKind::EndTag => {
                self.events.borrow_mut().push(StreamEvent::End(name));
            },
        }
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(s) => self.pending_text.borrow_mut().push_str(&s),
            Token::NullCharacterToken => self.pending_text.borrow_mut().push('\u{0}'),
            Token::TagToken(tag) => self.push_tag(tag),
            Token::CommentToken(s) => {
                self.flush_text();
                self.events
                    .borrow_mut()
                    .push(StreamEvent::Comment(s.to_string()));
            },
            Token::DoctypeToken(d) => {
                self.flush_text();
                self.events.borrow_mut().push(StreamEvent::Doctype(
                    d.name.as_deref().unwrap_or("").to_owned(),
                    d.public_id.as_deref().map(ToOwned::to_owned),
                    d.system_id.as_deref().map(ToOwned::to_owned),
                ));
            },
            Token::EOFToken => self.flush_text(),
            Token::ParseError(_) => {},
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize `input` and collect the resulting [`StreamEvent`]s, in
/// document order. The whole input is consumed up front (there's no
/// partial/incremental variant), but the result is handed back as a
/// plain, one-shot iterator so callers can `for event in stream_events(..)`
/// without collecting a `Vec` themselves.
pub fn stream_events(input: &str, opts: TokenizerOpts) -> std::vec::IntoIter<StreamEvent> {
    let sink = EventSink::new();
    let tokenizer = Tokenizer::new(sink, opts);
    let buffer = BufferQueue::default();
    buffer.push_back(StrTendril::from(input));
    loop {
        match tokenizer.feed(&buffer) {
            TokenizerResult::Done => break,
            TokenizerResult::Script(()) => {},
        }
    }
    tokenizer.end();
    tokenizer.sink.events.into_inner().into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_start_text_end() {
        let events: Vec<_> = stream_events("<p>hi</p>", TokenizerOpts::default()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Start("p".to_owned(), vec![]),
                StreamEvent::Text("hi".to_owned()),
                StreamEvent::End("p".to_owned()),
            ]
        );
    }

    #[test]
    fn coalesces_adjacent_character_tokens() {
        let events: Vec<_> =
            stream_events("<p>a &amp; b</p>", TokenizerOpts::default()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Start("p".to_owned(), vec![]),
                StreamEvent::Text("a & b".to_owned()),
                StreamEvent::End("p".to_owned()),
            ]
        );
    }

    #[test]
    fn attributes_are_preserved() {
        let events: Vec<_> =
            stream_events(r#"<a href="x">t</a>"#, TokenizerOpts::default()).collect();
        assert_eq!(
            events[0],
            StreamEvent::Start("a".to_owned(), vec![("href".to_owned(), "x".to_owned())])
        );
    }

    #[test]
    fn comment_and_doctype() {
        let events: Vec<_> =
            stream_events("<!DOCTYPE html><!--hi-->", TokenizerOpts::default()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Doctype("html".to_owned(), None, None),
                StreamEvent::Comment("hi".to_owned()),
            ]
        );
    }

    #[test]
    fn self_closing_tag_emits_start_and_end() {
        let events: Vec<_> = stream_events("<br/>", TokenizerOpts::default()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Start("br".to_owned(), vec![]),
                StreamEvent::End("br".to_owned()),
            ]
        );
    }
}
