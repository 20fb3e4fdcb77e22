// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wires the [`tokenizer`](crate::tokenizer), [`tree_builder`](crate::tree_builder),
//! and [`encoding`](crate::encoding) pieces together behind a couple of
//! entry points.
//!
//! The low-level [`parse_document`]/[`parse_fragment`] functions match
//! upstream's shape exactly: they return a [`Parser`] that implements
//! `tendril::TendrilSink`, so any `TreeSink` can be driven with
//! `.from_utf8().read_from(&mut reader)` or `.one(tendril)`. [`parse_bytes_to_dom`]
//! and [`parse_fragment_bytes_to_dom`] are the crate's own higher-level
//! convenience wrappers: they run the [`encoding`] sniffer over a raw
//! byte buffer, parse into an [`crate::rcdom::RcDom`], run the
//! `<select>`/`<selectedcontent>` finalization pass, and fail with
//! [`StrictModeError`] in `strict` mode.

use std::borrow::Cow;

use crate::errors::{ErrorCode, ParseError, StrictModeError};
use crate::interface::{Attribute, QualName, TreeSink};
use crate::rcdom::{self, RcDom};
use crate::tendril;
use crate::tendril::stream::{TendrilSink, Utf8LossyDecoder};
use crate::tendril::StrTendril;
use crate::tokenizer::{Tokenizer, TokenizerOpts};
use crate::tree_builder::{TreeBuilder, TreeBuilderOpts};

/// All the knobs that control one parse, mirroring how upstream layers
/// `TokenizerOpts`/`TreeBuilderOpts` under a single struct rather than a
/// builder.
#[derive(Clone, Default)]
pub struct ParseOpts {
    /// Tokenizer options.
    pub tokenizer: TokenizerOpts,
    /// Tree builder options.
    pub tree_builder: TreeBuilderOpts,
}

/// Parse an HTML document into `sink`, returning a `TendrilSink` driver.
///
/// ## Example
///
/// ```ignore
/// let dom = parse_document(RcDom::default(), ParseOpts::default())
///     .from_utf8()
///     .read_from(&mut stdin)
///     .unwrap();
/// ```
pub fn parse_document<Sink>(sink: Sink, opts: ParseOpts) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let tb = TreeBuilder::new(sink, opts.tree_builder);
    let tok = Tokenizer::new(tb, opts.tokenizer);
    Parser {
        tokenizer: tok,
        input_buffer: Default::default(),
    }
}

/// Parse an HTML fragment into `sink`, in the context of `context_name`
/// (e.g. `QualName::html("body")`). <https://html.spec.whatwg.org/multipage/#parsing-html-fragments>
pub fn parse_fragment<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_name: QualName,
    context_attrs: Vec<Attribute>,
    form_elem: Option<Sink::Handle>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let context_elem = crate::interface::create_element(&sink, context_name, context_attrs);
    parse_fragment_for_element(sink, opts, context_elem, form_elem)
}

/// As [`parse_fragment`], but the context element has already been built
/// by the caller (e.g. it's a real `Handle` borrowed out of another tree).
pub fn parse_fragment_for_element<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_elem: Sink::Handle,
    form_elem: Option<Sink::Handle>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let tb = TreeBuilder::new_for_fragment(sink, context_elem, form_elem, opts.tree_builder);
    let tok_opts = TokenizerOpts {
        initial_state: Some(
            tb.tokenizer_state_for_context_elem(opts.tree_builder.scripting_enabled),
        ),
        ..opts.tokenizer
    };
    let tok = Tokenizer::new(tb, tok_opts);
    Parser {
        tokenizer: tok,
        input_buffer: Default::default(),
    }
}

/// An HTML parser, ready to receive Unicode input through the
/// `tendril::TendrilSink` trait's methods (`.one(tendril)`, or
/// `.from_utf8().read_from(&mut reader)` for byte input that's already
/// known to be UTF-8).
///
/// For byte input whose encoding isn't known in advance, sniff it with
/// [`crate::encoding::decode`] and feed the result through `.one(...)`
/// instead -- see [`parse_bytes_to_dom`].
pub struct Parser<Sink>
where
    Sink: TreeSink,
{
    /// Tokenizer + tree builder pair driving this parse.
    pub tokenizer: Tokenizer<TreeBuilder<Sink::Handle, Sink>>,
    /// Unprocessed input, queued up between `process` calls.
    pub input_buffer: crate::buffer_queue::BufferQueue,
}

impl<Sink: TreeSink> TendrilSink<tendril::fmt::UTF8> for Parser<Sink> {
    type Output = Sink::Output;

    fn process(&mut self, t: StrTendril) {
        self.input_buffer.push_back(t);
        loop {
            match self.tokenizer.feed(&self.input_buffer) {
                crate::tokenizer::TokenizerResult::Done => break,
                // The tree builder handed us a `<script>` element to run.
                // Scripting execution is out of scope: treat it as
                // immediately "complete" and keep tokenizing the rest of
                // the buffered input.
                crate::tokenizer::TokenizerResult::Script(node) => {
                    self.tokenizer.sink.sink.complete_script(&node);
                },
            }
        }
    }

    fn error(&mut self, desc: Cow<'static, str>) {
        self.tokenizer.sink.sink.parse_error(desc);
    }

    fn finish(self) -> Self::Output {
        self.tokenizer.end();
        self.tokenizer.sink.sink.finish()
    }
}

impl<Sink: TreeSink> Parser<Sink> {
    /// Wrap this parser into a `TendrilSink` that accepts UTF-8 bytes,
    /// decoding lossily (like `String::from_utf8_lossy`). Use this only
    /// when the input's encoding is already known to be UTF-8; otherwise
    /// go through [`crate::encoding::decode`] first.
    pub fn from_utf8(self) -> Utf8LossyDecoder<Self> {
        Utf8LossyDecoder::new(self)
    }
}

/// The result of the high-level byte-oriented façade: a parsed
/// [`RcDom`], the errors collected along the way (if requested), and the
/// encoding that was actually used to decode the input.
pub struct ParsedDocument {
    pub dom: RcDom,
    pub errors: Vec<ParseError>,
    pub encoding: &'static encoding_rs::Encoding,
}

/// Options for the high-level byte-oriented façade.
#[derive(Clone, Default)]
pub struct DocumentOpts {
    pub parse: ParseOpts,
    /// Raise the first parse error as an exceptional failure once
    /// tokenization of the whole input has finished.
    pub strict: bool,
    /// Populate `ParsedDocument::errors`. If false, errors are still
    /// recorded internally (parsing is total either way) but discarded
    /// before being handed back, to avoid the allocation on a hot path
    /// that doesn't want them.
    pub collect_errors: bool,
    /// A transport-layer encoding override (e.g. from an HTTP
    /// `Content-Type` header), consulted before the BOM/`<meta>` sniff.
    pub transport_encoding: Option<String>,
    /// Is this document being parsed from the `srcdoc` attribute of an
    /// `<iframe>`? Threaded through to `TreeBuilderOpts::iframe_srcdoc`.
    pub iframe_srcdoc: bool,
}

/// Sniff `bytes`' encoding, decode them, parse the result as a full
/// document into a fresh [`RcDom`], and run the `<selectedcontent>`
/// finalization pass. This is the façade most callers want.
pub fn parse_bytes_to_dom(bytes: &[u8], opts: DocumentOpts) -> Result<ParsedDocument, StrictModeError> {
    let (text, sniffed) = crate::encoding::decode(bytes, opts.transport_encoding.as_deref());
    let mut parse_opts = opts.parse.clone();
    parse_opts.tree_builder.iframe_srcdoc = opts.iframe_srcdoc;
    let dom = parse_document(RcDom::default(), parse_opts)
        .one(text);
    rcdom::populate_selectedcontent(&dom.document);
    finish_document(dom, sniffed.encoding, opts.strict, opts.collect_errors)
}

/// As [`parse_bytes_to_dom`], but for already-decoded text (no sniffing:
/// the caller has already settled the encoding question, e.g. by reading
/// a `&str` out of a UTF-8 source file).
pub fn parse_str_to_dom(input: &str, opts: DocumentOpts) -> Result<ParsedDocument, StrictModeError> {
    let mut parse_opts = opts.parse.clone();
    parse_opts.tree_builder.iframe_srcdoc = opts.iframe_srcdoc;
    let dom = parse_document(RcDom::default(), parse_opts).one(input);
    rcdom::populate_selectedcontent(&dom.document);
    finish_document(dom, encoding_rs::UTF_8, opts.strict, opts.collect_errors)
}

/// Parse `bytes` as an HTML fragment with the given context element name
/// (e.g. `"body"`, `"tr"`, `"template"`), in the HTML namespace.
pub fn parse_fragment_bytes_to_dom(
    bytes: &[u8],
    context_name: &str,
    opts: DocumentOpts,
) -> Result<ParsedDocument, StrictModeError> {
    let (text, sniffed) = crate::encoding::decode(bytes, opts.transport_encoding.as_deref());
    let mut parse_opts = opts.parse.clone();
    parse_opts.tree_builder.iframe_srcdoc = opts.iframe_srcdoc;
    let dom = parse_fragment(
        RcDom::default(),
        parse_opts,
        QualName::html(context_name),
        vec![],
        None,
    )
    .one(text);
    rcdom::populate_selectedcontent(&dom.document);
    finish_document(dom, sniffed.encoding, opts.strict, opts.collect_errors)
}

fn finish_document(
    dom: RcDom,
    encoding: &'static encoding_rs::Encoding,
    strict: bool,
    collect_errors: bool,
) -> Result<ParsedDocument, StrictModeError> {
    let raw_errors = dom.errors.take();
    if strict {
        if let Some(first) = raw_errors.first() {
            return Err(StrictModeError {
                first_error: to_parse_error(first.clone()),
                error_count: raw_errors.len(),
            });
        }
    }
    let errors = if collect_errors {
        raw_errors.into_iter().map(to_parse_error).collect()
    } else {
        Vec::new()
    };
    Ok(ParsedDocument {
        dom,
        errors,
        encoding,
    })
}

/// `RcDom::parse_error` only ever receives a freeform message (matching
/// upstream's `TreeSink` contract, which has no error-code parameter);
/// every message we produce this way is filed under [`ErrorCode::Other`].
fn to_parse_error(message: Cow<'static, str>) -> ParseError {
    ParseError::new(ErrorCode::Other, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcdom::NodeData;

    #[test]
    fn parses_minimal_document() {
        let parsed = parse_bytes_to_dom(
            b"<html><head></head><body><p>Hello</p></body></html>",
            DocumentOpts::default(),
        )
        .unwrap();
        assert_eq!(parsed.encoding, encoding_rs::WINDOWS_1252);
        let html = parsed
            .dom
            .document
            .children
            .borrow()
            .iter()
            .find(|c| matches!(&c.data, NodeData::Element { name, .. } if name.local == "html"))
            .cloned()
            .expect("html element");
        assert!(matches!(html.data, NodeData::Element { .. }));
    }

    #[test]
    fn strict_mode_surfaces_first_error() {
        let err = parse_bytes_to_dom(
            b"<html></p></html>",
            DocumentOpts {
                strict: true,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.error_count >= 1);
    }

    #[test]
    fn fragment_parses_into_bare_children() {
        let parsed =
            parse_fragment_bytes_to_dom(b"<tr><td>1</td></tr>", "table", DocumentOpts::default())
                .unwrap();
        assert!(!parsed.dom.document.children.borrow().is_empty());
    }
}
