// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML5 tree builder: the insertion-mode state machine that turns a
//! token stream into a tree via a [`TreeSink`].

pub use crate::interface::tree_builder::Tracer;
pub use crate::interface::{create_element, ElementFlags, TreeSink};
pub use crate::interface::{AppendNode, AppendText, Attribute, NodeOrText};
pub use crate::interface::{LocalName, Namespace, QualName, QuirksMode};

use self::tag_sets::*;
use self::types::*;

use crate::tendril::StrTendril;
use crate::{ExpandedName, Prefix};

use crate::tokenizer;
use crate::tokenizer::states as tok_state;
use crate::tokenizer::states::RawKind;
use crate::tokenizer::{Doctype, EndTag, StartTag, Tag, TokenSink, TokenSinkResult};

use std::borrow::Cow::{self, Borrowed};
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::fmt;

use log::{debug, log_enabled, warn, Level};

mod quirks;
pub(crate) mod tag_sets;
mod rules;
mod types;

/// Tree builder options, with an impl for `Default`.
#[derive(Copy, Clone)]
pub struct TreeBuilderOpts {
    /// Report all parse errors described in the spec, at some
    /// performance penalty? Default: false.
    pub exact_errors: bool,

    /// Is scripting enabled?
    ///
    /// This affects how `<noscript>` elements are parsed: if scripting
    /// *is* enabled their contents are a single text node; if not, their
    /// contents are parsed as ordinary HTML.
    pub scripting_enabled: bool,

    /// Is this document being parsed from the `srcdoc` attribute of an
    /// `<iframe>`? Affects doctype-derived quirks-mode heuristics.
    pub iframe_srcdoc: bool,

    /// Drop the `DOCTYPE` (if any) from the tree instead of appending it?
    pub drop_doctype: bool,

    /// Initial quirks mode. Default: `NoQuirks`.
    pub quirks_mode: QuirksMode,
}

impl Default for TreeBuilderOpts {
    fn default() -> TreeBuilderOpts {
        TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            iframe_srcdoc: false,
            drop_doctype: false,
            quirks_mode: QuirksMode::NoQuirks,
        }
    }
}

/// The HTML5 tree builder, implemented as a `TokenSink` over some
/// `Sink: TreeSink`.
///
/// Every mutating method takes `&self`, matching the tokenizer's own
/// interior-mutability style, so a `Tokenizer<TreeBuilder<Handle, Sink>>`
/// drives the whole pipeline without `&mut` threading through the
/// dispatch loop.
pub struct TreeBuilder<Handle, Sink> {
    opts: TreeBuilderOpts,

    /// Consumer of tree modifications.
    pub sink: Sink,

    mode: Cell<InsertionMode>,

    /// Saved mode, used by `Text` and `InTableText` on exit.
    orig_mode: Cell<Option<InsertionMode>>,

    /// Stack of template insertion modes.
    template_modes: RefCell<Vec<InsertionMode>>,

    /// Pending table character tokens, collected during `InTableText`.
    pending_table_text: RefCell<Vec<(SplitStatus, StrTendril)>>,

    quirks_mode: Cell<QuirksMode>,

    /// The document node, created by the sink.
    doc_handle: Handle,

    /// Stack of open elements, most recently opened at the end.
    open_elems: RefCell<Vec<Handle>>,

    /// List of active formatting elements, with marker sentinels.
    active_formatting: RefCell<Vec<FormatEntry<Handle>>>,

    head_elem: RefCell<Option<Handle>>,
    form_elem: RefCell<Option<Handle>>,

    frameset_ok: Cell<bool>,

    /// Ignore a following U+000A LINE FEED? Set after `<pre>`/`<listing>`/
    /// `<textarea>` start tags.
    ignore_lf: Cell<bool>,

    /// Foster parenting enabled (inside table modes, for misplaced content)?
    foster_parenting: Cell<bool>,

    /// The context element, for the fragment-parsing algorithm.
    context_elem: RefCell<Option<Handle>>,

    current_line: Cell<u64>,
}

impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    /// Create a tree builder sending tree modifications to `sink`.
    pub fn new(sink: Sink, opts: TreeBuilderOpts) -> TreeBuilder<Handle, Sink> {
        let doc_handle = sink.get_document();
        TreeBuilder {
            opts,
            sink,
            mode: Cell::new(InsertionMode::Initial),
            orig_mode: Cell::new(None),
            template_modes: Default::default(),
            pending_table_text: Default::default(),
            quirks_mode: Cell::new(opts.quirks_mode),
            doc_handle,
            open_elems: Default::default(),
            active_formatting: Default::default(),
            head_elem: Default::default(),
            form_elem: Default::default(),
            frameset_ok: Cell::new(true),
            ignore_lf: Default::default(),
            foster_parenting: Default::default(),
            context_elem: Default::default(),
            current_line: Cell::new(1),
        }
    }

    /// Create a tree builder for the HTML fragment-parsing algorithm.
    /// <https://html.spec.whatwg.org/multipage/#parsing-html-fragments>
    pub fn new_for_fragment(
        sink: Sink,
        context_elem: Handle,
        form_elem: Option<Handle>,
        opts: TreeBuilderOpts,
    ) -> TreeBuilder<Handle, Sink> {
        let doc_handle = sink.get_document();
        let context_name = sink.elem_name(&context_elem);
        let context_is_template =
            *context_name.ns == Namespace::Html && context_name.local.as_str() == "template";
        let template_modes = if context_is_template {
            RefCell::new(vec![InsertionMode::InTemplate])
        } else {
            RefCell::new(vec![])
        };

        let tb = TreeBuilder {
            opts,
            sink,
            mode: Cell::new(InsertionMode::Initial),
            orig_mode: Cell::new(None),
            template_modes,
            pending_table_text: Default::default(),
            quirks_mode: Cell::new(opts.quirks_mode),
            doc_handle,
            open_elems: Default::default(),
            active_formatting: Default::default(),
            head_elem: Default::default(),
            form_elem: RefCell::new(form_elem),
            frameset_ok: Cell::new(true),
            ignore_lf: Default::default(),
            foster_parenting: Default::default(),
            context_elem: RefCell::new(Some(context_elem)),
            current_line: Cell::new(1),
        };

        // Steps 5-7: seed the stack with a synthetic root.
        tb.create_root(vec![]);
        // Step 10: reset the insertion mode appropriately.
        let old_insertion_mode = tb.reset_insertion_mode();
        tb.mode.set(old_insertion_mode);

        tb
    }

    /// The tokenizer initial state implied by the fragment context element.
    /// <https://html.spec.whatwg.org/multipage/#concept-frag-parse-context> step 4.
    pub fn tokenizer_state_for_context_elem(
        &self,
        context_element_allows_scripting: bool,
    ) -> tok_state::State {
        let context_elem = self.context_elem.borrow();
        let Some(elem) = context_elem.as_ref() else {
            return tok_state::State::Data;
        };
        let elem_name = self.sink.elem_name(elem);
        if *elem_name.ns != Namespace::Html {
            return tok_state::State::Data;
        }
        match elem_name.local.as_str() {
            "title" | "textarea" => tok_state::State::RawData(RawKind::Rcdata),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                tok_state::State::RawData(RawKind::Rawtext)
            },
            "script" => tok_state::State::RawData(RawKind::ScriptData),
            "noscript" => {
                if context_element_allows_scripting {
                    tok_state::State::RawData(RawKind::Rawtext)
                } else {
                    tok_state::State::Data
                }
            },
            "plaintext" => tok_state::State::Plaintext,
            _ => tok_state::State::Data,
        }
    }

    /// Call `tracer.trace_handle` on every `Handle` held by the tree
    /// builder's internal state, for garbage-collected tree sinks.
    pub fn trace_handles(&self, tracer: &dyn Tracer<Handle = Handle>) {
        tracer.trace_handle(&self.doc_handle);
        for e in &*self.open_elems.borrow() {
            tracer.trace_handle(e);
        }
        for e in &*self.active_formatting.borrow() {
            if let FormatEntry::Element(handle, _) = e {
                tracer.trace_handle(handle);
            }
        }
        if let Some(h) = self.head_elem.borrow().as_ref() {
            tracer.trace_handle(h);
        }
        if let Some(h) = self.form_elem.borrow().as_ref() {
            tracer.trace_handle(h);
        }
        if let Some(h) = self.context_elem.borrow().as_ref() {
            tracer.trace_handle(h);
        }
    }

    /// Are we parsing an HTML fragment?
    pub fn is_fragment(&self) -> bool {
        self.context_elem.borrow().is_some()
    }

    fn debug_step(&self, mode: InsertionMode, token: &Token) {
        if log_enabled!(Level::Debug) {
            debug!("processing {:?} in insertion mode {:?}", token, mode);
        }
    }

    fn process_to_completion(&self, mut token: Token) -> TokenSinkResult<Handle> {
        // Queue of additional tokens yet to be processed; stays empty in
        // the common case where we never split whitespace out of a run
        // of characters.
        let mut more_tokens = VecDeque::new();

        loop {
            let should_ack_self_closing = matches!(
                token,
                Token::Tag(Tag {
                    self_closing: true,
                    kind: StartTag,
                    ..
                })
            );
            let result = if self.is_foreign(&token) {
                self.step_foreign(token)
            } else {
                let mode = self.mode.get();
                self.step(mode, token)
            };
            match result {
                ProcessResult::Done => {
                    if should_ack_self_closing {
                        self.sink
                            .parse_error(Borrowed("Unacknowledged self-closing tag"));
                    }
                    let Some(next) = more_tokens.pop_front() else {
                        return TokenSinkResult::Continue;
                    };
                    token = next;
                },
                ProcessResult::DoneAckSelfClosing => {
                    let Some(next) = more_tokens.pop_front() else {
                        return TokenSinkResult::Continue;
                    };
                    token = next;
                },
                ProcessResult::Reprocess(m, t) => {
                    self.mode.set(m);
                    token = t;
                },
                ProcessResult::SplitWhitespace(mut buf) => {
                    let run = buf.pop_front_char_run(|c| c.is_ascii_whitespace());
                    let Some((first, is_ws)) = run else {
                        return TokenSinkResult::Continue;
                    };
                    let status = if is_ws {
                        SplitStatus::Whitespace
                    } else {
                        SplitStatus::NotWhitespace
                    };
                    token = Token::Characters(status, first);
                    if buf.len32() > 0 {
                        more_tokens.push_back(Token::Characters(SplitStatus::NotSplit, buf));
                    }
                },
                ProcessResult::Script(node) => {
                    assert!(more_tokens.is_empty());
                    return TokenSinkResult::Script(node);
                },
                ProcessResult::ToPlaintext => {
                    assert!(more_tokens.is_empty());
                    return TokenSinkResult::Plaintext;
                },
                ProcessResult::ToRawData(k) => {
                    assert!(more_tokens.is_empty());
                    return TokenSinkResult::RawData(k);
                },
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/#appropriate-place-for-inserting-a-node>
    fn appropriate_place_for_insertion(
        &self,
        override_target: Option<Handle>,
    ) -> InsertionPoint<Handle> {
        let target = override_target.unwrap_or_else(|| self.current_node().clone());
        if !(self.foster_parenting.get() && self.elem_in(&target, foster_target)) {
            return if self.html_elem_named(&target, "template") {
                InsertionPoint::LastChild(self.sink.get_template_contents(&target))
            } else {
                InsertionPoint::LastChild(target)
            };
        }

        // Foster parenting: walk the stack from the top looking for the
        // nearest `<template>` (insert into its content) or `<table>`
        // (insert as a sibling, handled at append time based on whether
        // the table still has a parent).
        let open_elems = self.open_elems.borrow();
        let mut iter = open_elems.iter().rev().peekable();
        while let Some(elem) = iter.next() {
            if self.html_elem_named(elem, "template") {
                return InsertionPoint::LastChild(self.sink.get_template_contents(elem));
            } else if self.html_elem_named(elem, "table") {
                return InsertionPoint::TableFosterParenting {
                    element: elem.clone(),
                    prev_element: (*iter.peek().unwrap()).clone(),
                };
            }
        }
        InsertionPoint::LastChild(self.html_elem().clone())
    }

    fn insert_at(&self, insertion_point: InsertionPoint<Handle>, child: NodeOrText<Handle>) {
        match insertion_point {
            InsertionPoint::LastChild(parent) => self.sink.append(&parent, child),
            InsertionPoint::BeforeSibling(sibling) => {
                self.sink.append_before_sibling(&sibling, child)
            },
            InsertionPoint::TableFosterParenting {
                element,
                prev_element,
            } => self
                .sink
                .append_based_on_parent_node(&element, &prev_element, child),
        }
    }
}

impl<Handle, Sink> TokenSink for TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    type Handle = Handle;

    fn process_token(&self, token: tokenizer::Token, line_number: u64) -> TokenSinkResult<Handle> {
        if line_number != self.current_line.get() {
            self.current_line.set(line_number);
            self.sink.set_current_line(line_number);
        }
        let ignore_lf = self.ignore_lf.take();

        let token = match token {
            tokenizer::Token::ParseError(e) => {
                self.sink.parse_error(e);
                return TokenSinkResult::Continue;
            },

            tokenizer::Token::DoctypeToken(dt) => {
                if self.mode.get() == InsertionMode::Initial {
                    let (err, quirk) =
                        quirks::doctype_error_and_quirks(&dt, self.opts.iframe_srcdoc);
                    if err {
                        self.sink.parse_error(if self.opts.exact_errors {
                            Cow::from(format!("Bad DOCTYPE: {dt:?}"))
                        } else {
                            Cow::from("Bad DOCTYPE")
                        });
                    }
                    let Doctype {
                        name,
                        public_id,
                        system_id,
                        force_quirks: _,
                    } = dt;
                    if !self.opts.drop_doctype {
                        self.sink.append_doctype_to_document(
                            name.unwrap_or_default(),
                            public_id.unwrap_or_default(),
                            system_id.unwrap_or_default(),
                        );
                    }
                    self.set_quirks_mode(quirk);
                    self.mode.set(InsertionMode::BeforeHtml);
                    return TokenSinkResult::Continue;
                } else {
                    self.sink.parse_error(Borrowed("DOCTYPE in body"));
                    return TokenSinkResult::Continue;
                }
            },

            tokenizer::Token::TagToken(x) => Token::Tag(x),
            tokenizer::Token::CommentToken(x) => Token::Comment(x),
            tokenizer::Token::NullCharacterToken => Token::NullCharacter,
            tokenizer::Token::EOFToken => Token::Eof,

            tokenizer::Token::CharacterTokens(mut x) => {
                if ignore_lf && x.starts_with("\n") {
                    x.pop_front(1);
                }
                if x.is_empty() {
                    return TokenSinkResult::Continue;
                }
                Token::Characters(SplitStatus::NotSplit, x)
            },
        };

        self.process_to_completion(token)
    }

    fn end(&self) {
        for elem in self.open_elems.borrow_mut().drain(..).rev() {
            self.sink.pop(&elem);
        }
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        !self.open_elems.borrow().is_empty()
            && *self.sink.elem_name(&self.adjusted_current_node()).ns != Namespace::Html
    }
}

struct ActiveFormattingIter<'a, Handle> {
    list: Ref<'a, Vec<FormatEntry<Handle>>>,
    index: usize,
}

impl<'a, Handle: Clone> Iterator for ActiveFormattingIter<'a, Handle> {
    type Item = (usize, Handle, Tag);
    fn next(&mut self) -> Option<(usize, Handle, Tag)> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        match &self.list[self.index] {
            FormatEntry::Marker => None,
            FormatEntry::Element(h, t) => Some((self.index, h.clone(), t.clone())),
        }
    }
}

enum PushFlag {
    Push,
    NoPush,
}

enum Bookmark<Handle> {
    Replace(Handle),
    InsertAfter(Handle),
}

#[doc(hidden)]
impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    fn unexpected<T: fmt::Debug>(&self, thing: &T) -> ProcessResult<Handle> {
        self.sink.parse_error(if self.opts.exact_errors {
            Cow::from(format!(
                "Unexpected token {:?} in insertion mode {:?}",
                thing,
                self.mode.get()
            ))
        } else {
            Cow::from("Unexpected token")
        });
        ProcessResult::Done
    }

    /// Iterate active formatting entries from the end back to the nearest
    /// marker (or the start of the list, if there is none). Yields owned
    /// clones since the `Ref` guard can't outlive this call otherwise.
    fn active_formatting_end_to_marker(&self) -> ActiveFormattingIter<'_, Handle> {
        let list = self.active_formatting.borrow();
        let index = list.len();
        ActiveFormattingIter { list, index }
    }

    fn position_in_active_formatting(&self, element: &Handle) -> Option<usize> {
        self.active_formatting
            .borrow()
            .iter()
            .position(|n| match n {
                FormatEntry::Marker => false,
                FormatEntry::Element(handle, _) => self.sink.same_node(handle, element),
            })
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
        self.sink.set_quirks_mode(mode);
    }

    fn stop_parsing(&self) -> ProcessResult<Handle> {
        ProcessResult::Done
    }

    //§ parsing-elements-that-contain-only-text
    fn to_raw_text_mode(&self, k: RawKind) -> ProcessResult<Handle> {
        self.orig_mode.set(Some(self.mode.get()));
        self.mode.set(InsertionMode::Text);
        ProcessResult::ToRawData(k)
    }

    fn parse_raw_data(&self, tag: Tag, k: RawKind) -> ProcessResult<Handle> {
        self.insert_element_for(tag);
        self.to_raw_text_mode(k)
    }
    //§ END

    fn current_node(&self) -> Ref<'_, Handle> {
        Ref::map(self.open_elems.borrow(), |elems| {
            elems.last().expect("no current element")
        })
    }

    fn adjusted_current_node(&self) -> Ref<'_, Handle> {
        if self.open_elems.borrow().len() == 1 {
            let context_elem = self.context_elem.borrow();
            if let Ok(ctx) = Ref::filter_map(context_elem, |e| e.as_ref()) {
                return ctx;
            }
        }
        self.current_node()
    }

    fn current_node_in<TagSet>(&self, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        set(self.sink.elem_name(&self.current_node()))
    }

    /// Get the second element on the stack, if it's a HTML `<body>` element.
    fn body_elem(&self) -> Option<Handle> {
        let open_elems = self.open_elems.borrow();
        if open_elems.len() <= 1 {
            return None;
        }
        let node = &open_elems[1];
        if self.html_elem_named(node, "body") {
            Some(node.clone())
        } else {
            None
        }
    }

    fn assert_named(&self, node: &Handle, name: &str) {
        assert!(self.html_elem_named(node, name));
    }

    fn insert_appropriately(&self, child: NodeOrText<Handle>, override_target: Option<Handle>) {
        let insertion_point = self.appropriate_place_for_insertion(override_target);
        self.insert_at(insertion_point, child);
    }

    /// <https://html.spec.whatwg.org/multipage/#adoption-agency-algorithm>
    fn adoption_agency(&self, subject: &str) {
        // Step 1.
        if self.current_node_named(subject)
            && self
                .position_in_active_formatting(&self.current_node())
                .is_none()
        {
            self.pop();
            return;
        }

        // Steps 2-4: up to 8 outer iterations.
        for _ in 0..8 {
            // Step 5: find the formatting element.
            let maybe_fmt_entry = {
                let active_formatting = self.active_formatting.borrow();
                active_formatting
                    .iter()
                    .enumerate()
                    .rev()
                    .take_while(|(_, e)| !matches!(e, FormatEntry::Marker))
                    .find_map(|(i, e)| match e {
                        FormatEntry::Element(h, t) if t.name == subject => {
                            Some((i, h.clone(), t.clone()))
                        },
                        _ => None,
                    })
            };

            let Some((fmt_elem_index, fmt_elem, fmt_elem_tag)) = maybe_fmt_entry else {
                return self.process_end_tag_in_body(Tag {
                    kind: EndTag,
                    name: LocalName::new(subject),
                    self_closing: false,
                    attrs: vec![],
                });
            };

            let Some(fmt_elem_stack_index) = self
                .open_elems
                .borrow()
                .iter()
                .rposition(|n| self.sink.same_node(n, &fmt_elem))
            else {
                self.sink
                    .parse_error(Borrowed("Formatting element not open"));
                self.active_formatting.borrow_mut().remove(fmt_elem_index);
                return;
            };

            // Step 7.
            if !self.in_scope(default_scope, |n| self.sink.same_node(&n, &fmt_elem)) {
                self.sink
                    .parse_error(Borrowed("Formatting element not in scope"));
                return;
            }

            // Step 8.
            if !self.sink.same_node(&self.current_node(), &fmt_elem) {
                self.sink
                    .parse_error(Borrowed("Formatting element not current node"));
            }

            // Step 9: the furthest block.
            let maybe_furthest_block = self
                .open_elems
                .borrow()
                .iter()
                .enumerate()
                .skip(fmt_elem_stack_index)
                .find(|(_, open_element)| self.elem_in(open_element, special_tag))
                .map(|(i, h)| (i, h.clone()));

            let Some((furthest_block_index, furthest_block)) = maybe_furthest_block else {
                // Step 10.
                self.open_elems.borrow_mut().truncate(fmt_elem_stack_index);
                self.active_formatting.borrow_mut().remove(fmt_elem_index);
                return;
            };

            // Step 11.
            let common_ancestor = self.open_elems.borrow()[fmt_elem_stack_index - 1].clone();

            // Step 12.
            let mut bookmark = Bookmark::Replace(fmt_elem.clone());

            // Step 13.
            let mut node;
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block.clone();
            let mut inner_counter = 0;
            loop {
                inner_counter += 1;
                node_index -= 1;
                node = self.open_elems.borrow()[node_index].clone();

                if self.sink.same_node(&node, &fmt_elem) {
                    break;
                }

                if inner_counter > 3 {
                    if let Some(position) = self.position_in_active_formatting(&node) {
                        self.active_formatting.borrow_mut().remove(position);
                    }
                    self.open_elems.borrow_mut().remove(node_index);
                    continue;
                }

                let Some(node_formatting_index) = self.position_in_active_formatting(&node)
                else {
                    self.open_elems.borrow_mut().remove(node_index);
                    continue;
                };

                let tag = match &self.active_formatting.borrow()[node_formatting_index] {
                    FormatEntry::Element(h, t) => {
                        assert!(self.sink.same_node(h, &node));
                        t.clone()
                    },
                    FormatEntry::Marker => panic!("found marker during adoption agency"),
                };
                let new_element = create_element(
                    &self.sink,
                    QualName::html(tag.name.clone()),
                    tag.attrs.clone(),
                );
                self.open_elems.borrow_mut()[node_index] = new_element.clone();
                self.active_formatting.borrow_mut()[node_formatting_index] =
                    FormatEntry::Element(new_element.clone(), tag);
                node = new_element;

                if self.sink.same_node(&last_node, &furthest_block) {
                    bookmark = Bookmark::InsertAfter(node.clone());
                }

                self.sink.remove_from_parent(&last_node);
                self.sink.append(&node, AppendNode(last_node.clone()));
                last_node = node.clone();
            }

            // Step 14.
            self.sink.remove_from_parent(&last_node);
            self.insert_appropriately(AppendNode(last_node.clone()), Some(common_ancestor));

            // Step 15-16.
            let new_element = create_element(
                &self.sink,
                QualName::html(fmt_elem_tag.name.clone()),
                fmt_elem_tag.attrs.clone(),
            );
            let new_entry = FormatEntry::Element(new_element.clone(), fmt_elem_tag);
            self.sink.reparent_children(&furthest_block, &new_element);

            // Step 17.
            self.sink
                .append(&furthest_block, AppendNode(new_element.clone()));

            // Step 18.
            match bookmark {
                Bookmark::Replace(to_replace) => {
                    let index = self
                        .position_in_active_formatting(&to_replace)
                        .expect("bookmark not found in active formatting elements");
                    self.active_formatting.borrow_mut()[index] = new_entry;
                },
                Bookmark::InsertAfter(previous) => {
                    let index = self
                        .position_in_active_formatting(&previous)
                        .expect("bookmark not found in active formatting elements")
                        + 1;
                    self.active_formatting.borrow_mut().insert(index, new_entry);
                    let old_index = self
                        .position_in_active_formatting(&fmt_elem)
                        .expect("formatting element not found in active formatting elements");
                    self.active_formatting.borrow_mut().remove(old_index);
                },
            }

            // Step 19.
            self.remove_from_stack(&fmt_elem);
            let new_furthest_block_index = self
                .open_elems
                .borrow()
                .iter()
                .position(|n| self.sink.same_node(n, &furthest_block))
                .expect("furthest block missing from open element stack");
            self.open_elems
                .borrow_mut()
                .insert(new_furthest_block_index + 1, new_element);
            // Step 20: loop.
        }
    }

    fn push(&self, elem: &Handle) {
        self.open_elems.borrow_mut().push(elem.clone());
    }

    fn pop(&self) -> Handle {
        let elem = self
            .open_elems
            .borrow_mut()
            .pop()
            .expect("no current element");
        self.sink.pop(&elem);
        elem
    }

    fn remove_from_stack(&self, elem: &Handle) {
        let position = self
            .open_elems
            .borrow()
            .iter()
            .rposition(|x| self.sink.same_node(elem, x));
        if let Some(position) = position {
            self.open_elems.borrow_mut().remove(position);
            self.sink.pop(elem);
        }
    }

    fn is_marker_or_open(&self, entry: &FormatEntry<Handle>) -> bool {
        match entry {
            FormatEntry::Marker => true,
            FormatEntry::Element(node, _) => self
                .open_elems
                .borrow()
                .iter()
                .rev()
                .any(|n| self.sink.same_node(n, node)),
        }
    }

    /// <https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements>
    fn reconstruct_active_formatting_elements(&self) {
        {
            let active_formatting = self.active_formatting.borrow();
            let Some(last) = active_formatting.last() else {
                return;
            };
            if self.is_marker_or_open(last) {
                return;
            }
        }

        let mut entry_index = self.active_formatting.borrow().len() - 1;
        loop {
            if entry_index == 0 {
                break;
            }
            entry_index -= 1;
            if self.is_marker_or_open(&self.active_formatting.borrow()[entry_index]) {
                entry_index += 1;
                break;
            }
        }

        loop {
            let tag = match &self.active_formatting.borrow()[entry_index] {
                FormatEntry::Element(_, t) => t.clone(),
                FormatEntry::Marker => panic!("found marker during formatting reconstruction"),
            };

            let new_element =
                self.insert_element(PushFlag::Push, Namespace::Html, tag.name.clone(), tag.attrs.clone());

            self.active_formatting.borrow_mut()[entry_index] =
                FormatEntry::Element(new_element, tag);

            if entry_index == self.active_formatting.borrow().len() - 1 {
                break;
            }
            entry_index += 1;
        }
    }

    fn html_elem(&self) -> Ref<'_, Handle> {
        Ref::map(self.open_elems.borrow(), |elems| &elems[0])
    }

    /// Signal an error depending on the state of the stack of open
    /// elements at the end of `</body>`/EOF.
    fn check_body_end(&self) {
        for elem in self.open_elems.borrow().iter() {
            let name = self.sink.elem_name(elem);
            if thorough_implied_end(name) {
                continue;
            }
            self.sink.parse_error(if self.opts.exact_errors {
                Cow::from(format!("Unexpected open tag {name:?} at end of body"))
            } else {
                Cow::from("Unexpected open tag at end of body")
            });
            return;
        }
    }

    fn in_scope<TagSet, Pred>(&self, scope: TagSet, pred: Pred) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
        Pred: Fn(Handle) -> bool,
    {
        for node in self.open_elems.borrow().iter().rev() {
            if pred(node.clone()) {
                return true;
            }
            if scope(self.sink.elem_name(node)) {
                return false;
            }
        }
        // Impossible: <html> is always in scope.
        false
    }

    fn elem_in<TagSet>(&self, elem: &Handle, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        set(self.sink.elem_name(elem))
    }

    fn html_elem_named(&self, elem: &Handle, name: &str) -> bool {
        let elem_name = self.sink.elem_name(elem);
        *elem_name.ns == Namespace::Html && elem_name.local.as_str() == name
    }

    fn in_html_elem_named(&self, name: &str) -> bool {
        self.open_elems
            .borrow()
            .iter()
            .any(|elem| self.html_elem_named(elem, name))
    }

    fn current_node_named(&self, name: &str) -> bool {
        self.html_elem_named(&self.current_node(), name)
    }

    fn in_scope_named<TagSet>(&self, scope: TagSet, name: &str) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.in_scope(scope, |elem| self.html_elem_named(&elem, name))
    }

    /// <https://html.spec.whatwg.org/#generate-implied-end-tags>
    fn generate_implied_end_tags<TagSet>(&self, set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        loop {
            {
                let open_elems = self.open_elems.borrow();
                let Some(elem) = open_elems.last() else {
                    return;
                };
                if !set(self.sink.elem_name(elem)) {
                    return;
                }
            }
            self.pop();
        }
    }

    fn generate_implied_end_except(&self, except: &str) {
        self.generate_implied_end_tags(|p| {
            if *p.ns == Namespace::Html && p.local.as_str() == except {
                false
            } else {
                cursory_implied_end(p)
            }
        });
    }

    fn pop_until_current<TagSet>(&self, tag_set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        while !self.current_node_in(&tag_set) {
            self.open_elems.borrow_mut().pop();
        }
    }

    /// Pop elements until one matching `pred` has been popped. Returns the
    /// number of elements popped.
    fn pop_until<P>(&self, pred: P) -> usize
    where
        P: Fn(ExpandedName) -> bool,
    {
        let mut n = 0;
        loop {
            n += 1;
            match self.open_elems.borrow_mut().pop() {
                None => break,
                Some(elem) => {
                    if pred(self.sink.elem_name(&elem)) {
                        break;
                    }
                },
            }
        }
        n
    }

    fn pop_until_named(&self, name: &str) -> usize {
        self.pop_until(|p| *p.ns == Namespace::Html && p.local.as_str() == name)
    }

    /// Pop elements until one with the given name has been popped;
    /// signal an error if it wasn't the first one.
    fn expect_to_close(&self, name: &str) {
        if self.pop_until_named(name) != 1 {
            self.sink
                .parse_error(Borrowed("Unexpected open element"));
        }
    }

    fn close_p_element(&self) {
        self.generate_implied_end_tags(|p| cursory_implied_end(p) && p.local.as_str() != "p");
        self.expect_to_close("p");
    }

    fn close_p_element_in_button_scope(&self) {
        if self.in_scope_named(button_scope, "p") {
            self.close_p_element();
        }
    }

    fn is_type_hidden(&self, tag: &Tag) -> bool {
        match tag.get_attribute(&LocalName::new("type")) {
            None => false,
            Some(at) => at.eq_ignore_ascii_case("hidden"),
        }
    }

    fn foster_parent_in_body(&self, token: Token) -> ProcessResult<Handle> {
        warn!("foster parenting not implemented fully");
        self.foster_parenting.set(true);
        let res = self.step(InsertionMode::InBody, token);
        self.foster_parenting.set(false);
        res
    }

    fn process_chars_in_table(&self, token: Token) -> ProcessResult<Handle> {
        if self.current_node_in(table_outer) {
            assert!(self.pending_table_text.borrow().is_empty());
            self.orig_mode.set(Some(self.mode.get()));
            ProcessResult::Reprocess(InsertionMode::InTableText, token)
        } else {
            self.sink
                .parse_error(Borrowed("Unexpected characters in table"));
            self.foster_parent_in_body(token)
        }
    }

    /// <https://html.spec.whatwg.org/multipage/#reset-the-insertion-mode-appropriately>
    fn reset_insertion_mode(&self) -> InsertionMode {
        let open_elems = self.open_elems.borrow();
        for (i, mut node) in open_elems.iter().enumerate().rev() {
            let last = i == 0usize;
            let context_elem = self.context_elem.borrow();
            if let (true, Some(ctx)) = (last, context_elem.as_ref()) {
                node = ctx;
            }
            let elem_name = self.sink.elem_name(node);
            if *elem_name.ns != Namespace::Html {
                continue;
            }
            match elem_name.local.as_str() {
                "select" => {
                    for ancestor in open_elems[0..i].iter().rev() {
                        if self.html_elem_named(ancestor, "template") {
                            return InsertionMode::InSelect;
                        } else if self.html_elem_named(ancestor, "table") {
                            return InsertionMode::InSelectInTable;
                        }
                    }
                    return InsertionMode::InSelect;
                },
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                "template" => return *self.template_modes.borrow().last().unwrap(),
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => {
                    return if self.head_elem.borrow().is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    }
                },
                _ => (),
            }
        }
        InsertionMode::InBody
    }

    fn close_the_cell(&self) {
        self.generate_implied_end_tags(cursory_implied_end);
        if self.pop_until(td_th) != 1 {
            self.sink
                .parse_error(Borrowed("expected to close <td> or <th> with cell"));
        }
        self.clear_active_formatting_to_marker();
    }

    fn append_text(&self, text: StrTendril) -> ProcessResult<Handle> {
        self.insert_appropriately(AppendText(text), None);
        ProcessResult::Done
    }

    fn append_comment(&self, text: StrTendril) -> ProcessResult<Handle> {
        let comment = self.sink.create_comment(text);
        self.insert_appropriately(AppendNode(comment), None);
        ProcessResult::Done
    }

    fn append_comment_to_doc(&self, text: StrTendril) -> ProcessResult<Handle> {
        let comment = self.sink.create_comment(text);
        self.sink.append(&self.doc_handle, AppendNode(comment));
        ProcessResult::Done
    }

    fn append_comment_to_html(&self, text: StrTendril) -> ProcessResult<Handle> {
        let open_elems = self.open_elems.borrow();
        let target = &open_elems[0];
        let comment = self.sink.create_comment(text);
        self.sink.append(target, AppendNode(comment));
        ProcessResult::Done
    }

    //§ creating-and-inserting-nodes
    fn create_root(&self, attrs: Vec<Attribute>) {
        let elem = create_element(&self.sink, QualName::html("html"), attrs);
        self.push(&elem);
        self.sink.append(&self.doc_handle, AppendNode(elem));
    }

    /// <https://html.spec.whatwg.org/multipage/#insert-a-foreign-element>
    /// (the "insert an HTML element" case always passes `ns = Html`)
    fn insert_element(
        &self,
        push: PushFlag,
        ns: Namespace,
        name: LocalName,
        attrs: Vec<Attribute>,
    ) -> Handle {
        let qname = QualName::new(None, ns, name);
        let elem = create_element(&self.sink, qname.clone(), attrs.clone());

        let insertion_point = self.appropriate_place_for_insertion(None);
        let (node1, node2) = match &insertion_point {
            InsertionPoint::LastChild(p) | InsertionPoint::BeforeSibling(p) => (p.clone(), None),
            InsertionPoint::TableFosterParenting {
                element,
                prev_element,
            } => (element.clone(), Some(prev_element.clone())),
        };

        if is_form_associatable(qname.expanded())
            && self.form_elem.borrow().is_some()
            && !self.in_html_elem_named("template")
            && !(is_listed(qname.expanded())
                && attrs.iter().any(|a| a.name.local.as_str() == "form"))
        {
            let form = self.form_elem.borrow().as_ref().unwrap().clone();
            self.sink
                .associate_with_form(&elem, &form, (&node1, node2.as_ref()));
        }

        self.insert_at(insertion_point, AppendNode(elem.clone()));

        if let PushFlag::Push = push {
            self.push(&elem);
        }
        elem
    }

    fn insert_element_for(&self, tag: Tag) -> Handle {
        self.insert_element(PushFlag::Push, Namespace::Html, tag.name, tag.attrs)
    }

    fn insert_and_pop_element_for(&self, tag: Tag) -> Handle {
        self.insert_element(PushFlag::NoPush, Namespace::Html, tag.name, tag.attrs)
    }

    fn insert_phantom(&self, name: &str) -> Handle {
        self.insert_element(PushFlag::Push, Namespace::Html, LocalName::new(name), vec![])
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#insert-an-element-at-the-adjusted-insertion-location>
    fn insert_foreign_element(
        &self,
        tag: Tag,
        ns: Namespace,
        only_add_to_element_stack: bool,
    ) -> Handle {
        let adjusted_insertion_location = self.appropriate_place_for_insertion(None);
        let qname = QualName::new(None, ns, tag.name);
        let elem = create_element(&self.sink, qname, tag.attrs);

        if !only_add_to_element_stack {
            self.insert_at(adjusted_insertion_location, AppendNode(elem.clone()));
        }
        self.push(&elem);
        elem
    }
    //§ END

    /// A `<template>` start tag whose `shadowrootmode` attribute requests
    /// declarative shadow root attachment, and whose context allows it.
    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead>
    fn should_attach_declarative_shadow(&self, tag: &Tag) -> bool {
        let adjusted_insertion_location = self.appropriate_place_for_insertion(None);
        let intended_parent = match adjusted_insertion_location {
            InsertionPoint::LastChild(p) | InsertionPoint::BeforeSibling(p) => p,
            InsertionPoint::TableFosterParenting { element, .. } => element,
        };

        let is_shadow_root_mode = tag.attrs.iter().any(|attr| {
            attr.name.local.as_str() == "shadowrootmode"
                && (attr.value.as_ref() == "open" || attr.value.as_ref() == "closed")
        });

        let allow_declarative_shadow_roots =
            self.sink.allow_declarative_shadow_roots(&intended_parent);

        let adjusted_current_node_not_topmost = self.open_elems.borrow().len() > 1;

        is_shadow_root_mode && allow_declarative_shadow_roots && adjusted_current_node_not_topmost
    }

    fn attach_declarative_shadow(&self, tag: &Tag, shadow_host: &Handle, template: &Handle) -> bool {
        self.sink
            .attach_declarative_shadow(shadow_host, template, &tag.attrs)
    }

    fn create_formatting_element_for(&self, tag: Tag) -> Handle {
        let mut first_match = None;
        let mut matches = 0usize;
        for (i, _, old_tag) in self.active_formatting_end_to_marker() {
            if tag.equiv_modulo_attr_order(&old_tag) {
                first_match = Some(i);
                matches += 1;
            }
        }
        if matches >= 3 {
            self.active_formatting
                .borrow_mut()
                .remove(first_match.expect("matches with no index"));
        }

        let elem = self.insert_element(
            PushFlag::Push,
            Namespace::Html,
            tag.name.clone(),
            tag.attrs.clone(),
        );
        self.active_formatting
            .borrow_mut()
            .push(FormatEntry::Element(elem.clone(), tag));
        elem
    }

    fn clear_active_formatting_to_marker(&self) {
        loop {
            match self.active_formatting.borrow_mut().pop() {
                None | Some(FormatEntry::Marker) => break,
                _ => (),
            }
        }
    }

    fn process_end_tag_in_body(&self, tag: Tag) {
        let mut match_idx = None;
        for (i, elem) in self.open_elems.borrow().iter().enumerate().rev() {
            if self.html_elem_named(elem, tag.name.as_str()) {
                match_idx = Some(i);
                break;
            }
            if self.elem_in(elem, special_tag) {
                self.sink
                    .parse_error(Borrowed("Found special tag while closing generic tag"));
                return;
            }
        }

        let Some(match_idx) = match_idx else {
            self.unexpected(&tag);
            return;
        };

        self.generate_implied_end_except(tag.name.as_str());

        if match_idx != self.open_elems.borrow().len() - 1 {
            self.unexpected(&tag);
        }
        self.open_elems.borrow_mut().truncate(match_idx);
    }

    fn handle_misnested_a_tags(&self, tag: &Tag) {
        let Some(node) = self
            .active_formatting_end_to_marker()
            .find(|(_, n, _)| self.html_elem_named(n, "a"))
            .map(|(_, n, _)| n)
        else {
            return;
        };

        self.unexpected(tag);
        self.adoption_agency("a");
        if let Some(index) = self.position_in_active_formatting(&node) {
            self.active_formatting.borrow_mut().remove(index);
        }
        self.remove_from_stack(&node);
    }

    //§ tree-construction
    /// <https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher>
    fn is_foreign(&self, token: &Token) -> bool {
        if let Token::Eof = *token {
            return false;
        }
        if self.open_elems.borrow().is_empty() {
            return false;
        }

        let current = self.adjusted_current_node();
        let name = self.sink.elem_name(&current);
        if *name.ns == Namespace::Html {
            return false;
        }

        if mathml_text_integration_point(name) {
            match token {
                Token::Characters(..) | Token::NullCharacter => return false,
                Token::Tag(Tag {
                    kind: StartTag,
                    name,
                    ..
                }) if !matches!(name.as_str(), "mglyph" | "malignmark") => return false,
                _ => (),
            }
        }

        if svg_html_integration_point(name) {
            match token {
                Token::Characters(..) | Token::NullCharacter => return false,
                Token::Tag(Tag { kind: StartTag, .. }) => return false,
                _ => (),
            }
        }

        if *name.ns == Namespace::MathMl && name.local.as_str() == "annotation-xml" {
            match token {
                Token::Tag(Tag {
                    kind: StartTag,
                    name,
                    ..
                }) if name.as_str() == "svg" => return false,
                Token::Characters(..) | Token::NullCharacter => {
                    return !self
                        .sink
                        .is_mathml_annotation_xml_integration_point(&self.adjusted_current_node());
                },
                Token::Tag(Tag { kind: StartTag, .. }) => {
                    return !self
                        .sink
                        .is_mathml_annotation_xml_integration_point(&self.adjusted_current_node());
                },
                _ => {},
            }
        }

        true
    }
    //§ END

    fn enter_foreign(&self, mut tag: Tag, ns: Namespace) -> ProcessResult<Handle> {
        match ns {
            Namespace::MathMl => self.adjust_mathml_attributes(&mut tag),
            Namespace::Svg => self.adjust_svg_attributes(&mut tag),
            _ => (),
        }
        self.adjust_foreign_attributes(&mut tag);

        if tag.self_closing {
            self.insert_element(PushFlag::NoPush, ns, tag.name, tag.attrs);
            ProcessResult::DoneAckSelfClosing
        } else {
            self.insert_element(PushFlag::Push, ns, tag.name, tag.attrs);
            ProcessResult::Done
        }
    }

    fn adjust_svg_tag_name(&self, tag: &mut Tag) {
        let replacement = match tag.name.as_str() {
            "altglyph" => Some("altGlyph"),
            "altglyphdef" => Some("altGlyphDef"),
            "altglyphitem" => Some("altGlyphItem"),
            "animatecolor" => Some("animateColor"),
            "animatemotion" => Some("animateMotion"),
            "animatetransform" => Some("animateTransform"),
            "clippath" => Some("clipPath"),
            "feblend" => Some("feBlend"),
            "fecolormatrix" => Some("feColorMatrix"),
            "fecomponenttransfer" => Some("feComponentTransfer"),
            "fecomposite" => Some("feComposite"),
            "feconvolvematrix" => Some("feConvolveMatrix"),
            "fediffuselighting" => Some("feDiffuseLighting"),
            "fedisplacementmap" => Some("feDisplacementMap"),
            "fedistantlight" => Some("feDistantLight"),
            "fedropshadow" => Some("feDropShadow"),
            "feflood" => Some("feFlood"),
            "fefunca" => Some("feFuncA"),
            "fefuncb" => Some("feFuncB"),
            "fefuncg" => Some("feFuncG"),
            "fefuncr" => Some("feFuncR"),
            "fegaussianblur" => Some("feGaussianBlur"),
            "feimage" => Some("feImage"),
            "femerge" => Some("feMerge"),
            "femergenode" => Some("feMergeNode"),
            "femorphology" => Some("feMorphology"),
            "feoffset" => Some("feOffset"),
            "fepointlight" => Some("fePointLight"),
            "fespecularlighting" => Some("feSpecularLighting"),
            "fespotlight" => Some("feSpotLight"),
            "fetile" => Some("feTile"),
            "feturbulence" => Some("feTurbulence"),
            "foreignobject" => Some("foreignObject"),
            "glyphref" => Some("glyphRef"),
            "lineargradient" => Some("linearGradient"),
            "radialgradient" => Some("radialGradient"),
            "textpath" => Some("textPath"),
            _ => None,
        };
        if let Some(r) = replacement {
            tag.name = LocalName::new(r);
        }
    }

    fn adjust_attributes<F>(&self, tag: &mut Tag, mut map: F)
    where
        F: FnMut(&str) -> Option<QualName>,
    {
        for attr in &mut tag.attrs {
            if let Some(replacement) = map(attr.name.local.as_str()) {
                attr.name = replacement;
            }
        }
    }

    fn adjust_svg_attributes(&self, tag: &mut Tag) {
        self.adjust_attributes(tag, |k| {
            SVG_ATTR_ADJUSTMENTS
                .iter()
                .find(|(from, _)| *from == k)
                .map(|(_, to)| QualName::new(None, Namespace::None, LocalName::new(to)))
        });
    }

    fn adjust_mathml_attributes(&self, tag: &mut Tag) {
        self.adjust_attributes(tag, |k| match k {
            "definitionurl" => Some(QualName::new(
                None,
                Namespace::None,
                LocalName::new("definitionURL"),
            )),
            _ => None,
        });
    }

    fn adjust_foreign_attributes(&self, tag: &mut Tag) {
        self.adjust_attributes(tag, |k| {
            let (prefix, ns, local) = match k {
                "xlink:actuate" => ("xlink", Namespace::XLink, "actuate"),
                "xlink:arcrole" => ("xlink", Namespace::XLink, "arcrole"),
                "xlink:href" => ("xlink", Namespace::XLink, "href"),
                "xlink:role" => ("xlink", Namespace::XLink, "role"),
                "xlink:show" => ("xlink", Namespace::XLink, "show"),
                "xlink:title" => ("xlink", Namespace::XLink, "title"),
                "xlink:type" => ("xlink", Namespace::XLink, "type"),
                "xml:lang" => ("xml", Namespace::Xml, "lang"),
                "xml:space" => ("xml", Namespace::Xml, "space"),
                "xmlns" => ("", Namespace::XmlNs, "xmlns"),
                "xmlns:xlink" => ("xmlns", Namespace::XmlNs, "xlink"),
                _ => return None,
            };
            let prefix = if prefix.is_empty() {
                None
            } else {
                Some(Prefix::new(prefix))
            };
            Some(QualName::new(prefix, ns, LocalName::new(local)))
        });
    }

    fn foreign_start_tag(&self, mut tag: Tag) -> ProcessResult<Handle> {
        let current_ns = self.sink.elem_name(&self.adjusted_current_node()).ns.clone();
        match current_ns {
            Namespace::MathMl => self.adjust_mathml_attributes(&mut tag),
            Namespace::Svg => {
                self.adjust_svg_tag_name(&mut tag);
                self.adjust_svg_attributes(&mut tag);
            },
            _ => (),
        }
        self.adjust_foreign_attributes(&mut tag);
        if tag.self_closing {
            self.insert_element(PushFlag::NoPush, current_ns, tag.name, tag.attrs);
            ProcessResult::DoneAckSelfClosing
        } else {
            self.insert_element(PushFlag::Push, current_ns, tag.name, tag.attrs);
            ProcessResult::Done
        }
    }

    fn unexpected_start_tag_in_foreign_content(&self, tag: Tag) -> ProcessResult<Handle> {
        self.unexpected(&tag);
        while !self.current_node_in(|n| {
            *n.ns == Namespace::Html
                || mathml_text_integration_point(n)
                || svg_html_integration_point(n)
        }) {
            self.pop();
        }
        self.step(self.mode.get(), Token::Tag(tag))
    }
}

fn is_form_associatable(name: ExpandedName) -> bool {
    *name.ns == Namespace::Html
        && matches!(
            name.local.as_str(),
            "button" | "fieldset" | "input" | "object" | "output" | "select" | "textarea" | "img"
        )
}

fn is_listed(name: ExpandedName) -> bool {
    is_form_associatable(name) && name.local.as_str() != "img"
}

/// camelCase spellings for SVG attributes, lowercased on the left as the
/// tokenizer would have stored them.
static SVG_ATTR_ADJUSTMENTS: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("basefrequency", "baseFrequency"),
    ("baseprofile", "baseProfile"),
    ("calcmode", "calcMode"),
    ("clippathunits", "clipPathUnits"),
    ("diffuseconstant", "diffuseConstant"),
    ("edgemode", "edgeMode"),
    ("filterunits", "filterUnits"),
    ("glyphref", "glyphRef"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("kernelmatrix", "kernelMatrix"),
    ("kernelunitlength", "kernelUnitLength"),
    ("keypoints", "keyPoints"),
    ("keysplines", "keySplines"),
    ("keytimes", "keyTimes"),
    ("lengthadjust", "lengthAdjust"),
    ("limitingconeangle", "limitingConeAngle"),
    ("markerheight", "markerHeight"),
    ("markerunits", "markerUnits"),
    ("markerwidth", "markerWidth"),
    ("maskcontentunits", "maskContentUnits"),
    ("maskunits", "maskUnits"),
    ("numoctaves", "numOctaves"),
    ("pathlength", "pathLength"),
    ("patterncontentunits", "patternContentUnits"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("pointsatx", "pointsAtX"),
    ("pointsaty", "pointsAtY"),
    ("pointsatz", "pointsAtZ"),
    ("preservealpha", "preserveAlpha"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("primitiveunits", "primitiveUnits"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("repeatdur", "repeatDur"),
    ("requiredextensions", "requiredExtensions"),
    ("requiredfeatures", "requiredFeatures"),
    ("specularconstant", "specularConstant"),
    ("specularexponent", "specularExponent"),
    ("spreadmethod", "spreadMethod"),
    ("startoffset", "startOffset"),
    ("stddeviation", "stdDeviation"),
    ("stitchtiles", "stitchTiles"),
    ("surfacescale", "surfaceScale"),
    ("systemlanguage", "systemLanguage"),
    ("tablevalues", "tableValues"),
    ("targetx", "targetX"),
    ("targety", "targetY"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
    ("viewtarget", "viewTarget"),
    ("xchannelselector", "xChannelSelector"),
    ("ychannelselector", "yChannelSelector"),
    ("zoomandpan", "zoomAndPan"),
];
