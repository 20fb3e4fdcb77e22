// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The tree builder rules: one big per-mode dispatch.

use std::borrow::Cow::Borrowed;

use crate::tendril::StrTendril;
use crate::tokenizer::states::{Rawtext, Rcdata, ScriptData};
use crate::tokenizer::{EndTag, StartTag, Tag};
use crate::tree_builder::tag_sets::*;
use crate::tree_builder::types::*;
use crate::tree_builder::{create_element, AppendNode, TreeBuilder, TreeSink};
use crate::{ExpandedName, LocalName, Namespace, QualName, QuirksMode};

fn any_not_whitespace(x: &StrTendril) -> bool {
    x.chars().any(|c| !c.is_ascii_whitespace())
}

#[doc(hidden)]
impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    pub(crate) fn step(&self, mode: InsertionMode, token: Token) -> ProcessResult<Handle> {
        self.debug_step(mode, &token);

        match mode {
            //§ the-initial-insertion-mode
            InsertionMode::Initial => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                Token::Comment(text) => self.append_comment_to_doc(text),
                token => {
                    if !self.opts.iframe_srcdoc {
                        self.unexpected(&token);
                        self.set_quirks_mode(QuirksMode::Quirks);
                    }
                    ProcessResult::Reprocess(InsertionMode::BeforeHtml, token)
                },
            },

            //§ the-before-html-insertion-mode
            InsertionMode::BeforeHtml => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.create_root(tag.attrs);
                    self.mode.set(InsertionMode::BeforeHead);
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && !matches!(tag.name.as_str(), "head" | "body" | "html" | "br") =>
                {
                    self.unexpected(tag)
                },

                token => {
                    self.create_root(vec![]);
                    ProcessResult::Reprocess(InsertionMode::BeforeHead, token)
                },
            },

            //§ the-before-head-insertion-mode
            InsertionMode::BeforeHead => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "head" => {
                    *self.head_elem.borrow_mut() = Some(self.insert_element_for(tag));
                    self.mode.set(InsertionMode::InHead);
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && !matches!(tag.name.as_str(), "head" | "body" | "html" | "br") =>
                {
                    self.unexpected(tag)
                },

                token => {
                    *self.head_elem.borrow_mut() = Some(self.insert_phantom("head"));
                    ProcessResult::Reprocess(InsertionMode::InHead, token)
                },
            },

            //§ parsing-main-inhead
            // https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead
            InsertionMode::InHead => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag)
                    if tag.kind == StartTag
                        && matches!(tag.name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") =>
                {
                    // FIXME: handle <meta charset=...> and <meta http-equiv="Content-Type">
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "title" => {
                    self.parse_raw_data(tag, Rcdata)
                },

                Token::Tag(tag)
                    if tag.kind == StartTag
                        && matches!(tag.name.as_str(), "noframes" | "style" | "noscript") =>
                {
                    if !self.opts.scripting_enabled && tag.name.as_str() == "noscript" {
                        self.insert_element_for(tag);
                        self.mode.set(InsertionMode::InHeadNoscript);
                        ProcessResult::Done
                    } else {
                        self.parse_raw_data(tag, Rawtext)
                    }
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "script" => {
                    let elem = create_element(&self.sink, QualName::html("script"), tag.attrs);
                    if self.is_fragment() {
                        self.sink.mark_script_already_started(&elem);
                    }
                    self.insert_appropriately(AppendNode(elem.clone()), None);
                    self.open_elems.borrow_mut().push(elem);
                    self.to_raw_text_mode(ScriptData)
                },

                Token::Tag(tag) if tag.kind == EndTag && tag.name == "head" => {
                    self.pop();
                    self.mode.set(InsertionMode::AfterHead);
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && !matches!(tag.name.as_str(), "body" | "html" | "br")
                        && tag.name != "template" =>
                {
                    self.unexpected(tag)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "template" => {
                    self.active_formatting
                        .borrow_mut()
                        .push(FormatEntry::Marker);
                    self.frameset_ok.set(false);
                    self.mode.set(InsertionMode::InTemplate);
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InTemplate);

                    if self.should_attach_declarative_shadow(&tag) {
                        // Step 1. Let declarative shadow host element be adjusted current node.
                        let mut shadow_host = self.open_elems.borrow().last().unwrap().clone();
                        if self.is_fragment() && self.open_elems.borrow().len() == 1 {
                            shadow_host = self.context_elem.borrow().clone().unwrap();
                        }

                        // Step 2. Insert a foreign element for the template start tag, HTML
                        // namespace, only adding to the stack of open elements.
                        let template =
                            self.insert_foreign_element(tag.clone(), Namespace::Html, true);

                        // Steps 3-8: attach the shadow root.
                        let succeeded = self.attach_declarative_shadow(&tag, &shadow_host, &template);
                        if !succeeded {
                            // Step 8.1.1: fall back to inserting the template normally. Pop
                            // the element the foreign-element step above already pushed.
                            self.pop();
                            self.insert_element_for(tag);
                        }
                    } else {
                        self.insert_element_for(tag);
                    }

                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == EndTag && tag.name == "template" => {
                    if !self.in_html_elem_named("template") {
                        self.unexpected(&tag)
                    } else {
                        self.generate_implied_end_tags(thorough_implied_end);
                        self.expect_to_close("template");
                        self.clear_active_formatting_to_marker();
                        self.template_modes.borrow_mut().pop();
                        self.mode.set(self.reset_insertion_mode());
                        ProcessResult::Done
                    }
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "head" => {
                    self.unexpected(tag)
                },
                Token::Tag(ref tag) if tag.kind == EndTag => self.unexpected(tag),

                token => {
                    self.pop();
                    ProcessResult::Reprocess(InsertionMode::AfterHead, token)
                },
            },

            //§ parsing-main-inheadnoscript
            InsertionMode::InHeadNoscript => match token {
                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == EndTag && tag.name == "noscript" => {
                    self.pop();
                    self.mode.set(InsertionMode::InHead);
                    ProcessResult::Done
                },

                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Comment(_) => self.step(InsertionMode::InHead, token),

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                        ) =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "br" => {
                    self.unexpected(tag);
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag && matches!(tag.name.as_str(), "head" | "noscript") =>
                {
                    self.unexpected(tag)
                },
                Token::Tag(ref tag) if tag.kind == EndTag => self.unexpected(tag),

                token => {
                    self.unexpected(&token);
                    self.pop();
                    ProcessResult::Reprocess(InsertionMode::InHead, token)
                },
            },

            //§ the-after-head-insertion-mode
            InsertionMode::AfterHead => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "body" => {
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    self.mode.set(InsertionMode::InBody);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "frameset" => {
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InFrameset);
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "base" | "basefont"
                                | "bgsound"
                                | "link"
                                | "meta"
                                | "noframes"
                                | "script"
                                | "style"
                                | "template"
                                | "title"
                        ) =>
                {
                    self.unexpected(tag);
                    let head = self
                        .head_elem
                        .borrow()
                        .as_ref()
                        .expect("no head element")
                        .clone();
                    self.push(&head);
                    let result = self.step(InsertionMode::InHead, token);
                    self.remove_from_stack(&head);
                    result
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "template" => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && !matches!(tag.name.as_str(), "body" | "html" | "br") =>
                {
                    self.unexpected(tag)
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "head" => {
                    self.unexpected(tag)
                },
                Token::Tag(ref tag) if tag.kind == EndTag => self.unexpected(tag),

                token => {
                    self.insert_phantom("body");
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                },
            },

            //§ parsing-main-inbody
            InsertionMode::InBody => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(_, text) => {
                    self.reconstruct_active_formatting_elements();
                    if any_not_whitespace(&text) {
                        self.frameset_ok.set(false);
                    }
                    self.append_text(text)
                },

                Token::Comment(text) => self.append_comment(text),

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.unexpected(&tag);
                    if !self.in_html_elem_named("template") {
                        let top = self.html_elem().clone();
                        self.sink.add_attrs_if_missing(&top, tag.attrs);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if (tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "base" | "basefont"
                                | "bgsound"
                                | "link"
                                | "meta"
                                | "noframes"
                                | "script"
                                | "style"
                                | "template"
                                | "title"
                        ))
                        || (tag.kind == EndTag && tag.name == "template") =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "body" => {
                    self.unexpected(&tag);
                    if let Some(node) = self.body_elem() {
                        if self.open_elems.borrow().len() != 1
                            && !self.in_html_elem_named("template")
                        {
                            self.frameset_ok.set(false);
                            self.sink.add_attrs_if_missing(&node, tag.attrs);
                        }
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "frameset" => {
                    self.unexpected(&tag);
                    if !self.frameset_ok.get() {
                        return ProcessResult::Done;
                    }
                    let Some(body) = self.body_elem() else {
                        return ProcessResult::Done;
                    };
                    self.sink.remove_from_parent(&body);

                    // FIXME: can we get here in the fragment case?
                    // What to do with the first element then?
                    self.open_elems.borrow_mut().truncate(1);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InFrameset);
                    ProcessResult::Done
                },

                Token::Eof => {
                    if !self.template_modes.borrow().is_empty() {
                        self.step(InsertionMode::InTemplate, Token::Eof)
                    } else {
                        self.check_body_end();
                        self.stop_parsing()
                    }
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "body" => {
                    if self.in_scope_named(default_scope, "body") {
                        self.check_body_end();
                        self.mode.set(InsertionMode::AfterBody);
                    } else {
                        self.sink
                            .parse_error(Borrowed("</body> with no <body> in scope"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "html" => {
                    if self.in_scope_named(default_scope, "body") {
                        self.check_body_end();
                        ProcessResult::Reprocess(InsertionMode::AfterBody, token)
                    } else {
                        self.sink
                            .parse_error(Borrowed("</html> with no <body> in scope"));
                        ProcessResult::Done
                    }
                },

                Token::Tag(tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "address" | "article" | "aside" | "blockquote" | "center"
                                | "details" | "dialog" | "dir" | "div" | "dl" | "fieldset"
                                | "figcaption" | "figure" | "footer" | "header" | "hgroup"
                                | "main" | "nav" | "ol" | "p" | "search" | "section"
                                | "summary" | "ul"
                        ) =>
                {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "menu" => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                    self.close_p_element_in_button_scope();
                    if self.current_node_in(heading_tag) {
                        self.sink.parse_error(Borrowed("nested heading tags"));
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "pre" | "listing") => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    self.ignore_lf.set(true);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "form" => {
                    if self.form_elem.borrow().is_some() && !self.in_html_elem_named("template") {
                        self.sink.parse_error(Borrowed("nested forms"));
                    } else {
                        self.close_p_element_in_button_scope();
                        let elem = self.insert_element_for(tag);
                        if !self.in_html_elem_named("template") {
                            *self.form_elem.borrow_mut() = Some(elem);
                        }
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "li" | "dd" | "dt") => {
                    let list = tag.name.as_str() == "li";
                    self.frameset_ok.set(false);

                    let mut to_close: Option<String> = None;
                    for node in self.open_elems.borrow().iter().rev() {
                        let elem_name = self.sink.elem_name(node);
                        let can_close = if list {
                            *elem_name.ns == Namespace::Html && elem_name.local.as_str() == "li"
                        } else {
                            *elem_name.ns == Namespace::Html
                                && matches!(elem_name.local.as_str(), "dd" | "dt")
                        };
                        if can_close {
                            to_close = Some(elem_name.local.as_str().to_owned());
                            break;
                        }
                        let extra_special = special_tag(elem_name)
                            && !(*elem_name.ns == Namespace::Html
                                && matches!(elem_name.local.as_str(), "address" | "div" | "p"));
                        if extra_special {
                            break;
                        }
                    }

                    if let Some(name) = to_close {
                        self.generate_implied_end_except(&name);
                        self.expect_to_close(&name);
                    }

                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "plaintext" => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::ToPlaintext
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "button" => {
                    if self.in_scope_named(default_scope, "button") {
                        self.sink.parse_error(Borrowed("nested buttons"));
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.pop_until_named("button");
                    }
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "address" | "article" | "aside" | "blockquote" | "button"
                                | "center" | "details" | "dialog" | "dir" | "div" | "dl"
                                | "fieldset" | "figcaption" | "figure" | "footer" | "header"
                                | "hgroup" | "listing" | "main" | "menu" | "nav" | "ol"
                                | "pre" | "search" | "section" | "summary" | "ul"
                        ) =>
                {
                    if !self.in_scope_named(default_scope, tag.name.as_str()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name.as_str());
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "form" => {
                    if !self.in_html_elem_named("template") {
                        let Some(node) = self.form_elem.take() else {
                            self.sink
                                .parse_error(Borrowed("Null form element pointer on </form>"));
                            return ProcessResult::Done;
                        };
                        if !self.in_scope(default_scope, |n| self.sink.same_node(&node, &n)) {
                            self.sink
                                .parse_error(Borrowed("Form element not in scope on </form>"));
                            return ProcessResult::Done;
                        }
                        self.generate_implied_end_tags(cursory_implied_end);
                        let current = self.current_node().clone();
                        self.remove_from_stack(&node);
                        if !self.sink.same_node(&current, &node) {
                            self.sink
                                .parse_error(Borrowed("Bad open element on </form>"));
                        }
                    } else {
                        if !self.in_scope_named(default_scope, "form") {
                            self.sink
                                .parse_error(Borrowed("Form element not in scope on </form>"));
                            return ProcessResult::Done;
                        }
                        self.generate_implied_end_tags(cursory_implied_end);
                        if !self.current_node_named("form") {
                            self.sink
                                .parse_error(Borrowed("Bad open element on </form>"));
                        }
                        self.pop_until_named("form");
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "p" => {
                    if !self.in_scope_named(button_scope, "p") {
                        self.sink.parse_error(Borrowed("No <p> tag to close"));
                        self.insert_phantom("p");
                    }
                    self.close_p_element();
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "li" | "dd" | "dt") => {
                    let in_scope = if tag.name.as_str() == "li" {
                        self.in_scope_named(list_item_scope, "li")
                    } else {
                        self.in_scope_named(default_scope, tag.name.as_str())
                    };
                    if in_scope {
                        self.generate_implied_end_except(tag.name.as_str());
                        self.expect_to_close(tag.name.as_str());
                    } else {
                        self.sink.parse_error(Borrowed("No matching tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                    if self.in_scope(default_scope, |n| self.elem_in(&n, heading_tag)) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        if !self.current_node_named(tag.name.as_str()) {
                            self.sink
                                .parse_error(Borrowed("Closing wrong heading tag"));
                        }
                        self.pop_until(heading_tag);
                    } else {
                        self.sink.parse_error(Borrowed("No heading tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "a" => {
                    self.handle_misnested_a_tags(&tag);
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small"
                                | "strike" | "strong" | "tt" | "u"
                        ) =>
                {
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "nobr" => {
                    self.reconstruct_active_formatting_elements();
                    if self.in_scope_named(default_scope, "nobr") {
                        self.sink.parse_error(Borrowed("Nested <nobr>"));
                        self.adoption_agency("nobr");
                        self.reconstruct_active_formatting_elements();
                    }
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr"
                                | "s" | "small" | "strike" | "strong" | "tt" | "u"
                        ) =>
                {
                    self.adoption_agency(tag.name.as_str());
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "applet" | "marquee" | "object") => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.active_formatting
                        .borrow_mut()
                        .push(FormatEntry::Marker);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "applet" | "marquee" | "object") => {
                    if !self.in_scope_named(default_scope, tag.name.as_str()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name.as_str());
                        self.clear_active_formatting_to_marker();
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "table" => {
                    if self.quirks_mode.get() != QuirksMode::Quirks {
                        self.close_p_element_in_button_scope();
                    }
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    self.mode.set(InsertionMode::InTable);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == EndTag && tag.name == "br" => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            kind: StartTag,
                            attrs: vec![],
                            ..tag
                        }),
                    )
                },

                Token::Tag(tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "area" | "br" | "embed" | "img" | "keygen" | "wbr" | "input"
                        ) =>
                {
                    let keep_frameset_ok = tag.name.as_str() == "input" && self.is_type_hidden(&tag);
                    self.reconstruct_active_formatting_elements();
                    self.insert_and_pop_element_for(tag);
                    if !keep_frameset_ok {
                        self.frameset_ok.set(false);
                    }
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "param" | "source" | "track") => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "hr" => {
                    self.close_p_element_in_button_scope();
                    self.insert_and_pop_element_for(tag);
                    self.frameset_ok.set(false);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "image" => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            name: LocalName::new("img"),
                            ..tag
                        }),
                    )
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "textarea" => {
                    self.ignore_lf.set(true);
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rcdata)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "xmp" => {
                    self.close_p_element_in_button_scope();
                    self.reconstruct_active_formatting_elements();
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rawtext)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "iframe" => {
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rawtext)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "noembed" => {
                    self.parse_raw_data(tag, Rawtext)
                },

                // <noscript> handled by the wildcard start-tag case below.
                Token::Tag(tag) if tag.kind == StartTag && tag.name == "select" => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    // NB: mode == InBody but possibly self.mode != mode, if
                    // we're processing "as in the rules for InBody".
                    self.mode.set(match self.mode.get() {
                        InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell => InsertionMode::InSelectInTable,
                        _ => InsertionMode::InSelect,
                    });
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "optgroup" | "option") => {
                    if self.current_node_named("option") {
                        self.pop();
                    }
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "rb" | "rtc") => {
                    if self.in_scope_named(default_scope, "ruby") {
                        self.generate_implied_end_tags(cursory_implied_end);
                    }
                    if !self.current_node_named("ruby") {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "rp" | "rt") => {
                    if self.in_scope_named(default_scope, "ruby") {
                        self.generate_implied_end_except("rtc");
                    }
                    if !self.current_node_named("rtc") && !self.current_node_named("ruby") {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "math" => {
                    self.enter_foreign(tag, Namespace::MathMl)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "svg" => {
                    self.enter_foreign(tag, Namespace::Svg)
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td"
                                | "tfoot" | "th" | "thead" | "tr"
                        ) =>
                {
                    self.unexpected(tag)
                },

                Token::Tag(tag) if tag.kind == StartTag => {
                    if self.opts.scripting_enabled && tag.name.as_str() == "noscript" {
                        self.parse_raw_data(tag, Rawtext)
                    } else {
                        self.reconstruct_active_formatting_elements();
                        self.insert_element_for(tag);
                        ProcessResult::Done
                    }
                },

                Token::Tag(tag) if tag.kind == EndTag => {
                    self.process_end_tag_in_body(tag);
                    ProcessResult::Done
                },

                _ => unreachable!("impossible case in InBody mode"),
            },

            //§ parsing-main-incdata
            InsertionMode::Text => match token {
                Token::Characters(_, text) => self.append_text(text),

                Token::Eof => {
                    self.unexpected(&token);
                    if self.current_node_named("script") {
                        let current = self.current_node();
                        self.sink.mark_script_already_started(&current);
                    }
                    self.pop();
                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },

                Token::Tag(tag) if tag.kind == EndTag => {
                    let node = self.pop();
                    self.mode.set(self.orig_mode.take().unwrap());
                    if tag.name.as_str() == "script" {
                        return ProcessResult::Script(node);
                    }
                    ProcessResult::Done
                },

                // The spec doesn't say what to do here. Other tokens are impossible?
                _ => unreachable!("impossible case in Text mode"),
            },

            //§ parsing-main-intable
            InsertionMode::InTable => match token {
                Token::NullCharacter => self.process_chars_in_table(token),

                Token::Characters(..) => self.process_chars_in_table(token),

                Token::Comment(text) => self.append_comment(text),

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "caption" => {
                    self.pop_until_current(table_scope);
                    self.active_formatting
                        .borrow_mut()
                        .push(FormatEntry::Marker);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCaption);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "colgroup" => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InColumnGroup);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "col" => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom("colgroup");
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, Token::Tag(tag))
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "tbody" | "tfoot" | "thead") => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InTableBody);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "td" | "th" | "tr") => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom("tbody");
                    ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "table" => {
                    self.unexpected(&tag);
                    if self.in_scope_named(table_scope, "table") {
                        self.pop_until_named("table");
                        ProcessResult::Reprocess(self.reset_insertion_mode(), Token::Tag(tag))
                    } else {
                        ProcessResult::Done
                    }
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "table" => {
                    if self.in_scope_named(table_scope, "table") {
                        self.pop_until_named("table");
                        self.mode.set(self.reset_insertion_mode());
                    } else {
                        self.unexpected(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "body" | "caption" | "col" | "colgroup" | "html" | "tbody"
                                | "td" | "tfoot" | "th" | "thead" | "tr"
                        ) =>
                {
                    self.unexpected(tag)
                },

                Token::Tag(ref tag)
                    if (tag.kind == StartTag
                        && matches!(tag.name.as_str(), "style" | "script" | "template"))
                        || (tag.kind == EndTag && tag.name == "template") =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "input" => {
                    self.unexpected(&tag);
                    if self.is_type_hidden(&tag) {
                        self.insert_and_pop_element_for(tag);
                        ProcessResult::DoneAckSelfClosing
                    } else {
                        self.foster_parent_in_body(Token::Tag(tag))
                    }
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "form" => {
                    self.unexpected(&tag);
                    if !self.in_html_elem_named("template") && self.form_elem.borrow().is_none() {
                        *self.form_elem.borrow_mut() = Some(self.insert_and_pop_element_for(tag));
                    }
                    ProcessResult::Done
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    self.unexpected(&token);
                    self.foster_parent_in_body(token)
                },
            },

            //§ parsing-main-intabletext
            InsertionMode::InTableText => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(split, text) => {
                    self.pending_table_text.borrow_mut().push((split, text));
                    ProcessResult::Done
                },

                token => {
                    let pending = self.pending_table_text.take();
                    let contains_nonspace = pending.iter().any(|&(split, ref text)| match split {
                        SplitStatus::Whitespace => false,
                        SplitStatus::NotWhitespace => true,
                        SplitStatus::NotSplit => any_not_whitespace(text),
                    });

                    if contains_nonspace {
                        self.sink.parse_error(Borrowed("Non-space table text"));
                        for (split, text) in pending.into_iter() {
                            match self.foster_parent_in_body(Token::Characters(split, text)) {
                                ProcessResult::Done => (),
                                _ => panic!("not prepared to handle this!"),
                            }
                        }
                    } else {
                        for (_, text) in pending.into_iter() {
                            self.append_text(text);
                        }
                    }

                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },
            },

            //§ parsing-main-incaption
            InsertionMode::InCaption => match token {
                Token::Tag(tag)
                    if (tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                                | "thead" | "tr"
                        ))
                        || (tag.kind == EndTag && matches!(tag.name.as_str(), "table" | "caption")) =>
                {
                    if self.in_scope_named(table_scope, "caption") {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close("caption");
                        self.clear_active_formatting_to_marker();
                        if tag.kind == EndTag && tag.name.as_str() == "caption" {
                            self.mode.set(InsertionMode::InTable);
                            ProcessResult::Done
                        } else {
                            ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag))
                        }
                    } else {
                        self.unexpected(&tag);
                        ProcessResult::Done
                    }
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                                | "th" | "thead" | "tr"
                        ) =>
                {
                    self.unexpected(tag)
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-incolgroup
            InsertionMode::InColumnGroup => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "col" => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "colgroup" => {
                    if self.current_node_named("colgroup") {
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.unexpected(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "col" => self.unexpected(tag),

                Token::Tag(ref tag)
                    if (tag.kind == StartTag || tag.kind == EndTag) && tag.name == "template" =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    if self.current_node_named("colgroup") {
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },
            },

            //§ parsing-main-intbody
            InsertionMode::InTableBody => match token {
                Token::Tag(tag) if tag.kind == StartTag && tag.name == "tr" => {
                    self.pop_until_current(table_body_context);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InRow);
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "th" | "td") => {
                    self.unexpected(tag);
                    self.pop_until_current(table_body_context);
                    self.insert_phantom("tr");
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "tbody" | "tfoot" | "thead") => {
                    if self.in_scope_named(table_scope, tag.name.as_str()) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if (tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                        ))
                        || (tag.kind == EndTag && tag.name == "table") =>
                {
                    // Local table_outer note: here "the appropriate scope test" is
                    // done against table/tbody/tfoot only, not thead/tr.
                    let local_table_outer = |n: ExpandedName| {
                        *n.ns == Namespace::Html
                            && matches!(n.local.as_str(), "table" | "tbody" | "tfoot")
                    };
                    if self.in_scope(table_scope, |e| self.elem_in(&e, local_table_outer)) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                        ) =>
                {
                    self.unexpected(tag)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intr
            InsertionMode::InRow => match token {
                Token::Tag(tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "th" | "td") => {
                    self.pop_until_current(table_row_context);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCell);
                    self.active_formatting
                        .borrow_mut()
                        .push(FormatEntry::Marker);
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "tr" => {
                    if self.in_scope_named(table_scope, "tr") {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(&node, "tr");
                        self.mode.set(InsertionMode::InTableBody);
                    } else {
                        self.unexpected(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if (tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                        ))
                        || (tag.kind == EndTag && tag.name == "table") =>
                {
                    if self.in_scope_named(table_scope, "tr") {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(&node, "tr");
                        ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                    } else {
                        self.unexpected(tag)
                    }
                },

                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "tbody" | "tfoot" | "thead") => {
                    if self.in_scope_named(table_scope, tag.name.as_str()) {
                        if self.in_scope_named(table_scope, "tr") {
                            self.pop_until_current(table_row_context);
                            let node = self.pop();
                            self.assert_named(&node, "tr");
                            ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                        } else {
                            ProcessResult::Done
                        }
                    } else {
                        self.unexpected(&tag)
                    }
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                        ) =>
                {
                    self.unexpected(tag)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intd
            InsertionMode::InCell => match token {
                Token::Tag(tag) if tag.kind == EndTag && matches!(tag.name.as_str(), "td" | "th") => {
                    if self.in_scope_named(table_scope, tag.name.as_str()) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name.as_str());
                        self.clear_active_formatting_to_marker();
                        self.mode.set(InsertionMode::InRow);
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                                | "thead" | "tr"
                        ) =>
                {
                    if self.in_scope(table_scope, |n| self.elem_in(&n, td_th)) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, token)
                    } else {
                        self.unexpected(tag)
                    }
                },

                Token::Tag(ref tag)
                    if tag.kind == EndTag
                        && matches!(tag.name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
                {
                    self.unexpected(tag)
                },

                Token::Tag(tag)
                    if tag.kind == EndTag
                        && matches!(tag.name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
                {
                    if self.in_scope_named(table_scope, tag.name.as_str()) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                    } else {
                        self.unexpected(&tag)
                    }
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-inselect
            InsertionMode::InSelect => match token {
                Token::NullCharacter => self.unexpected(&token),
                Token::Characters(_, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "option" => {
                    if self.current_node_named("option") {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "optgroup" => {
                    if self.current_node_named("option") {
                        self.pop();
                    }
                    if self.current_node_named("optgroup") {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "hr" => {
                    if self.current_node_named("option") {
                        self.pop();
                    }
                    if self.current_node_named("optgroup") {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    self.pop();
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "optgroup" => {
                    let open_elems = self.open_elems.borrow();
                    let second_to_last_is_optgroup = open_elems.len() >= 2
                        && self.html_elem_named(&open_elems[open_elems.len() - 2], "optgroup");
                    drop(open_elems);
                    if second_to_last_is_optgroup && self.current_node_named("option") {
                        self.pop();
                    }
                    if self.current_node_named("optgroup") {
                        self.pop();
                    } else {
                        self.unexpected(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "option" => {
                    if self.current_node_named("option") {
                        self.pop();
                    } else {
                        self.unexpected(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.name == "select" => {
                    let in_scope = self.in_scope_named(select_scope, "select");

                    if !in_scope || tag.kind == StartTag {
                        self.unexpected(&tag);
                    }

                    if in_scope {
                        self.pop_until_named("select");
                        self.mode.set(self.reset_insertion_mode());
                    }
                    ProcessResult::Done
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(tag.name.as_str(), "input" | "keygen" | "textarea") =>
                {
                    self.unexpected(tag);
                    if self.in_scope_named(select_scope, "select") {
                        self.pop_until_named("select");
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    } else {
                        ProcessResult::Done
                    }
                },

                Token::Tag(ref tag)
                    if (tag.kind == StartTag && tag.name == "script")
                        || (tag.kind == EndTag && tag.name == "template")
                        || (tag.kind == StartTag && tag.name == "template") =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => self.unexpected(&token),
            },

            //§ parsing-main-inselectintable
            InsertionMode::InSelectInTable => match token {
                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th"
                        ) =>
                {
                    self.unexpected(tag);
                    self.pop_until_named("select");
                    ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                },

                Token::Tag(tag)
                    if tag.kind == EndTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th"
                        ) =>
                {
                    self.unexpected(&tag);
                    if self.in_scope_named(table_scope, tag.name.as_str()) {
                        self.pop_until_named("select");
                        ProcessResult::Reprocess(self.reset_insertion_mode(), Token::Tag(tag))
                    } else {
                        ProcessResult::Done
                    }
                },

                token => self.step(InsertionMode::InSelect, token),
            },

            //§ parsing-main-intemplate
            InsertionMode::InTemplate => match token {
                Token::Characters(_, _) => self.step(InsertionMode::InBody, token),
                Token::Comment(_) => self.step(InsertionMode::InBody, token),

                Token::Tag(ref tag)
                    if (tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "base" | "basefont"
                                | "bgsound"
                                | "link"
                                | "meta"
                                | "noframes"
                                | "script"
                                | "style"
                                | "template"
                                | "title"
                        ))
                        || (tag.kind == EndTag && tag.name == "template") =>
                {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(ref tag)
                    if tag.kind == StartTag
                        && matches!(
                            tag.name.as_str(),
                            "caption" | "colgroup" | "tbody" | "tfoot" | "thead"
                        ) =>
                {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InTable);
                    ProcessResult::Reprocess(InsertionMode::InTable, token)
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "col" => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InColumnGroup);
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, token)
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "tr" => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InTableBody);
                    ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                },

                Token::Tag(ref tag) if tag.kind == StartTag && matches!(tag.name.as_str(), "td" | "th") => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InRow);
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Eof => {
                    if !self.in_html_elem_named("template") {
                        self.stop_parsing()
                    } else {
                        self.unexpected(&token);
                        self.pop_until_named("template");
                        self.clear_active_formatting_to_marker();
                        self.template_modes.borrow_mut().pop();
                        self.mode.set(self.reset_insertion_mode());
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    }
                },

                Token::Tag(tag) if tag.kind == StartTag => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InBody);
                    ProcessResult::Reprocess(InsertionMode::InBody, Token::Tag(tag))
                },

                token => self.unexpected(&token),
            },

            //§ parsing-main-afterbody
            InsertionMode::AfterBody => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_html(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "html" => {
                    if self.is_fragment() {
                        self.unexpected(tag);
                    } else {
                        self.mode.set(InsertionMode::AfterAfterBody);
                    }
                    ProcessResult::Done
                },

                Token::Eof => self.stop_parsing(),

                token => {
                    self.unexpected(&token);
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                },
            },

            //§ parsing-main-inframeset
            InsertionMode::InFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "frameset" => {
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == EndTag && tag.name == "frameset" => {
                    if self.open_elems.borrow().len() == 1 {
                        self.unexpected(tag);
                    } else {
                        self.pop();
                        if !self.is_fragment() && !self.current_node_named("frameset") {
                            self.mode.set(InsertionMode::AfterFrameset);
                        }
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag) if tag.kind == StartTag && tag.name == "frame" => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "noframes" => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => {
                    if self.open_elems.borrow().len() != 1 {
                        self.unexpected(&token);
                    }
                    self.stop_parsing()
                },

                token => self.unexpected(&token),
            },

            //§ parsing-main-afterframeset
            InsertionMode::AfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(_) if matches!(&token, Token::Tag(t) if t.kind == EndTag && t.name == "html") => {
                    self.mode.set(InsertionMode::AfterAfterFrameset);
                    ProcessResult::Done
                },

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "noframes" => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.stop_parsing(),

                token => self.unexpected(&token),
            },

            //§ the-after-after-body-insertion-mode
            InsertionMode::AfterAfterBody => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Eof => self.stop_parsing(),

                token => {
                    self.unexpected(&token);
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                },
            },

            //§ the-after-after-frameset-insertion-mode
            InsertionMode::AfterAfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "html" => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Eof => self.stop_parsing(),

                Token::Tag(ref tag) if tag.kind == StartTag && tag.name == "noframes" => {
                    self.step(InsertionMode::InHead, token)
                },

                token => self.unexpected(&token),
            },
            //§ END
        }
    }

    pub(crate) fn step_foreign(&self, token: Token) -> ProcessResult<Handle> {
        match token {
            Token::NullCharacter => {
                self.unexpected(&token);
                self.append_text(StrTendril::from_char('\u{fffd}'))
            },

            Token::Characters(_, text) => {
                if any_not_whitespace(&text) {
                    self.frameset_ok.set(false);
                }
                self.append_text(text)
            },

            Token::Comment(text) => self.append_comment(text),

            Token::Tag(tag)
                if tag.kind == StartTag
                    && matches!(
                        tag.name.as_str(),
                        "b" | "big" | "blockquote" | "body" | "br" | "center" | "code" | "dd"
                            | "div" | "dl" | "dt" | "em" | "embed" | "h1" | "h2" | "h3" | "h4"
                            | "h5" | "h6" | "head" | "hr" | "i" | "img" | "li" | "listing"
                            | "menu" | "meta" | "nobr" | "ol" | "p" | "pre" | "ruby" | "s"
                            | "small" | "span" | "strong" | "strike" | "sub" | "sup" | "table"
                            | "tt" | "u" | "ul" | "var"
                    ) || (tag.kind == EndTag && matches!(tag.name.as_str(), "br" | "p")) =>
            {
                self.unexpected_start_tag_in_foreign_content(tag)
            },

            Token::Tag(tag) if tag.kind == StartTag && tag.name == "font" => {
                let unexpected = tag.attrs.iter().any(|attr| {
                    attr.name.ns == Namespace::None
                        && matches!(attr.name.local.as_str(), "color" | "face" | "size")
                });
                if unexpected {
                    self.unexpected_start_tag_in_foreign_content(tag)
                } else {
                    self.foreign_start_tag(tag)
                }
            },

            Token::Tag(tag) if tag.kind == StartTag => self.foreign_start_tag(tag),

            // FIXME(html5ever#118): </script> in SVG

            Token::Tag(tag) if tag.kind == EndTag => {
                let mut first = true;
                let mut stack_idx = self.open_elems.borrow().len() - 1;
                loop {
                    if stack_idx == 0 {
                        return ProcessResult::Done;
                    }

                    let (html, eq) = {
                        let open_elems = self.open_elems.borrow();
                        let node_name = self.sink.elem_name(&open_elems[stack_idx]);
                        let html = *node_name.ns == Namespace::Html;
                        let eq = node_name.local.eq_ignore_ascii_case(tag.name.as_str());
                        (html, eq)
                    };
                    if !first && html {
                        let mode = self.mode.get();
                        return self.step(mode, Token::Tag(tag));
                    }

                    if eq {
                        self.open_elems.borrow_mut().truncate(stack_idx);
                        return ProcessResult::Done;
                    }

                    if first {
                        self.unexpected(&tag);
                        first = false;
                    }
                    stack_idx -= 1;
                }
            },

            _ => unreachable!("impossible case in foreign content"),
        }
    }
}
