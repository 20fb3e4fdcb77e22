// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The contract between the tree builder and a concrete tree implementation.
//!
//! A `TreeSink` is the tree builder's only way of touching the actual
//! document; everything it knows about nodes is a `Handle`, an opaque,
//! cheaply-clonable reference chosen by the sink.

use std::borrow::Cow;

use super::{Attribute, ExpandedName, QualName, QuirksMode};
use crate::tendril::StrTendril;

/// Something which can be inserted into the DOM.
///
/// Adjacent sibling text nodes are merged into a single node, so
/// the sink may need to handle this itself if both kinds of appends
/// are possible.
pub enum NodeOrText<Handle> {
    AppendNode(Handle),
    AppendText(StrTendril),
}

pub use self::NodeOrText::{AppendNode, AppendText};

/// A place to insert a node.
pub enum InsertionPoint<Handle> {
    /// Insert as the last child of the given node.
    LastChild(Handle),
    /// Insert before this sibling.
    BeforeSibling(Handle),
}

/// Special properties of an element, useful for tree building.
#[derive(Copy, Clone, Default)]
pub struct ElementFlags {
    pub template: bool,
    pub mathml_annotation_xml_integration_point: bool,
}

/// Types which can receive tree-construction output from the tree builder.
///
/// Every mutating method takes `&self`; concrete sinks (see [`crate::rcdom`])
/// use interior mutability, matching the tokenizer's own `&self` style so a
/// `Tokenizer<TreeBuilder<Sink>>` can be driven without any `&mut` threading
/// through the dispatcher.
pub trait TreeSink {
    /// The overall result of parsing.
    ///
    /// This should default to Self, but default associated types are not stable yet.
    /// (See <https://github.com/rust-lang/rust/issues/29661>)
    type Output;

    /// Consume this sink and return the overall result of parsing.
    fn finish(self) -> Self::Output;

    /// Handle to a DOM node that the sink can use it to passed between its methods.
    type Handle: Clone;

    /// Signal a parse error.
    fn parse_error(&self, msg: Cow<'static, str>);

    /// Get a handle to the `Document` node.
    fn get_document(&self) -> Self::Handle;

    /// Get a handle to a template's template contents.
    ///
    /// The tree builder promises this will never be called with
    /// something other than a template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle;

    /// Set the document's quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode);

    /// Do two handles refer to the same node?
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool;

    /// What is the name of this element?
    ///
    /// Should never be called on a non-element node; feel free to `panic!`.
    fn elem_name(&self, target: &Self::Handle) -> ExpandedName<'_>;

    /// Create an element.
    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle;

    /// Create a comment node.
    fn create_comment(&self, text: StrTendril) -> Self::Handle;

    /// Append a node as the last child of the given node.  If this would
    /// produce adjacent sibling text nodes, it should instead append to
    /// the previous sibling.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>);

    /// When the insertion point is decided by the existence of a parent
    /// node of the element, we consider both possibilities and send the
    /// element which will be used if a parent node exists, along with
    /// the element to be used if there isn't one.
    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.has_parent_node(element) {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    /// Does the given node have a parent?
    fn has_parent_node(&self, node: &Self::Handle) -> bool;

    /// Append a `DOCTYPE` element to the `Document` node.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    );

    /// Add each attribute to the given element, if no attribute with that name
    /// already exists. The tree builder promises this will never be called
    /// with something else than an element.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>);

    /// Detach the given node from its parent.
    fn remove_from_parent(&self, target: &Self::Handle);

    /// Remove all the children from node and append them to new_parent.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle);

    /// Mark a HTML `<script>` element as "already started".
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Indicate that a `<script>` element is complete.
    fn complete_script(&self, _node: &Self::Handle) {}

    /// Insert a node before the given sibling.
    ///
    /// The tree builder promises that `sibling` is not a text node.
    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>);

    /// Called whenever the line number changes.
    fn set_current_line(&self, _line_number: u64) {}

    /// Indicate that a node was popped off the stack of open elements.
    fn pop(&self, _node: &Self::Handle) {}

    /// Is this node a MathML `annotation-xml` element that should act as
    /// an HTML integration point?
    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    /// Record that a listed, form-associatable element belongs to `form`.
    /// <https://html.spec.whatwg.org/multipage/#insert-an-html-element-for-the-token>
    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    /// Does `intended_parent`'s owning document allow declarative shadow
    /// roots to be attached by a `<template shadowrootmode>`?
    fn allow_declarative_shadow_roots(&self, _intended_parent: &Self::Handle) -> bool {
        false
    }

    /// Attach a declarative shadow root to `shadow_host`, backed by
    /// `template`'s contents. Returns whether the attachment succeeded.
    fn attach_declarative_shadow(
        &self,
        _shadow_host: &Self::Handle,
        _template: &Self::Handle,
        _attrs: &[Attribute],
    ) -> bool {
        false
    }
}

/// Lets a garbage-collected tree sink discover every `Handle` the tree
/// builder is holding onto, so it can keep them alive across a collection.
pub trait Tracer {
    type Handle;
    fn trace_handle(&self, handle: &Self::Handle);
}

/// Trivial wrapper around the factored-out "make an element, applying the
/// special-case bookkeeping `TreeSink` implementations tend to need" step.
///
/// `html5ever`'s actual special cases (marking `<script>`/`<template>`) are
/// the sink's own business; this free function exists purely so that tree
/// builder call sites read the same whether or not `flags` is trivial.
#[inline]
pub fn create_element<Sink: TreeSink>(
    sink: &Sink,
    name: QualName,
    attrs: Vec<Attribute>,
) -> Sink::Handle {
    sink.create_element(name, attrs, ElementFlags::default())
}
