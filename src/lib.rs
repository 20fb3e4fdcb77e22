// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A browser-grade, html5lib-conformant HTML5 parser.
//!
//! This crate implements the WHATWG tokenization and tree construction
//! algorithms end to end: [`encoding`] sniffs the document's character
//! encoding, [`tokenizer`] turns decoded text into a token stream,
//! [`tree_builder`] applies the insertion-mode state machine to build a
//! DOM, and [`rcdom`] is a concrete, queryable tree you can serialize,
//! select against, or walk for plain text. [`driver`] wires the pieces
//! together behind a couple of entry points; [`select`], [`text`], and
//! [`markdown`] are small consumers built on top of the resulting tree.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod buffer_queue;
mod data;
pub mod driver;
pub mod encoding;
pub mod errors;
pub mod interface;
pub mod markdown;
pub mod rcdom;
pub mod select;
pub mod serialize;
pub mod smallcharset;
pub mod streaming;
pub mod text;
pub mod tokenizer;
pub mod tree_builder;
mod util;

pub use crate::driver::{parse_document, parse_fragment, ParseOpts, Parser};
pub use crate::errors::{ErrorCode, ParseError, StrictModeError};
pub use crate::interface::{
    Attribute, ExpandedName, LocalName, Namespace, Prefix, QualName, QuirksMode,
};
pub use crate::serialize::serialize;
pub use crate::smallcharset::SmallCharSet;

/// Re-export of the `tendril` crate, for callers constructing input buffers
/// or implementing their own [`tree_builder::TreeSink`].
pub mod tendril {
    pub use tendril::*;
}
