// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Names, namespaces and the bits of the tree-construction contract that
//! don't belong to any single subsystem.
//!
//! The upstream project interns all of this behind `string_cache`'s
//! compile-time atom tables. We drop that interning layer (it buys
//! cross-process/global sharing we have no use for here) and keep plain,
//! cheaply-clonable owned strings with the same `QualName`/`Namespace`
//! shape, so the rest of the parser reads the same either way.

use std::fmt;
use std::rc::Rc;

use crate::tendril::StrTendril;

pub mod tree_builder;
pub use self::tree_builder::{
    create_element, AppendNode, AppendText, ElementFlags, NodeOrText, TreeSink,
};

/// The three namespaces this parser ever produces, plus the two XML-ish
/// ones that only ever show up on *attributes* inside foreign content
/// (`xlink:href`, `xml:lang`, `xmlns`).
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug, Default)]
pub enum Namespace {
    #[default]
    None,
    Html,
    Svg,
    MathMl,
    Xml,
    XmlNs,
    XLink,
}

impl Namespace {
    pub fn uri(&self) -> &'static str {
        match *self {
            Namespace::None => "",
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
            Namespace::Xml => "http://www.w3.org/XML/1998/namespace",
            Namespace::XmlNs => "http://www.w3.org/2000/xmlns/",
            Namespace::XLink => "http://www.w3.org/1999/xlink",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Namespace::None)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// A prefix, e.g. the `xlink` in `xlink:href`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct Prefix(Rc<str>);

impl Prefix {
    pub fn new(s: &str) -> Prefix {
        Prefix(Rc::from(s))
    }
}

impl std::ops::Deref for Prefix {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for Prefix {
    fn from(s: &'a str) -> Prefix {
        Prefix::new(s)
    }
}

/// A local name, lowercase-ASCII for HTML elements/attributes; foreign
/// content may carry mixed-case local names (`foreignObject`, `viewBox`).
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct LocalName(Rc<str>);

impl LocalName {
    pub fn new(s: &str) -> LocalName {
        LocalName(Rc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for LocalName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for LocalName {
    fn from(s: &'a str) -> LocalName {
        LocalName::new(s)
    }
}

impl From<String> for LocalName {
    fn from(s: String) -> LocalName {
        LocalName(Rc::from(s.into_boxed_str()))
    }
}

impl PartialEq<str> for LocalName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for LocalName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// <https://www.w3.org/TR/REC-xml-names/#dt-expname>
///
/// A borrowed `(namespace, local name)` pair, used as the key for scope
/// tests and tag-set membership without cloning the owning `QualName`.
#[derive(Copy, Clone, Eq, Hash)]
pub struct ExpandedName<'a> {
    pub ns: &'a Namespace,
    pub local: &'a LocalName,
}

impl<'a, 'b> PartialEq<ExpandedName<'a>> for ExpandedName<'b> {
    fn eq(&self, other: &ExpandedName<'a>) -> bool {
        self.ns == other.ns && self.local == other.local
    }
}

impl<'a> fmt::Debug for ExpandedName<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ns.is_none() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}:{}", self.ns, self.local)
        }
    }
}

/// A fully qualified name: the namespace, an optional prefix (only ever
/// set on foreign-content attributes after adjustment), and the local name.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct QualName {
    pub prefix: Option<Prefix>,
    pub ns: Namespace,
    pub local: LocalName,
}

impl QualName {
    #[inline]
    pub fn new(prefix: Option<Prefix>, ns: Namespace, local: LocalName) -> QualName {
        QualName { prefix, ns, local }
    }

    /// Construct a name in the HTML namespace with no prefix -- the
    /// common case for every tag and attribute name the tokenizer hands
    /// the tree builder.
    #[inline]
    pub fn html(local: impl Into<LocalName>) -> QualName {
        QualName::new(None, Namespace::Html, local.into())
    }

    #[inline]
    pub fn expanded(&self) -> ExpandedName<'_> {
        ExpandedName {
            ns: &self.ns,
            local: &self.local,
        }
    }
}

/// A tag attribute.
///
/// The namespace on the attribute name is `Namespace::None` for every
/// attribute the tokenizer produces; the tree builder rewrites it to
/// `Xml`/`XmlNs`/`XLink` for the closed set of foreign-content attributes
/// named in the adjustment tables (see `tree_builder::foreign`).
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Attribute {
    pub name: QualName,
    pub value: StrTendril,
}

/// <https://dom.spec.whatwg.org/#concept-document-quirks>
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum QuirksMode {
    Quirks,
    LimitedQuirks,
    #[default]
    NoQuirks,
}
