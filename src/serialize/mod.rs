// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turning a tree back into bytes.
//!
//! [`HtmlSerializer`] writes ordinary HTML, the way a browser's
//! `outerHTML` would; [`test_format`] writes the indented canonical form
//! `html5lib-tests` expects from a conformance run.

use std::default::Default;
use std::io::{self, Write};

use crate::interface::QualName;

mod test_format;

pub use self::test_format::{serialize_test_format, serialize_test_format_fragment};

/// How much of a node's own representation to include.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TraversalScope {
    /// Include the node's own start/end tag (or its text/comment/doctype line).
    IncludeNode,
    /// Skip the node itself; serialize only its children.
    ChildrenOnly,
}

/// Anything a [`Serializer`] can be asked to write out.
pub trait Serialize {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()>;
}

pub type AttrRef<'a> = (&'a QualName, &'a str);

/// A sink for serialization events, in document order.
pub trait Serializer {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>;

    fn end_elem(&mut self, name: QualName) -> io::Result<()>;

    fn write_text(&mut self, text: &str) -> io::Result<()>;

    fn write_comment(&mut self, text: &str) -> io::Result<()>;

    fn write_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> io::Result<()>;
}

#[derive(Copy, Clone)]
pub struct SerializeOpts {
    /// Is scripting enabled? Affects whether `<noscript>` contents are
    /// escaped as plain text or treated as markup.
    pub scripting_enabled: bool,
}

impl Default for SerializeOpts {
    fn default() -> SerializeOpts {
        SerializeOpts {
            scripting_enabled: true,
        }
    }
}

/// Serialize `node` as plain HTML, the way `Element.outerHTML` would.
pub fn serialize<Wr, T>(writer: Wr, node: &T, opts: SerializeOpts) -> io::Result<()>
where
    Wr: Write,
    T: Serialize,
{
    let mut ser = HtmlSerializer::new(writer, opts);
    node.serialize(&mut ser, TraversalScope::IncludeNode)
}

struct ElemInfo {
    html_name: Option<crate::interface::LocalName>,
    ignore_children: bool,
}

/// Writes compact HTML: no added whitespace, void elements self-close
/// implicitly (no children, no end tag), `<script>`/`<style>`/etc. text is
/// never entity-escaped.
pub struct HtmlSerializer<Wr> {
    writer: Wr,
    opts: SerializeOpts,
    stack: Vec<ElemInfo>,
}

impl<Wr: Write> HtmlSerializer<Wr> {
    pub fn new(writer: Wr, opts: SerializeOpts) -> HtmlSerializer<Wr> {
        HtmlSerializer {
            writer,
            opts,
            stack: vec![ElemInfo {
                html_name: None,
                ignore_children: false,
            }],
        }
    }

    fn parent(&mut self) -> &mut ElemInfo {
        self.stack.last_mut().expect("no parent ElemInfo")
    }

    fn write_escaped(&mut self, text: &str, attr_mode: bool) -> io::Result<()> {
        for c in text.chars() {
            match c {
                '&' => self.writer.write_all(b"&amp;")?,
                '\u{00A0}' => self.writer.write_all(b"&nbsp;")?,
                '"' if attr_mode => self.writer.write_all(b"&quot;")?,
                '<' if !attr_mode => self.writer.write_all(b"&lt;")?,
                '>' if !attr_mode => self.writer.write_all(b"&gt;")?,
                c => write!(self.writer, "{c}")?,
            }
        }
        Ok(())
    }
}

impl<Wr: Write> Serializer for HtmlSerializer<Wr> {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        let html_name = if name.ns == crate::interface::Namespace::Html {
            Some(name.local.clone())
        } else {
            None
        };

        if self.parent().ignore_children {
            self.stack.push(ElemInfo {
                html_name,
                ignore_children: true,
            });
            return Ok(());
        }

        write!(self.writer, "<{}", name.local)?;
        for (attr_name, value) in attrs {
            write!(self.writer, " ")?;
            if attr_name.ns == crate::interface::Namespace::None {
                write!(self.writer, "{}", attr_name.local)?;
            } else {
                write!(self.writer, "{}:{}", attr_name.ns.uri(), attr_name.local)?;
            }
            write!(self.writer, "=\"")?;
            self.write_escaped(value, true)?;
            write!(self.writer, "\"")?;
        }
        write!(self.writer, ">")?;

        let ignore_children = name.ns == crate::interface::Namespace::Html
            && matches!(
                name.local.as_str(),
                "area" | "base" | "basefont" | "bgsound" | "br" | "col" | "embed" | "frame"
                    | "hr" | "img" | "input" | "keygen" | "link" | "meta" | "param" | "source"
                    | "track" | "wbr"
            );

        self.stack.push(ElemInfo {
            html_name,
            ignore_children,
        });

        Ok(())
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        let info = self.stack.pop().expect("no ElemInfo");
        if info.ignore_children {
            return Ok(());
        }
        write!(self.writer, "</{}>", name.local)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let escape = !matches!(
            self.stack.last().and_then(|i| i.html_name.as_ref()).map(|n| n.as_str()),
            Some("style") | Some("script") | Some("xmp") | Some("iframe") | Some("noembed")
                | Some("noframes") | Some("plaintext")
        ) && !(self
            .stack
            .last()
            .and_then(|i| i.html_name.as_ref())
            .map(|n| n.as_str())
            == Some("noscript")
            && self.opts.scripting_enabled);

        if escape {
            self.write_escaped(text, false)
        } else {
            self.writer.write_all(text.as_bytes())
        }
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "<!--{text}-->")
    }

    fn write_doctype(&mut self, name: &str, _public_id: &str, _system_id: &str) -> io::Result<()> {
        write!(self.writer, "<!DOCTYPE {name}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{LocalName, Namespace};

    struct FakeNode;

    impl Serialize for FakeNode {
        fn serialize<S: Serializer>(
            &self,
            serializer: &mut S,
            _scope: TraversalScope,
        ) -> io::Result<()> {
            serializer.start_elem(QualName::html("br"), std::iter::empty())?;
            serializer.end_elem(QualName::html("br"))
        }
    }

    #[test]
    fn void_element_has_no_end_tag() {
        let mut out = Vec::new();
        serialize(&mut out, &FakeNode, SerializeOpts::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<br>");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut out = Vec::new();
        let mut ser = HtmlSerializer::new(&mut out, SerializeOpts::default());
        let attrs = vec![(QualName::new(None, Namespace::None, LocalName::new("title")), "a\"b")];
        ser.start_elem(
            QualName::html("span"),
            attrs.iter().map(|(n, v)| (n, *v)),
        )
        .unwrap();
        ser.end_elem(QualName::html("span")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<span title=\"a&quot;b\"></span>"
        );
    }
}
