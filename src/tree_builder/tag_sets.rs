// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Named tag sets used by scope tests, the adoption agency, and implied
//! end-tag generation.
//!
//! The upstream tree builder builds these with a `declare_tag_set!` macro
//! over interned atoms; without that interning layer a plain `fn(ExpandedName)
//! -> bool` over string literals reads the same at every call site and
//! costs nothing extra at the small sizes these sets have.

use crate::ExpandedName;
use crate::Namespace::{Html, MathMl, Svg};

macro_rules! html_set {
    ($name:ident = $($tag:literal)|+) => {
        pub(crate) fn $name(name: ExpandedName) -> bool {
            *name.ns == Html && matches!(name.local.as_str(), $($tag)|+)
        }
    };
}

/// <https://html.spec.whatwg.org/multipage/#special>
pub(crate) fn special_tag(name: ExpandedName) -> bool {
    if *name.ns == Html {
        matches!(
            name.local.as_str(),
            "address" | "applet" | "area" | "article" | "aside" | "base" | "basefont"
                | "bgsound" | "blockquote" | "body" | "br" | "button" | "caption" | "center"
                | "col" | "colgroup" | "dd" | "details" | "dir" | "div" | "dl" | "dt" | "embed"
                | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "frame"
                | "frameset" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "header"
                | "hgroup" | "hr" | "html" | "iframe" | "img" | "input" | "keygen" | "li"
                | "link" | "listing" | "main" | "marquee" | "menu" | "meta" | "nav" | "noembed"
                | "noframes" | "noscript" | "object" | "ol" | "optgroup" | "option" | "p"
                | "param" | "plaintext" | "pre" | "script" | "search" | "section" | "select"
                | "source" | "style" | "summary" | "table" | "tbody" | "td" | "template"
                | "textarea" | "tfoot" | "th" | "thead" | "title" | "tr" | "track" | "ul"
                | "wbr" | "xmp"
        )
    } else if *name.ns == MathMl {
        matches!(name.local.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
    } else if *name.ns == Svg {
        matches!(name.local.as_str(), "foreignObject" | "desc" | "title")
    } else {
        false
    }
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-the-specific-scope>
/// base list shared by every scope flavor.
fn scope_base(name: ExpandedName) -> bool {
    if *name.ns == Html {
        matches!(
            name.local.as_str(),
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                | "template"
        )
    } else if *name.ns == MathMl {
        matches!(name.local.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
    } else if *name.ns == Svg {
        matches!(name.local.as_str(), "foreignObject" | "desc" | "title")
    } else {
        false
    }
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-scope>
pub(crate) fn default_scope(name: ExpandedName) -> bool {
    scope_base(name)
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-list-item-scope>
pub(crate) fn list_item_scope(name: ExpandedName) -> bool {
    scope_base(name) || (*name.ns == Html && matches!(name.local.as_str(), "ol" | "ul"))
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-button-scope>
pub(crate) fn button_scope(name: ExpandedName) -> bool {
    scope_base(name) || (*name.ns == Html && name.local.as_str() == "button")
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-table-scope>
pub(crate) fn table_scope(name: ExpandedName) -> bool {
    *name.ns == Html && matches!(name.local.as_str(), "html" | "table" | "template")
}

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-select-scope>
/// (everything *except* optgroup/option stops the walk)
pub(crate) fn select_scope(name: ExpandedName) -> bool {
    !(*name.ns == Html && matches!(name.local.as_str(), "optgroup" | "option"))
}

/// <https://html.spec.whatwg.org/multipage/#generate-implied-end-tags>
/// the default set, used whenever the algorithm doesn't name an exception.
pub(crate) fn cursory_implied_end(name: ExpandedName) -> bool {
    *name.ns == Html
        && matches!(
            name.local.as_str(),
            "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
        )
}

/// The extended set used at EOF and when closing `<body>`/popping the
/// whole stack: implied-end-tags plus the table/body/html structural
/// elements that are allowed to still be open without signalling an error.
pub(crate) fn thorough_implied_end(name: ExpandedName) -> bool {
    cursory_implied_end(name)
        || (*name.ns == Html
            && matches!(
                name.local.as_str(),
                "caption" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
                    | "thead" | "tr" | "body" | "html"
            ))
}

html_set!(td_th = "td" | "th");
html_set!(heading_tag = "h1" | "h2" | "h3" | "h4" | "h5" | "h6");
html_set!(table_body_context = "tbody" | "tfoot" | "thead");
html_set!(table_row_context = "tbody" | "tfoot" | "thead" | "tr");
html_set!(foster_target = "table" | "tbody" | "tfoot" | "thead" | "tr");
html_set!(table_outer = "table" | "tbody" | "tfoot" | "thead" | "tr");

/// <https://html.spec.whatwg.org/multipage/#mathml-text-integration-point>
pub(crate) fn mathml_text_integration_point(name: ExpandedName) -> bool {
    *name.ns == MathMl && matches!(name.local.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// <https://html.spec.whatwg.org/multipage/#html-integration-point>
/// (the SVG half; the MathML `annotation-xml` half needs the live
/// "is this an HTML integration point" flag from the tree sink, so it's
/// checked separately in `is_foreign`)
pub(crate) fn svg_html_integration_point(name: ExpandedName) -> bool {
    *name.ns == Svg && matches!(name.local.as_str(), "foreignObject" | "desc" | "title")
}

/// <https://html.spec.whatwg.org/multipage/#parsing-main-inforeign>
/// the "breakout" set: an HTML start tag with one of these names, while in
/// foreign content, pops back out to HTML parsing.
pub(crate) fn foreign_breakout(name: &str) -> bool {
    matches!(
        name,
        "b" | "big"
            | "blockquote"
            | "body"
            | "br"
            | "center"
            | "code"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "em"
            | "embed"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "hr"
            | "i"
            | "img"
            | "li"
            | "listing"
            | "menu"
            | "meta"
            | "nobr"
            | "ol"
            | "p"
            | "pre"
            | "ruby"
            | "s"
            | "small"
            | "span"
            | "strong"
            | "strike"
            | "sub"
            | "sup"
            | "table"
            | "tt"
            | "u"
            | "ul"
            | "var"
    )
}
