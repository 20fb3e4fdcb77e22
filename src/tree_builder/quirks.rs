// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Quirks-mode derivation from a `<!DOCTYPE>`.
//!
//! <https://html.spec.whatwg.org/multipage/#the-initial-insertion-mode>

use crate::interface::QuirksMode::{self, LimitedQuirks, NoQuirks, Quirks};
use crate::tokenizer::Doctype;

// All lowercase; matches are ASCII case-insensitive at the call site.
static QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

static QUIRKY_PUBLIC_MATCHES: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

static QUIRKY_SYSTEM_MATCHES: &[&str] =
    &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

static LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

static HTML4_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

fn opt_eq(s: &Option<crate::tendril::StrTendril>, text: &str) -> bool {
    match s {
        Some(s) => s.eq_ignore_ascii_case(text),
        None => text.is_empty(),
    }
}

fn contains(haystack: &[&str], needle: &str) -> bool {
    haystack.iter().any(|&x| x.eq_ignore_ascii_case(needle))
}

fn contains_prefix(haystack: &[&str], needle: &str) -> bool {
    haystack.iter().any(|&x| {
        needle.len() >= x.len() && needle[..x.len()].eq_ignore_ascii_case(x)
    })
}

/// <https://html.spec.whatwg.org/multipage/#parse-error-unexpected-doctype>
/// Whether a non-standard `<!DOCTYPE>` should be flagged as a parse error
/// ("Bad DOCTYPE"), independent of whether it also sets quirks mode.
fn is_doctype_ok(doctype: &Doctype) -> bool {
    let has_system_id = doctype.system_id.is_some();

    if !opt_eq(&doctype.name, "html") {
        false
    } else if doctype.public_id.is_none() {
        !has_system_id || opt_eq(&doctype.system_id, "about:legacy-compat")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD HTML 4.0//EN") {
        !has_system_id || opt_eq(&doctype.system_id, "http://www.w3.org/TR/REC-html40/strict.dtd")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD HTML 4.01//EN") {
        !has_system_id || opt_eq(&doctype.system_id, "http://www.w3.org/TR/html4/strict.dtd")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD XHTML 1.0 Strict//EN") {
        opt_eq(
            &doctype.system_id,
            "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
        )
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD XHTML 1.1//EN") {
        opt_eq(&doctype.system_id, "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd")
    } else {
        false
    }
}

/// Returns `(is a parse error, resulting quirks mode)`.
pub(crate) fn doctype_error_and_quirks(
    doctype: &Doctype,
    iframe_srcdoc: bool,
) -> (bool, QuirksMode) {
    let err = !is_doctype_ok(doctype);

    let public = doctype.public_id.as_ref().map(|s| s.to_string());
    let system = doctype.system_id.as_ref().map(|s| s.to_string());

    let quirk = if doctype.force_quirks {
        Quirks
    } else if !opt_eq(&doctype.name, "html") {
        Quirks
    } else if iframe_srcdoc {
        NoQuirks
    } else if public.as_deref().is_some_and(|p| contains(QUIRKY_PUBLIC_MATCHES, p)) {
        Quirks
    } else if system.as_deref().is_some_and(|s| contains(QUIRKY_SYSTEM_MATCHES, s)) {
        Quirks
    } else if public
        .as_deref()
        .is_some_and(|p| contains_prefix(QUIRKY_PUBLIC_PREFIXES, p))
    {
        Quirks
    } else if public
        .as_deref()
        .is_some_and(|p| contains_prefix(LIMITED_QUIRKY_PUBLIC_PREFIXES, p))
    {
        LimitedQuirks
    } else if public
        .as_deref()
        .is_some_and(|p| contains_prefix(HTML4_PUBLIC_PREFIXES, p))
    {
        if system.is_none() {
            Quirks
        } else {
            LimitedQuirks
        }
    } else {
        NoQuirks
    };

    (err, quirk)
}
