// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The closed taxonomy of parse errors and the strict-mode failure they
//! can be promoted to.
//!
//! Individual `tokenizer`/`tree_builder` call sites still pass a free-form
//! `Cow<'static, str>` message (matching upstream); this module is the
//! stable, machine-checkable code that message is filed under, plus the
//! position it occurred at.

use std::borrow::Cow;
use std::fmt;

/// A stable, kebab-case parse-error code. This list is not exhaustive of
/// every branch the spec names, but covers the codes this crate's
/// tokenizer and tree builder actually emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    UnexpectedNullCharacter,
    UnexpectedQuestionMarkInsteadOfTagName,
    EofBeforeTagName,
    InvalidFirstCharacterOfTagName,
    MissingEndTagName,
    EofInTag,
    EofInScriptHtmlCommentLikeText,
    UnexpectedEqualsSignBeforeAttributeName,
    UnexpectedCharacterInAttributeName,
    MissingAttributeValue,
    UnexpectedCharacterInUnquotedAttributeValue,
    MissingWhitespaceBetweenAttributes,
    UnexpectedSolidusInTag,
    CdataInHtmlContent,
    IncorrectlyOpenedComment,
    AbruptClosingOfEmptyComment,
    EofInComment,
    NestedComment,
    IncorrectlyClosedComment,
    EofInDoctype,
    MissingWhitespaceBeforeDoctypeName,
    MissingDoctypeName,
    InvalidCharacterSequenceAfterDoctypeName,
    MissingWhitespaceAfterDoctypePublicKeyword,
    MissingDoctypePublicIdentifier,
    MissingQuoteBeforeDoctypePublicIdentifier,
    AbruptDoctypePublicIdentifier,
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    MissingWhitespaceAfterDoctypeSystemKeyword,
    MissingDoctypeSystemIdentifier,
    MissingQuoteBeforeDoctypeSystemIdentifier,
    AbruptDoctypeSystemIdentifier,
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    EofInCdata,
    CharacterReferenceOutsideUnicodeRange,
    ControlCharacterReference,
    NoncharacterCharacterReference,
    NullCharacterReference,
    SurrogateCharacterReference,
    MissingSemicolonAfterCharacterReference,
    UnknownNamedCharacterReference,
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    DuplicateAttribute,
    UnexpectedDoctype,
    UnexpectedStartTag,
    UnexpectedEndTag,
    UnexpectedTokenInForeignContent,
    InvalidCodepointInForeignContent,
    AdoptionAgency1_3,
    AdoptionAgency4_4,
    UnclosedElementsAtEof,
    /// An error code the builder/tokenizer couldn't map onto a specific
    /// variant above; `message` carries the freeform description.
    Other,
}

impl ErrorCode {
    /// The stable kebab-case identifier, independent of the `Display` of
    /// the human-readable message carried alongside it.
    pub fn as_str(&self) -> &'static str {
        use ErrorCode::*;
        match *self {
            UnexpectedNullCharacter => "unexpected-null-character",
            UnexpectedQuestionMarkInsteadOfTagName => "unexpected-question-mark-instead-of-tag-name",
            EofBeforeTagName => "eof-before-tag-name",
            InvalidFirstCharacterOfTagName => "invalid-first-character-of-tag-name",
            MissingEndTagName => "missing-end-tag-name",
            EofInTag => "eof-in-tag",
            EofInScriptHtmlCommentLikeText => "eof-in-script-html-comment-like-text",
            UnexpectedEqualsSignBeforeAttributeName => "unexpected-equals-sign-before-attribute-name",
            UnexpectedCharacterInAttributeName => "unexpected-character-in-attribute-name",
            MissingAttributeValue => "missing-attribute-value",
            UnexpectedCharacterInUnquotedAttributeValue => {
                "unexpected-character-in-unquoted-attribute-value"
            },
            MissingWhitespaceBetweenAttributes => "missing-whitespace-between-attributes",
            UnexpectedSolidusInTag => "unexpected-solidus-in-tag",
            CdataInHtmlContent => "cdata-in-html-content",
            IncorrectlyOpenedComment => "incorrectly-opened-comment",
            AbruptClosingOfEmptyComment => "abrupt-closing-of-empty-comment",
            EofInComment => "eof-in-comment",
            NestedComment => "nested-comment",
            IncorrectlyClosedComment => "incorrectly-closed-comment",
            EofInDoctype => "eof-in-doctype",
            MissingWhitespaceBeforeDoctypeName => "missing-whitespace-before-doctype-name",
            MissingDoctypeName => "missing-doctype-name",
            InvalidCharacterSequenceAfterDoctypeName => {
                "invalid-character-sequence-after-doctype-name"
            },
            MissingWhitespaceAfterDoctypePublicKeyword => {
                "missing-whitespace-after-doctype-public-keyword"
            },
            MissingDoctypePublicIdentifier => "missing-doctype-public-identifier",
            MissingQuoteBeforeDoctypePublicIdentifier => {
                "missing-quote-before-doctype-public-identifier"
            },
            AbruptDoctypePublicIdentifier => "abrupt-doctype-public-identifier",
            MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers => {
                "missing-whitespace-between-doctype-public-and-system-identifiers"
            },
            MissingWhitespaceAfterDoctypeSystemKeyword => {
                "missing-whitespace-after-doctype-system-keyword"
            },
            MissingDoctypeSystemIdentifier => "missing-doctype-system-identifier",
            MissingQuoteBeforeDoctypeSystemIdentifier => {
                "missing-quote-before-doctype-system-identifier"
            },
            AbruptDoctypeSystemIdentifier => "abrupt-doctype-system-identifier",
            UnexpectedCharacterAfterDoctypeSystemIdentifier => {
                "unexpected-character-after-doctype-system-identifier"
            },
            EofInCdata => "eof-in-cdata",
            CharacterReferenceOutsideUnicodeRange => "character-reference-outside-unicode-range",
            ControlCharacterReference => "control-character-reference",
            NoncharacterCharacterReference => "noncharacter-character-reference",
            NullCharacterReference => "null-character-reference",
            SurrogateCharacterReference => "surrogate-character-reference",
            MissingSemicolonAfterCharacterReference => {
                "missing-semicolon-after-character-reference"
            },
            UnknownNamedCharacterReference => "unknown-named-character-reference",
            NonVoidHtmlElementStartTagWithTrailingSolidus => {
                "non-void-html-element-start-tag-with-trailing-solidus"
            },
            DuplicateAttribute => "duplicate-attribute",
            UnexpectedDoctype => "unexpected-doctype",
            UnexpectedStartTag => "unexpected-start-tag",
            UnexpectedEndTag => "unexpected-end-tag",
            UnexpectedTokenInForeignContent => "unexpected-token-in-foreign-content",
            InvalidCodepointInForeignContent => "invalid-codepoint-in-foreign-content",
            AdoptionAgency1_3 => "adoption-agency-1.3",
            AdoptionAgency4_4 => "adoption-agency-4.4",
            UnclosedElementsAtEof => "unclosed-elements-at-eof",
            Other => "generic-parse-error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded parse error: a stable code, the free-form message the
/// call site produced (often more specific, e.g. including the offending
/// byte value), and the position it was detected at, if tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: Cow<'static, str>,
    pub line: Option<u64>,
    pub column: Option<u64>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: Cow<'static, str>) -> ParseError {
        ParseError {
            code,
            message,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: u64) -> ParseError {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {}: {}", self.code, line, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Returned by a `strict` parse that hit a recorded error.
///
/// Carries the *first* error collected. Parsing itself is still a
/// best-effort, total parse internally -- strictness only changes what
/// the caller sees once tokenization of the current input has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictModeError {
    pub first_error: ParseError,
    pub error_count: usize,
}

impl fmt::Display for StrictModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse failed in strict mode: {} ({} error(s) total)",
            self.first_error, self.error_count
        )
    }
}

impl std::error::Error for StrictModeError {}
