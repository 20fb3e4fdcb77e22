// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs the `html5lib-tests` tokenizer fixtures (`.test` JSON files)
//! against [`conform_html5::tokenizer`]. `harness = false`: a plain
//! `fn main()` that walks the fixture directory and panics with a
//! diffable message on the first mismatch.
//!
//! Fixture directory: `<manifest dir>/html5lib-tests/tokenizer/*.test`.
//! Not vendored into this crate; when absent, this prints a zero count
//! and exits successfully.

use std::cell::RefCell;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::{char, env};

use conform_html5::tendril::{StrTendril, TendrilSink};
use conform_html5::tokenizer::states::{CdataSection, Data, Plaintext, RawData};
use conform_html5::tokenizer::{
    BufferQueue, CharacterTokens, CommentToken, Doctype, DoctypeToken, EOFToken, EndTag,
    NullCharacterToken, ParseError, StartTag, Tag, TagToken, Token, TokenSink, TokenSinkResult,
    Tokenizer, TokenizerOpts,
};
use conform_html5::{Attribute, LocalName, Namespace, QualName};
use serde_json::{Map, Value};

/// Tests that hang forever at full combinatorial generality; cap how many
/// of the `splits(...)` chunkings we actually run per fixture.
const MAX_SPLITS: usize = 64;

fn splits(s: &str, n: usize) -> Vec<Vec<StrTendril>> {
    if n == 1 {
        return vec![vec![StrTendril::from(s)]];
    }
    let mut out = vec![];
    for p in s.char_indices().map(|(n, _)| n).chain(Some(s.len())) {
        let y = &s[p..];
        for mut x in splits(&s[..p], n - 1) {
            x.push(StrTendril::from(y));
            out.push(x);
        }
    }
    out.extend(splits(s, n - 1));
    out.truncate(MAX_SPLITS);
    out
}

struct TokenLogger {
    tokens: RefCell<Vec<Token>>,
    current_str: RefCell<StrTendril>,
    exact_errors: bool,
}

impl TokenLogger {
    fn new(exact_errors: bool) -> TokenLogger {
        TokenLogger {
            tokens: RefCell::new(vec![]),
            current_str: RefCell::new(StrTendril::new()),
            exact_errors,
        }
    }

    fn push(&self, token: Token) {
        self.finish_str();
        self.tokens.borrow_mut().push(token);
    }

    fn finish_str(&self) {
        if !self.current_str.borrow().is_empty() {
            let s = self.current_str.replace(StrTendril::new());
            self.tokens.borrow_mut().push(CharacterTokens(s));
        }
    }

    fn get_tokens(self) -> Vec<Token> {
        self.finish_str();
        self.tokens.into_inner()
    }
}

impl TokenSink for TokenLogger {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            CharacterTokens(b) => self.current_str.borrow_mut().push_tendril(&b),
            NullCharacterToken => self.current_str.borrow_mut().push_char('\0'),
            ParseError(_) => {
                if self.exact_errors {
                    self.push(ParseError("".into()));
                }
            },
            TagToken(mut t) => {
                match t.kind {
                    EndTag => {
                        t.self_closing = false;
                        t.attrs = vec![];
                    },
                    _ => t.attrs.sort_by(|a1, a2| a1.name.cmp(&a2.name)),
                }
                self.push(TagToken(t));
            },
            EOFToken => {},
            _ => self.push(token),
        }
        TokenSinkResult::Continue
    }
}

fn tokenize(input: Vec<StrTendril>, opts: TokenizerOpts) -> Vec<Token> {
    let sink = TokenLogger::new(opts.exact_errors);
    let tok = Tokenizer::new(sink, opts);
    let buffer = BufferQueue::default();
    for chunk in input {
        buffer.push_back(chunk);
        let _ = tok.feed(&buffer);
    }
    let _ = tok.feed(&buffer);
    tok.end();
    tok.sink.get_tokens()
}

trait JsonExt {
    fn get_str(&self) -> String;
    fn get_tendril(&self) -> StrTendril;
    fn get_nullable_tendril(&self) -> Option<StrTendril>;
    fn get_bool(&self) -> bool;
    fn get_obj(&self) -> &Map<String, Value>;
    fn get_list(&self) -> &Vec<Value>;
    fn find(&self, key: &str) -> &Value;
}

impl JsonExt for Value {
    fn get_str(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            _ => panic!("not a string: {self:?}"),
        }
    }

    fn get_tendril(&self) -> StrTendril {
        StrTendril::from(self.get_str().as_str())
    }

    fn get_nullable_tendril(&self) -> Option<StrTendril> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(StrTendril::from(s.as_str())),
            _ => panic!("not a nullable string: {self:?}"),
        }
    }

    fn get_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            _ => panic!("not a bool: {self:?}"),
        }
    }

    fn get_obj(&self) -> &Map<String, Value> {
        match self {
            Value::Object(m) => m,
            _ => panic!("not an object: {self:?}"),
        }
    }

    fn get_list(&self) -> &Vec<Value> {
        match self {
            Value::Array(a) => a,
            _ => panic!("not an array: {self:?}"),
        }
    }

    fn find(&self, key: &str) -> &Value {
        self.get_obj().get(key).unwrap_or(&Value::Null)
    }
}

fn json_to_token(js: &Value) -> Token {
    let parts = js.get_list();
    let args: Vec<&Value> = parts[1..].iter().collect();
    match parts[0].get_str().as_str() {
        "DOCTYPE" => DoctypeToken(Doctype {
            name: args[0].get_nullable_tendril(),
            public_id: args[1].get_nullable_tendril(),
            system_id: args[2].get_nullable_tendril(),
            force_quirks: !args[3].get_bool(),
        }),
        "StartTag" => TagToken(Tag {
            kind: StartTag,
            name: LocalName::from(args[0].get_str().as_str()),
            attrs: args[1]
                .get_obj()
                .iter()
                .map(|(k, v)| Attribute {
                    name: QualName::new(None, Namespace::None, LocalName::from(k.as_str())),
                    value: v.get_tendril(),
                })
                .collect(),
            self_closing: args.get(2).map(|b| b.get_bool()).unwrap_or(false),
        }),
        "EndTag" => TagToken(Tag {
            kind: EndTag,
            name: LocalName::from(args[0].get_str().as_str()),
            attrs: vec![],
            self_closing: false,
        }),
        "Comment" => CommentToken(args[0].get_tendril()),
        "Character" => CharacterTokens(args[0].get_tendril()),
        _ => panic!("don't understand token {parts:?}"),
    }
}

fn json_to_tokens(js_tokens: &Value, exact_errors: bool) -> Vec<Token> {
    let sink = TokenLogger::new(exact_errors);
    for tok in js_tokens.get_list() {
        match tok {
            Value::String(s) if s == "ParseError" => {
                sink.process_token(ParseError("".into()), 0);
            },
            _ => {
                sink.process_token(json_to_token(tok), 0);
            },
        }
    }
    sink.get_tokens()
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    loop {
        match it.next() {
            None => return Some(out),
            Some('\\') => {
                if it.peek() != Some(&'u') {
                    panic!("can't understand escape in {s:?}");
                }
                let _ = it.next();
                let hex: String = it.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    None => return None,
                    Some(c) => out.push(c),
                }
            },
            Some(c) => out.push(c),
        }
    }
}

fn unescape_json(js: &Value) -> Value {
    match js {
        Value::String(s) => Value::String(unescape(s).unwrap()),
        Value::Array(xs) => Value::Array(xs.iter().map(unescape_json).collect()),
        Value::Object(obj) => {
            let mut new_obj = Map::new();
            for (k, v) in obj {
                new_obj.insert(k.clone(), unescape_json(v));
            }
            Value::Object(new_obj)
        },
        _ => js.clone(),
    }
}

/// Run every variant (initial state × exact-errors flag × input chunking)
/// of one JSON test case. Returns the number of variants run.
fn run_case(filename: &str, js: &Value) -> usize {
    let obj = js.get_obj();
    let mut input = js.find("input").get_str();
    let mut expect = js.find("output").clone();
    let description = js.find("description").get_str();

    if obj.get("doubleEscaped").map(Value::get_bool).unwrap_or(false) {
        match unescape(&input) {
            None => return 0,
            Some(i) => input = i,
        }
        expect = unescape_json(&expect);
    }

    let start_tag = obj.get("lastStartTag").map(Value::get_str);
    let state_overrides: Vec<Option<conform_html5::tokenizer::states::State>> =
        match obj.get("initialStates") {
            Some(Value::Array(xs)) => xs
                .iter()
                .map(|s| {
                    Some(match s.get_str().as_str() {
                        "PLAINTEXT state" => Plaintext,
                        "RAWTEXT state" => RawData(conform_html5::tokenizer::states::Rawtext),
                        "RCDATA state" => RawData(conform_html5::tokenizer::states::Rcdata),
                        "Script data state" => {
                            RawData(conform_html5::tokenizer::states::ScriptData)
                        },
                        "CDATA section state" => CdataSection,
                        "Data state" => Data,
                        other => panic!("don't know state {other}"),
                    })
                })
                .collect(),
            None => vec![None],
            _ => panic!("don't understand initialStates value"),
        };

    let mut run = 0;
    for state in state_overrides {
        for exact_errors in [false, true] {
            let opts = TokenizerOpts {
                exact_errors,
                initial_state: state,
                last_start_tag_name: start_tag.clone(),
                discard_bom: false,
                ..Default::default()
            };
            let expect_toks = json_to_tokens(&expect, exact_errors);
            for chunked_input in splits(&input, 3) {
                let output = tokenize(chunked_input.clone(), opts.clone());
                if output != expect_toks {
                    panic!(
                        "tokenizer: {filename}: {description}\ninput: {chunked_input:?}\ngot: {output:?}\nexpected: {expect_toks:?}"
                    );
                }
            }
            run += 1;
        }
    }
    run
}

fn main() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("html5lib-tests")
        .join("tokenizer");
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => {
            println!("tokenizer: 0 fixtures found (no {} checkout)", dir.display());
            return;
        },
    };

    let mut run = 0usize;
    for entry in entries {
        let path = entry.expect("readdir entry").path();
        if path.extension() != Some(OsStr::new("test")) {
            continue;
        }
        let contents = fs::read_to_string(&path).expect("read fixture");
        let js: Value = serde_json::from_str(&contents).expect("json parse error");
        let filename = path.file_name().unwrap().to_str().unwrap().to_owned();
        if let Some(Value::Array(cases)) = js.get_obj().get("tests") {
            for case in cases {
                run += run_case(&filename, case);
            }
        }
    }

    println!("tokenizer: {run} fixture variants passed");
    if env::var_os("CONFORM_HTML5_REQUIRE_FIXTURES").is_some() && run == 0 {
        eprintln!("tokenizer: no fixtures ran and CONFORM_HTML5_REQUIRE_FIXTURES is set");
        std::process::exit(1);
    }
}
