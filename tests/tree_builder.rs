// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs the `html5lib-tests` tree-construction fixtures (`.dat` files)
//! against [`conform_html5::driver`]. `harness = false`: this is a plain
//! `fn main()`, not `#[test]` functions, so one slow fixture directory
//! doesn't block `cargo test --lib`.
//!
//! Fixture directory: `<manifest dir>/html5lib-tests/tree-construction/*.dat`.
//! Not vendored into this crate; when absent, this prints a zero count
//! and exits successfully rather than failing the build.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::{env, fs, io, mem, process};

use conform_html5::driver::{parse_document, parse_fragment, ParseOpts};
use conform_html5::rcdom::RcDom;
use conform_html5::serialize::{serialize_test_format, serialize_test_format_fragment};
use conform_html5::tendril::stream::TendrilSink;
use conform_html5::tendril::StrTendril;
use conform_html5::{LocalName, Namespace, QualName};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("html5lib-tests")
        .join("tree-construction")
}

/// Split a `.dat` file into its `#data`/`#errors`/`#document`/etc. records.
fn parse_records<It: Iterator<Item = String>>(lines: It) -> Vec<HashMap<String, String>> {
    let mut records = vec![];
    let mut record = HashMap::new();
    let mut key: Option<String> = None;
    let mut val = String::new();

    macro_rules! finish_val {
        () => {
            if let Some(k) = key.take() {
                record.insert(k, mem::take(&mut val));
            }
        };
    }
    macro_rules! finish_record {
        () => {
            if !record.is_empty() {
                records.push(mem::take(&mut record));
            }
        };
    }

    for line in lines {
        if let Some(rest) = line.strip_prefix('#') {
            finish_val!();
            if line == "#data" {
                finish_record!();
            }
            key = Some(rest.to_owned());
        } else {
            val.push_str(&line);
            val.push('\n');
        }
    }
    finish_val!();
    finish_record!();
    records
}

fn context_name(context: &str) -> QualName {
    if let Some(name) = context.strip_prefix("svg ") {
        QualName::new(None, Namespace::Svg, LocalName::from(name))
    } else if let Some(name) = context.strip_prefix("math ") {
        QualName::new(None, Namespace::MathMl, LocalName::from(name))
    } else {
        QualName::html(context)
    }
}

/// Run one `.dat` record, panicking with a diffable message on mismatch.
fn run_record(filename: &str, index: usize, fields: &HashMap<String, String>) -> bool {
    if fields.contains_key("script-on") {
        return false;
    }

    let mut data = fields.get("data").cloned().unwrap_or_default();
    data.pop(); // drop the trailing newline `parse_records` added
    let expected = fields
        .get("document")
        .map(|s| s.trim_end_matches('\n').to_owned())
        .unwrap_or_default();
    let context = fields
        .get("document-fragment")
        .map(|s| context_name(s.trim_end_matches('\n')));

    let input = StrTendril::from(data.as_str());
    let result = match context {
        None => {
            let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);
            serialize_test_format(&dom.document)
        },
        Some(context_name) => {
            let dom = parse_fragment(
                RcDom::default(),
                ParseOpts::default(),
                context_name,
                vec![],
                None,
            )
            .one(input);
            let root = dom.document.children.borrow()[0].clone();
            serialize_test_format_fragment(&root)
        },
    };
    let result = result.trim_end_matches('\n');

    if result != expected {
        panic!(
            "tree_builder: {filename}#{index}\n--- input ---\n{data}\n--- got ---\n{result}\n--- expected ---\n{expected}\n"
        );
    }
    true
}

fn main() {
    let dir = fixture_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => {
            println!("tree_builder: 0 fixtures found (no {} checkout)", dir.display());
            return;
        },
    };

    let mut run = 0usize;
    let mut skipped = 0usize;
    for entry in entries {
        let path = entry.expect("readdir entry").path();
        if path.extension() != Some(OsStr::new("dat")) {
            continue;
        }
        let file = fs::File::open(&path).expect("open fixture");
        let lines = io::BufReader::new(file)
            .lines()
            .map(|l| l.expect("read fixture line"));
        let filename = path.file_name().unwrap().to_str().unwrap().to_owned();
        for (i, record) in parse_records(lines).into_iter().enumerate() {
            if run_record(&filename, i, &record) {
                run += 1;
            } else {
                skipped += 1;
            }
        }
    }

    println!("tree_builder: {run} fixtures passed, {skipped} skipped");
    if env::var_os("CONFORM_HTML5_REQUIRE_FIXTURES").is_some() && run == 0 {
        eprintln!("tree_builder: no fixtures ran and CONFORM_HTML5_REQUIRE_FIXTURES is set");
        process::exit(1);
    }
}
