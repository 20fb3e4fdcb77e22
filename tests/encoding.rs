// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs the `html5lib-tests` encoding fixtures (`.dat` files under
//! `encoding/`) against [`conform_html5::encoding::sniff`].
//!
//! Each record is a `#data`/`#encoding` pair: `#data` holds the raw
//! document bytes, `#encoding` the canonical encoding name `sniff` should
//! land on. Fixture directory: `<manifest dir>/html5lib-tests/encoding/*.dat`.
//! Not vendored into this crate; when absent, this test passes trivially.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, mem};

use conform_html5::encoding::sniff;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("html5lib-tests")
        .join("encoding")
}

/// Split a `.dat` file into its `#data`/`#encoding` records. Unlike the
/// tree-construction `.dat` format, fields here hold a single line, not a
/// multi-line block, but records are still separated by a `#data` line.
fn parse_records(contents: &str) -> Vec<HashMap<String, String>> {
    let mut records = vec![];
    let mut record = HashMap::new();
    let mut key: Option<String> = None;
    let mut val = String::new();

    macro_rules! finish_val {
        () => {
            if let Some(k) = key.take() {
                record.insert(k, mem::take(&mut val).trim_end_matches('\n').to_owned());
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

    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix('#') {
            finish_val!();
            if line == "#data" {
                finish_record!();
            }
            key = Some(rest.to_owned());
        } else {
            val.push_str(line);
            val.push('\n');
        }
    }
    finish_val!();
    finish_record!();
    records
}

#[test]
fn sniffs_declared_encoding() {
    let dir = fixture_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => {
            println!("encoding: 0 fixtures found (no {} checkout)", dir.display());
            return;
        },
    };

    let mut run = 0usize;
    for entry in entries {
        let path = entry.expect("readdir entry").path();
        if path.extension().and_then(|e| e.to_str()) != Some("dat") {
            continue;
        }
        let contents = fs::read_to_string(&path).expect("read fixture");
        let filename = path.file_name().unwrap().to_str().unwrap().to_owned();
        for (i, record) in parse_records(&contents).into_iter().enumerate() {
            let (Some(data), Some(expected)) = (record.get("data"), record.get("encoding")) else {
                continue;
            };
            let sniffed = sniff(data.as_bytes(), None);
            let got = sniffed.encoding.name().to_ascii_lowercase();
            let expected = expected.trim().to_ascii_lowercase();
            assert_eq!(
                got, expected,
                "encoding: {filename}#{i}: expected {expected}, got {got}"
            );
            run += 1;
        }
    }
    println!("encoding: {run} fixtures passed");
}
