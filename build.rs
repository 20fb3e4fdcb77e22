// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();

    named_entities_to_phf(
        &Path::new(&manifest_dir).join("data").join("entities.json"),
        &Path::new(&out_dir).join("named_entities.rs"),
    );

    println!("cargo:rerun-if-changed=data/entities.json");
}

/// A struct matching the entries in entities.json.
#[derive(Deserialize, Debug)]
struct CharRef {
    codepoints: Vec<u32>,
    // characters: String,  // present in the file but we don't need it
}

/// Turns the html5lib-format `entities.json` table into a perfect-hash map
/// from entity name (without the leading `&`, with or without the trailing
/// `;`) to its one- or two-codepoint expansion, plus every proper prefix of
/// each key mapped to `(0, 0)` so the tokenizer's longest-match scan can
/// distinguish "still a valid prefix" from "no such reference".
fn named_entities_to_phf(from: &Path, to: &Path) {
    let file = File::open(from).unwrap_or_else(|e| {
        panic!("failed to open {}: {}", from.display(), e);
    });
    let entities: HashMap<String, CharRef> = serde_json::from_reader(file).unwrap();

    let mut entities: HashMap<String, (u32, u32)> = entities
        .iter()
        .map(|(name, char_ref)| {
            assert!(name.starts_with('&'));
            assert!(char_ref.codepoints.len() <= 2);
            (
                name[1..].to_owned(),
                (
                    char_ref.codepoints[0],
                    *char_ref.codepoints.get(1).unwrap_or(&0),
                ),
            )
        })
        .collect();

    // Add every missing prefix of those keys, mapping to NULL characters.
    // A prefix that is itself a full match keeps its real expansion.
    for key in entities.keys().cloned().collect::<Vec<_>>() {
        for n in 1..key.len() {
            entities.entry(key[..n].to_owned()).or_insert((0, 0));
        }
    }
    entities.entry(String::new()).or_insert((0, 0));

    let mut phf_map = phf_codegen::Map::new();
    for (key, value) in &entities {
        phf_map.entry(key.as_str(), format!("{:?}", value));
    }

    let mut out = File::create(to).unwrap();
    writeln!(
        out,
        "/// A map of entity names (with the leading `&` stripped) to their\n\
         /// codepoints. The second codepoint is 0 if the entity expands to a\n\
         /// single character. Names that are a valid *prefix* of a longer\n\
         /// entity name, but not themselves a complete reference, map to\n\
         /// `(0, 0)`.\n\
         pub static NAMED_ENTITIES: phf::Map<&'static str, (u32, u32)> = {};",
        phf_map.build()
    )
    .unwrap();
}
