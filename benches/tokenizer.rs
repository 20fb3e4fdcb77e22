// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tokenizer throughput: repeat a sample document out to a target size,
//! chop it into ~1KB chunks (simulating a network read), and feed it
//! through the tokenizer with a sink that discards tokens after forcing
//! the optimizer to keep them around.
//!
//! No `data/bench/*.html` corpus is vendored into this crate, so the
//! samples below are inline instead of read from disk.

use std::cell::Cell;
use std::hint::black_box;

use conform_html5::tendril::StrTendril;
use conform_html5::tokenizer::{
    BufferQueue, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const LIPSUM: &str = include_str!("data/lipsum.html");
const STRONG: &str = include_str!("data/strong.html");

struct Sink {
    count: Cell<u64>,
}

impl TokenSink for Sink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        black_box(&token);
        self.count.set(self.count.get() + 1);
        TokenSinkResult::Continue
    }
}

/// Repeat `sample` out to at least `target_len` bytes, then split it into
/// ~1024-byte tendrils the way a chunked network read would arrive.
fn chunks_of(sample: &str, target_len: usize) -> Vec<StrTendril> {
    let mut repeated = String::with_capacity(target_len + sample.len());
    while repeated.len() < target_len {
        repeated.push_str(sample);
    }
    repeated.truncate(target_len);

    let mut chunks = Vec::new();
    let mut rest = repeated.as_str();
    while !rest.is_empty() {
        let mut boundary = rest.len().min(1024);
        while !rest.is_char_boundary(boundary) {
            boundary -= 1;
        }
        let (chunk, remainder) = rest.split_at(boundary);
        chunks.push(StrTendril::from(chunk));
        rest = remainder;
    }
    chunks
}

fn tokenize(chunks: &[StrTendril], opts: TokenizerOpts) -> u64 {
    let sink = Sink { count: Cell::new(0) };
    let tok = Tokenizer::new(sink, opts);
    let buffer = BufferQueue::default();
    for chunk in chunks {
        buffer.push_back(chunk.clone());
        let _ = tok.feed(&buffer);
    }
    let _ = tok.feed(&buffer);
    tok.end();
    tok.sink.count.get()
}

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for (name, sample) in [("lipsum.html", LIPSUM), ("strong.html", STRONG)] {
        for size in [1024usize, 1024 * 1024] {
            let chunks = chunks_of(sample, size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &chunks,
                |b, chunks| {
                    b.iter(|| black_box(tokenize(chunks, TokenizerOpts::default())));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
