// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [`BufferQueue`] struct and helper types.
//!
//! This type is designed for the efficient parsing of string data, especially where many
//! significant characters are from the ascii range 0-63. This includes, for example, important
//! characters in html parsing.
//!
//! Good and predictable performance is achieved by avoiding allocation where possible (a.k.a. zero
//! copy).

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::smallcharset::SmallCharSet;
use crate::tendril::StrTendril;

pub use self::SetResult::{FromSet, NotFromSet};

/// Result from [`BufferQueue::pop_except_from`] containing either a character from a
/// [`SmallCharSet`], or a string buffer of characters not from the set.
#[derive(PartialEq, Eq, Debug)]
pub enum SetResult {
    /// A character from the `SmallCharSet`.
    FromSet(char),
    /// A block of text containing no characters from the `SmallCharSet`.
    NotFromSet(StrTendril),
}

/// A queue of owned string buffers, which supports incrementally consuming characters.
///
/// Internally it uses [`VecDeque`] and has the same complexity properties.
///
/// The tokenizer drives itself through a `RefCell`-shared `BufferQueue`, so every
/// mutating method takes `&self` -- mirroring the interior-mutability style the rest
/// of this crate's hot loop uses to avoid threading `&mut` through the dispatcher.
pub struct BufferQueue {
    /// Buffers to process.
    buffers: RefCell<VecDeque<StrTendril>>,
}

impl Default for BufferQueue {
    fn default() -> BufferQueue {
        BufferQueue::new()
    }
}

impl BufferQueue {
    /// Create an empty BufferQueue.
    pub fn new() -> BufferQueue {
        BufferQueue {
            buffers: RefCell::new(VecDeque::with_capacity(16)),
        }
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.buffers.borrow().is_empty()
    }

    /// Get the tendril at the beginning of the queue.
    pub fn pop_front(&self) -> Option<StrTendril> {
        self.buffers.borrow_mut().pop_front()
    }

    /// Add a buffer to the beginning of the queue.
    pub fn push_front(&self, buf: StrTendril) {
        if buf.is_empty() {
            return;
        }
        self.buffers.borrow_mut().push_front(buf);
    }

    /// Add a buffer to the end of the queue.
    pub fn push_back(&self, buf: StrTendril) {
        if buf.is_empty() {
            return;
        }
        self.buffers.borrow_mut().push_back(buf);
    }

    /// Look at the next available character, if any.
    pub fn peek(&self) -> Option<char> {
        // Invariant: all buffers in the queue are non-empty.
        self.buffers
            .borrow()
            .front()
            .map(|b| b.chars().next().unwrap())
    }

    /// Get the next character, if one is available.
    pub fn next(&self) -> Option<char> {
        let mut buffers = self.buffers.borrow_mut();
        let (result, now_empty) = match buffers.front_mut() {
            None => (None, false),
            Some(buf) => {
                let c = buf.pop_front_char().expect("empty buffer in queue");
                (Some(c), buf.is_empty())
            },
        };

        if now_empty {
            buffers.pop_front();
        }

        result
    }

    /// Pops and returns either a single character from the given set, or
    /// a `StrTendril` of characters none of which are in the set.  The set
    /// is represented as a bitmask and so can only contain the first 64
    /// ASCII characters.
    pub fn pop_except_from(&self, set: SmallCharSet) -> Option<SetResult> {
        let mut buffers = self.buffers.borrow_mut();
        let (result, now_empty) = match buffers.front_mut() {
            None => (None, false),
            Some(buf) => {
                let n = set.nonmember_prefix_len(buf);
                if n > 0 {
                    let out = buf.unsafe_subtendril(0, n as u32);
                    buf.unsafe_pop_front(n as u32);
                    (Some(NotFromSet(out)), buf.is_empty())
                } else {
                    let c = buf.pop_front_char().expect("empty buffer in queue");
                    (Some(FromSet(c)), buf.is_empty())
                }
            },
        };

        if now_empty {
            buffers.pop_front();
        }

        result
    }

    /// Check if the next characters are an ASCII case-insensitive match for
    /// `pat`, which must be non-empty.
    ///
    /// If so, consume them and return `Some(true)`.
    /// If they do not match, return `Some(false)`.
    /// If not enough characters are available to know, return `None`.
    pub fn eat<F: Fn(&u8, &u8) -> bool>(&self, pat: &str, eq: F) -> Option<bool> {
        let mut buffers = self.buffers.borrow_mut();
        let mut buffers_exhausted = 0;
        let mut consumed_from_last = 0;
        if buffers.front().is_none() {
            return None;
        }

        for pattern_byte in pat.bytes() {
            if buffers_exhausted >= buffers.len() {
                return None;
            }
            let buf = &buffers[buffers_exhausted];

            if !eq(&buf.as_bytes()[consumed_from_last], &pattern_byte) {
                return Some(false);
            }

            consumed_from_last += 1;
            if consumed_from_last >= buf.len() {
                buffers_exhausted += 1;
                consumed_from_last = 0;
            }
        }

        // We have a match. Commit changes to the BufferQueue.
        for _ in 0..buffers_exhausted {
            buffers.pop_front();
        }

        match buffers.front_mut() {
            None => assert_eq!(consumed_from_last, 0),
            Some(buf) => buf.pop_front(consumed_from_last as u32),
        }

        Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_eat() {
        let queue = BufferQueue::new();
        queue.push_back(StrTendril::from_slice("a"));
        queue.push_back(StrTendril::from_slice("bc"));
        assert_eq!(
            queue.eat("ABC", |a, b| a.to_ascii_lowercase() == b.to_ascii_lowercase()),
            Some(true)
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn peek_next_agree() {
        let queue = BufferQueue::new();
        queue.push_back(StrTendril::from_slice("xyz"));
        assert_eq!(queue.peek(), Some('x'));
        assert_eq!(queue.next(), Some('x'));
        assert_eq!(queue.peek(), Some('y'));
    }

    #[test]
    fn pop_except_from_splits_runs() {
        let queue = BufferQueue::new();
        queue.push_back(StrTendril::from_slice("abc&def"));
        let set = crate::small_char_set!('&');
        match queue.pop_except_from(set) {
            Some(NotFromSet(s)) => assert_eq!(&*s, "abc"),
            other => panic!("unexpected {:?}", other),
        }
        match queue.pop_except_from(set) {
            Some(FromSet(c)) => assert_eq!(c, '&'),
            other => panic!("unexpected {:?}", other),
        }
    }
}
