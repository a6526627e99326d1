//! Comparison keys and the stream interface the matcher consumes.
//!
//! A [`Collation`] hands out one independent [`KeyStream`] per input string.
//! Streams are cheap, borrow the engine and the text, and are never shared
//! between calls or between the two strings of a comparison.

use serde::{Deserialize, Serialize};

/// Opaque comparison key produced by a [`KeyStream`].
///
/// Only the primary weight is modelled. Primary weight `0` marks a key that
/// is ignorable at primary strength (punctuation, whitespace, stray
/// combining marks, or anything a tailoring resets to an ignorable position).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CollationKey(u32);

impl CollationKey {
    /// The primary-ignorable key.
    pub const IGNORABLE: CollationKey = CollationKey(0);

    /// Builds a key with the given primary weight.
    pub const fn new(primary: u32) -> Self {
        CollationKey(primary)
    }

    /// Primary weight; `0` for ignorable keys.
    pub const fn primary(self) -> u32 {
        self.0
    }

    pub const fn is_ignorable(self) -> bool {
        self.0 == 0
    }

    /// Primary-strength equality. Ordering beyond equality is not defined.
    pub const fn primary_eq(self, other: CollationKey) -> bool {
        self.0 == other.0
    }
}

/// A cursor over the comparison keys of one string.
///
/// `None` from [`Iterator::next`] is the end-of-stream sentinel; once
/// returned, the stream stays exhausted until [`KeyStream::reset`].
pub trait KeyStream: Iterator<Item = CollationKey> {
    /// Byte offset into the source text just past every character the
    /// stream has consumed so far.
    fn offset(&self) -> usize;

    /// Byte offset where the source characters behind the most recently
    /// returned key begin. Every key of an expansion shares one start.
    fn key_start(&self) -> usize;

    /// Rewinds the stream to the start of its source text.
    fn reset(&mut self);
}

/// Capability that turns a string into a fresh [`KeyStream`].
///
/// Implementors must be immutable once built so a single instance can serve
/// any number of threads, each pulling its own streams.
pub trait Collation: Send + Sync {
    type Stream<'a>: KeyStream
    where
        Self: 'a;

    fn stream_keys<'a>(&'a self, text: &'a str) -> Self::Stream<'a>;
}
