use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::str::CharIndices;

use unicode_normalization::char::decompose_canonical;

use crate::config::{CollationSettings, Decomposition};
use crate::key::{CollationKey, KeyStream};
use crate::tailoring::{default_primary, Tailoring};

/// A source character after case folding (and decomposition), tagged with
/// the byte span of its source character.
#[derive(Debug, Clone, Copy)]
struct FoldedChar {
    ch: char,
    start: usize,
    end: usize,
    starts_source: bool,
}

/// Key stream over one string.
///
/// Source characters are folded lazily, one at a time, so a stream that
/// stops early never touches the rest of the text. Every source character
/// contributes at least one key unless it is absorbed into a contraction or
/// is a trailing combining mark of a decomposed character.
#[derive(Debug, Clone)]
pub struct CollationElements<'a> {
    tailoring: &'a Tailoring,
    settings: CollationSettings,
    text: &'a str,
    source: CharIndices<'a>,
    folded: VecDeque<FoldedChar>,
    pending: VecDeque<CollationKey>,
    offset: usize,
    key_start: usize,
    scratch: String,
}

impl<'a> CollationElements<'a> {
    pub(crate) fn new(tailoring: &'a Tailoring, settings: CollationSettings, text: &'a str) -> Self {
        Self {
            tailoring,
            settings,
            text,
            source: text.char_indices(),
            folded: VecDeque::new(),
            pending: VecDeque::new(),
            offset: 0,
            key_start: 0,
            scratch: String::new(),
        }
    }

    /// Folds the next source character into the lookahead buffer. Returns
    /// false once the source is exhausted.
    fn pull_source(&mut self) -> bool {
        let Some((idx, ch)) = self.source.next() else {
            return false;
        };
        let end = idx + ch.len_utf8();
        let decomposition = self.settings.decomposition;
        let folded = &mut self.folded;
        let mut starts_source = true;
        let mut push = |ch: char| {
            folded.push_back(FoldedChar {
                ch,
                start: idx,
                end,
                starts_source,
            });
            starts_source = false;
        };

        for lower in ch.to_lowercase() {
            match decomposition {
                Decomposition::Canonical => decompose_canonical(lower, &mut push),
                Decomposition::None => push(lower),
            }
        }
        true
    }

    fn fill(&mut self, wanted: usize) {
        while self.folded.len() < wanted && self.pull_source() {}
    }

    /// Longest tailored match starting at the head of the buffer. Returns
    /// the number of folded characters it covers and its primaries, or
    /// `None` primaries when the head character is untailored.
    fn match_segment(&mut self, head: char) -> (usize, Option<&'a [u32]>) {
        let tailoring = self.tailoring;
        if tailoring.starts_contraction(head) {
            self.fill(tailoring.max_contraction());
            let available = self.folded.len().min(tailoring.max_contraction());
            for len in (2..=available).rev() {
                self.scratch.clear();
                self.scratch
                    .extend(self.folded.iter().take(len).map(|folded| folded.ch));
                if let Some(primaries) = tailoring.contraction(&self.scratch) {
                    return (len, Some(primaries));
                }
            }
        }
        (1, tailoring.single(head))
    }
}

impl Iterator for CollationElements<'_> {
    type Item = CollationKey;

    fn next(&mut self) -> Option<CollationKey> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Some(key);
            }

            self.fill(1);
            let head = *self.folded.front()?;
            let (len, mapped) = self.match_segment(head.ch);
            if let Some(last) = self.folded.drain(..len).last() {
                self.offset = last.end;
            }

            match mapped {
                Some(primaries) => self
                    .pending
                    .extend(primaries.iter().map(|&primary| CollationKey::new(primary))),
                None => {
                    if let Some(primary) = default_primary(head.ch, &self.settings) {
                        self.pending.push_back(CollationKey::new(primary));
                    }
                }
            }

            if !self.pending.is_empty() {
                self.key_start = head.start;
                continue;
            }
            // A marks-only tail of a decomposed character folds into its
            // base; only a source character with no primary at all shows up
            // as an ignorable key.
            if head.starts_source {
                self.key_start = head.start;
                return Some(CollationKey::IGNORABLE);
            }
        }
    }
}

impl FusedIterator for CollationElements<'_> {}

impl KeyStream for CollationElements<'_> {
    fn offset(&self) -> usize {
        self.offset
    }

    fn key_start(&self) -> usize {
        self.key_start
    }

    fn reset(&mut self) {
        self.source = self.text.char_indices();
        self.folded.clear();
        self.pending.clear();
        self.offset = 0;
        self.key_start = 0;
    }
}
