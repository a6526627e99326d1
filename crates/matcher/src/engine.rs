use collation::{Collation, CollationEngine, CollationError, CollationKey, Decomposition, KeyStream};
use tracing::{trace, warn};

use crate::metrics::{metrics_recorder, MetricsSpan};
use crate::types::{LocaleKey, MatchOperation, TextMatch};

#[cfg(test)]
mod tests;

/// The collation engine behind a matcher, or the reason there is none.
#[derive(Debug, Clone)]
pub enum EngineState<C> {
    Ready(C),
    /// The engine could not be built. Every operation reports no match.
    Degraded { reason: String },
}

/// Lenient (primary-strength) matcher for one locale.
///
/// Immutable once built and safe to share across threads; each call pulls
/// its own key streams from the engine.
#[derive(Debug, Clone)]
pub struct LenientMatcher<C: Collation = CollationEngine> {
    key: LocaleKey,
    state: EngineState<C>,
}

impl LenientMatcher<CollationEngine> {
    /// Builds the matcher for `key`. Never fails: an engine that cannot be
    /// built leaves the matcher degraded.
    pub fn new(key: LocaleKey) -> Self {
        match build_engine(&key) {
            Ok(engine) => Self::from_engine(key, engine),
            Err(err) => {
                let reason = err.to_string();
                warn!(
                    locale = %key.locale,
                    extra_rules = key.extra_rules.as_deref().unwrap_or(""),
                    error = %err,
                    "lenient_matcher_degraded"
                );
                if let Some(recorder) = metrics_recorder() {
                    recorder.record_degraded(&key, &reason);
                }
                Self::degraded(key, reason)
            }
        }
    }
}

/// The locale's engine, rebuilt with the extra rules appended when there
/// are any.
fn build_engine(key: &LocaleKey) -> Result<CollationEngine, CollationError> {
    let base = CollationEngine::for_locale(&key.locale)?;
    let Some(extra) = key.extra_rules.as_deref() else {
        return Ok(base);
    };
    let mut engine = CollationEngine::from_rules(&format!("{}{}", base.rules(), extra))?;
    engine.set_decomposition(Decomposition::Canonical);
    Ok(engine)
}

impl<C: Collation> LenientMatcher<C> {
    pub fn from_engine(key: LocaleKey, engine: C) -> Self {
        Self {
            key,
            state: EngineState::Ready(engine),
        }
    }

    pub fn degraded(key: LocaleKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            state: EngineState::Degraded {
                reason: reason.into(),
            },
        }
    }

    pub fn locale_key(&self) -> &LocaleKey {
        &self.key
    }

    pub fn state(&self) -> &EngineState<C> {
        &self.state
    }

    pub fn engine(&self) -> Option<&C> {
        match &self.state {
            EngineState::Ready(engine) => Some(engine),
            EngineState::Degraded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.state, EngineState::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.state {
            EngineState::Ready(_) => None,
            EngineState::Degraded { reason } => Some(reason),
        }
    }

    /// True when `text` has no primary-significant content: it is empty or
    /// every key is ignorable. Always false for a degraded matcher.
    pub fn all_ignorable(&self, text: &str) -> bool {
        let span = MetricsSpan::start();
        let result = match &self.state {
            EngineState::Ready(engine) => all_ignorable_in(engine, text),
            EngineState::Degraded { .. } => false,
        };
        trace!(op = "all_ignorable", text_len = text.len(), result, "lenient_match");
        if let Some(span) = span {
            span.record(MatchOperation::AllIgnorable, result);
        }
        result
    }

    /// Bytes of `text`, from its start, consumed while matching `prefix` at
    /// primary strength with ignorable keys skipped on both sides. `0` means
    /// no match. An empty prefix never matches.
    ///
    /// The prefix only has to be used up: `text` may continue past the
    /// match. When the key after the match has already been pulled from
    /// `text`, the characters it came from are not counted; a prefix that
    /// ends partway through an expansion does not match.
    pub fn prefix_length(&self, text: &str, prefix: &str) -> usize {
        let span = MetricsSpan::start();
        let len = match &self.state {
            EngineState::Ready(engine) => prefix_length_in(engine, text, prefix),
            EngineState::Degraded { .. } => 0,
        };
        trace!(op = "prefix_length", text_len = text.len(), len, "lenient_match");
        if let Some(span) = span {
            span.record(MatchOperation::PrefixLength, len > 0);
        }
        len
    }

    /// First match of `key` in `text` at or after byte `starting_at`.
    ///
    /// Candidate starts advance one `char` at a time; a `starting_at` inside
    /// a character is moved up to the next boundary. A candidate whose
    /// character is ignorable on its own is skipped, so a match is reported
    /// from its first significant character.
    pub fn find_text(&self, text: &str, key: &str, starting_at: usize) -> Option<TextMatch> {
        let span = MetricsSpan::start();
        let found = match &self.state {
            EngineState::Ready(engine) => find_text_in(engine, text, key, starting_at),
            EngineState::Degraded { .. } => None,
        };
        trace!(op = "find_text", text_len = text.len(), starting_at, found = ?found, "lenient_match");
        if let Some(span) = span {
            span.record(MatchOperation::FindText, found.is_some());
        }
        found
    }
}

fn all_ignorable_in<C: Collation>(engine: &C, text: &str) -> bool {
    engine.stream_keys(text).all(CollationKey::is_ignorable)
}

fn prefix_length_in<C: Collation>(engine: &C, text: &str, prefix: &str) -> usize {
    if prefix.is_empty() {
        return 0;
    }

    let mut text_keys = engine.stream_keys(text);
    let mut prefix_keys = engine.stream_keys(prefix);
    let mut text_key = text_keys.next();
    let mut prefix_key = prefix_keys.next();
    let mut matched_start = None;

    while prefix_key.is_some() {
        while text_key.is_some_and(CollationKey::is_ignorable) {
            text_key = text_keys.next();
        }
        while prefix_key.is_some_and(CollationKey::is_ignorable) {
            prefix_key = prefix_keys.next();
        }

        let Some(expected) = prefix_key else {
            break;
        };
        let Some(actual) = text_key else {
            return 0;
        };
        if !actual.primary_eq(expected) {
            return 0;
        }

        matched_start = Some(text_keys.key_start());
        text_key = text_keys.next();
        prefix_key = prefix_keys.next();
    }

    if text_key.is_none() {
        return text_keys.offset();
    }
    // Un-read the characters behind the lookahead key. A lookahead from the
    // same characters as the last matched key means the prefix ended inside
    // them, which is not a match.
    let lookahead_start = text_keys.key_start();
    if matched_start == Some(lookahead_start) {
        return 0;
    }
    lookahead_start
}

fn find_text_in<C: Collation>(
    engine: &C,
    text: &str,
    key: &str,
    starting_at: usize,
) -> Option<TextMatch> {
    let mut pos = starting_at;
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }

    while let Some(ch) = text.get(pos..)?.chars().next() {
        let next = pos + ch.len_utf8();
        if !all_ignorable_in(engine, &text[pos..next]) {
            let len = prefix_length_in(engine, &text[pos..], key);
            if len > 0 {
                return Some(TextMatch { start: pos, len });
            }
        }
        pos = next;
    }
    None
}
