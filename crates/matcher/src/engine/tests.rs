use super::*;
use std::str::CharIndices;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::{set_match_metrics, MatchMetrics};

fn matcher(locale: &str) -> LenientMatcher {
    LenientMatcher::new(LocaleKey::base(locale))
}

fn matcher_with_rules(locale: &str, rules: &str) -> LenientMatcher {
    LenientMatcher::new(LocaleKey::new(locale, Some(rules)))
}

/// ASCII letters and digits are significant, everything else is ignorable.
#[derive(Debug, Default)]
struct AsciiEngine;

struct AsciiKeys<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    offset: usize,
    key_start: usize,
}

impl Iterator for AsciiKeys<'_> {
    type Item = CollationKey;

    fn next(&mut self) -> Option<CollationKey> {
        let (idx, ch) = self.chars.next()?;
        self.key_start = idx;
        self.offset = idx + ch.len_utf8();
        if ch.is_ascii_alphanumeric() {
            Some(CollationKey::new(ch.to_ascii_lowercase() as u32))
        } else {
            Some(CollationKey::IGNORABLE)
        }
    }
}

impl KeyStream for AsciiKeys<'_> {
    fn offset(&self) -> usize {
        self.offset
    }

    fn key_start(&self) -> usize {
        self.key_start
    }

    fn reset(&mut self) {
        self.chars = self.text.char_indices();
        self.offset = 0;
        self.key_start = 0;
    }
}

impl Collation for AsciiEngine {
    type Stream<'a> = AsciiKeys<'a>;

    fn stream_keys<'a>(&'a self, text: &'a str) -> AsciiKeys<'a> {
        AsciiKeys {
            text,
            chars: text.char_indices(),
            offset: 0,
            key_start: 0,
        }
    }
}

#[test]
fn all_ignorable_on_empty_punctuation_and_letters() {
    let m = matcher("en");
    assert!(m.all_ignorable(""));
    assert!(m.all_ignorable(" - , "));
    assert!(m.all_ignorable("\u{301}"));
    assert!(!m.all_ignorable("  a "));
    assert!(!m.all_ignorable("-5"));
}

#[test]
fn prefix_of_itself_is_non_zero() {
    let m = matcher("de");
    for s in ["a", "fifty", "fifty-five", "-", " ", "\u{301}", "Straße", "ñ", "\u{10348}"] {
        assert!(m.prefix_length(s, s) > 0, "{s:?}");
    }
}

#[test]
fn ignorables_are_skipped_on_both_sides() {
    let m = matcher("en-US");
    assert_eq!(m.prefix_length("fifty-five", "fifty five"), 10);
    assert_eq!(m.prefix_length("fiftyfive", "fifty-five"), 9);
    assert_eq!(m.prefix_length("fifty five", "fiftyfive"), 10);
    assert_eq!(m.prefix_length("--fifty", "fifty"), 7);
}

#[test]
fn prefix_only_has_to_be_used_up() {
    let m = matcher("en");
    assert_eq!(m.prefix_length("fifty-seven", "fifty"), 5);
    assert_eq!(m.prefix_length("fifty", "fifty-seven"), 0);
    assert_eq!(m.prefix_length("Fifty", "fifty"), 5);
    assert_eq!(m.prefix_length("fiftieth", "fifty"), 0);
}

#[test]
fn lookahead_character_is_not_counted() {
    let m = matcher("en");
    // The key after the match comes from a two-byte character.
    assert_eq!(m.prefix_length("fiftyé", "fifty"), 5);
    assert_eq!(m.prefix_length("fiftye\u{301}", "fifty"), 5);
    // A combining mark after the match is pulled as its own ignorable key.
    assert_eq!(m.prefix_length("e\u{301}x", "e"), 1);
    // Trailing ignorables are not part of the match.
    assert_eq!(m.prefix_length("fifty--", "fifty"), 5);
    assert_eq!(m.prefix_length("fifty", "fifty"), 5);
}

#[test]
fn lookahead_contraction_is_not_split() {
    let czech = matcher("cs");
    assert_eq!(czech.prefix_length("bchata", "b"), 1);
    assert_eq!(czech.prefix_length("bchata", "bch"), 3);
    assert_eq!(
        czech.find_text("xbchata", "b", 0),
        Some(TextMatch { start: 1, len: 1 })
    );
    assert_eq!(matcher("en").prefix_length("bchata", "b"), 1);

    // "å" written as a + ring is one contraction in Danish.
    let danish = matcher("da");
    assert_eq!(danish.prefix_length("ba\u{30A}r", "b"), 1);
    assert_eq!(danish.prefix_length("ba\u{30A}r", "bå"), 4);
}

#[test]
fn prefix_ending_inside_an_expansion_does_not_match() {
    let german = matcher("de");
    assert_eq!(german.prefix_length("Straße", "stras"), 0);
    assert_eq!(german.prefix_length("Straße", "strass"), 6);
    assert_eq!(german.prefix_length("Straße", "stra"), 4);
    assert_eq!(german.prefix_length("ßa", "ss"), 2);
}

#[test]
fn empty_inputs() {
    let m = matcher("en");
    assert_eq!(m.prefix_length("fifty", ""), 0);
    assert_eq!(m.prefix_length("", "fifty"), 0);
    assert_eq!(m.prefix_length("", ""), 0);
    assert_eq!(m.prefix_length("abc", "-"), 0);
    assert_eq!(m.find_text("", "fifty", 0), None);
    assert_eq!(m.find_text("fifty", "", 0), None);
}

#[test]
fn accents_and_case_fold_at_primary_strength() {
    let m = matcher("fr");
    assert_eq!(m.prefix_length("Élan vital", "elan"), 5);
    assert_eq!(m.prefix_length("elan", "ÉLAN"), 4);
    assert!(m.find_text("c'est déjà vu", "DEJA", 0).is_some());
}

#[test]
fn locale_tailorings_change_matches() {
    let root = matcher("und");
    let danish = matcher("da");
    assert_eq!(root.prefix_length("århus", "a"), 2);
    assert_eq!(danish.prefix_length("århus", "a"), 0);
    assert_eq!(danish.prefix_length("Århus", "å"), 2);

    let german = matcher("de-DE");
    assert_eq!(german.prefix_length("strasse", "Straße"), 7);
    assert_eq!(german.prefix_length("Straße", "strass"), 6);
    // A prefix that ends inside an expansion backs off the whole character.
    assert_eq!(german.prefix_length("ß", "s"), 0);

    let czech = matcher("cs");
    assert_eq!(czech.prefix_length("chata", "ch"), 2);
    assert_eq!(czech.prefix_length("chata", "c"), 0);
}

#[test]
fn find_text_reports_the_first_significant_character() {
    let m = matcher("en");
    let text = "two hundred fifty-five";
    let found = m.find_text(text, "fifty", 0).expect("fifty is present");
    assert_eq!(found, TextMatch { start: 12, len: 5 });
    assert_eq!(&text[found.range()], "fifty");

    assert_eq!(m.find_text("abc", "xyz", 0), None);
    assert_eq!(
        m.find_text("one - two", "two", 0),
        Some(TextMatch { start: 6, len: 3 })
    );
}

#[test]
fn find_text_honours_starting_at() {
    let m = matcher("en");
    let text = "fifty fifty";
    assert_eq!(m.find_text(text, "fifty", 0).map(|f| f.start), Some(0));
    assert_eq!(m.find_text(text, "fifty", 1).map(|f| f.start), Some(6));
    assert_eq!(m.find_text(text, "fifty", 7), None);
    assert_eq!(m.find_text(text, "fifty", text.len()), None);
    assert_eq!(m.find_text(text, "fifty", 1000), None);

    // Inside "é": moved up to the next boundary.
    let text = "éfifty";
    assert_eq!(
        m.find_text(text, "fifty", 1),
        Some(TextMatch { start: 2, len: 5 })
    );
}

#[test]
fn find_text_matches_across_ignorables() {
    let m = matcher("en");
    let found = m
        .find_text("one hundred fifty-five", "fiftyfive", 0)
        .expect("match across hyphen");
    assert_eq!(found, TextMatch { start: 12, len: 10 });
}

#[test]
fn results_are_deterministic() {
    let m = matcher("sv");
    let first = (
        m.prefix_length("Öl och bröd", "öl"),
        m.find_text("Öl och bröd", "BROD", 0),
        m.all_ignorable("-- "),
    );
    for _ in 0..50 {
        let again = (
            m.prefix_length("Öl och bröd", "öl"),
            m.find_text("Öl och bröd", "BROD", 0),
            m.all_ignorable("-- "),
        );
        assert_eq!(first, again);
    }
}

#[test]
fn extra_rules_extend_the_base() {
    let plain = matcher("en");
    let strict = matcher_with_rules("en", "[alternate non-ignorable]");
    assert!(!strict.is_degraded());
    assert!(plain.prefix_length("fifty-five", "fifty five") > 0);
    assert_eq!(strict.prefix_length("fifty-five", "fifty five"), 0);
    assert_eq!(strict.prefix_length("fifty-five", "fifty-five"), 10);

    let spelled = matcher_with_rules("en", "& and = '&'");
    assert_eq!(spelled.prefix_length("& more", "and"), 1);

    let danish = matcher_with_rules("da", " & aa = å");
    assert!(danish.engine().expect("ready").rules().starts_with("& z < æ < ø < å"));
    assert_eq!(danish.prefix_length("aarhus", "århus"), 6);
}

#[test]
fn extended_engine_always_decomposes() {
    let m = matcher_with_rules("en", "[normalization off]");
    let engine = m.engine().expect("ready");
    assert_eq!(engine.settings().decomposition, Decomposition::Canonical);
    assert_eq!(m.prefix_length("café", "cafe"), 5);
}

#[test]
fn malformed_rules_degrade_without_panicking() {
    for rules in ["& a < 'b", "< x", "[casefirst upper]", "& a <* xyz", "& a = \\u12"] {
        let m = matcher_with_rules("en", rules);
        assert!(m.is_degraded(), "{rules}");
        assert!(m.degraded_reason().is_some());
        assert!(m.engine().is_none());

        assert!(!m.all_ignorable(""));
        assert!(!m.all_ignorable("abc"));
        assert_eq!(m.prefix_length("fifty", "fifty"), 0);
        assert_eq!(m.prefix_length("", ""), 0);
        assert_eq!(m.find_text("two hundred fifty", "fifty", 0), None);
    }
}

#[test]
fn explicit_degraded_state_keeps_the_reason() {
    let m: LenientMatcher = LenientMatcher::degraded(LocaleKey::base("en"), "no engine");
    assert_eq!(m.degraded_reason(), Some("no engine"));
    assert!(matches!(m.state(), EngineState::Degraded { .. }));
    assert_eq!(m.locale_key(), &LocaleKey::base("en"));
}

#[test]
fn works_over_any_collation() {
    let m = LenientMatcher::from_engine(LocaleKey::base("und"), AsciiEngine);
    assert!(m.all_ignorable("--"));
    assert_eq!(m.prefix_length("Fifty-Five!", "fiftyfive"), 10);
    assert_eq!(
        m.find_text("two hundred fifty", "FIFTY", 0),
        Some(TextMatch { start: 12, len: 5 })
    );
    assert!(m.degraded_reason().is_none());
}

#[derive(Default)]
struct CountingMetrics {
    matched: AtomicUsize,
    missed: AtomicUsize,
    degraded: AtomicUsize,
}

impl MatchMetrics for CountingMetrics {
    fn record_match(&self, _op: MatchOperation, _latency: Duration, matched: bool) {
        if matched {
            self.matched.fetch_add(1, Ordering::SeqCst);
        } else {
            self.missed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn record_degraded(&self, _key: &LocaleKey, _reason: &str) {
        self.degraded.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn metrics_observe_operations_and_degraded_builds() {
    let metrics = Arc::new(CountingMetrics::default());
    set_match_metrics(Some(metrics.clone()));

    let m = matcher("en");
    m.prefix_length("fifty", "fifty");
    m.find_text("abc", "xyz", 0);
    let _ = matcher_with_rules("en", "& a <");

    set_match_metrics(None);

    assert!(metrics.matched.load(Ordering::SeqCst) >= 1);
    assert!(metrics.missed.load(Ordering::SeqCst) >= 1);
    assert!(metrics.degraded.load(Ordering::SeqCst) >= 1);
}
