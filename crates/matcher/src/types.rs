use std::fmt;
use std::ops::Range;

use collation::LocaleId;
use serde::{Deserialize, Deserializer, Serialize};

/// Cache key for a matcher: a normalized locale plus optional rule text
/// appended to the locale's base rules.
///
/// Empty extra rule text is the same key as no extra rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocaleKey {
    pub locale: LocaleId,
    #[serde(default, deserialize_with = "non_empty_rules")]
    pub extra_rules: Option<String>,
}

fn non_empty_rules<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let rules = Option::<String>::deserialize(deserializer)?;
    Ok(rules.filter(|rules| !rules.is_empty()))
}

impl LocaleKey {
    pub fn new(locale: impl Into<LocaleId>, extra_rules: Option<&str>) -> Self {
        Self {
            locale: locale.into(),
            extra_rules: extra_rules
                .filter(|rules| !rules.is_empty())
                .map(str::to_string),
        }
    }

    /// Key for the locale's base rules alone.
    pub fn base(locale: impl Into<LocaleId>) -> Self {
        Self::new(locale, None)
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extra_rules {
            Some(rules) => write!(f, "{} [+{} bytes of rules]", self.locale, rules.len()),
            None => write!(f, "{}", self.locale),
        }
    }
}

/// A located match: `len` bytes of the searched text starting at `start`.
///
/// Both ends fall on `char` boundaries, so `&text[m.range()]` is always valid
/// for the text the match was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextMatch {
    pub start: usize,
    pub len: usize,
}

impl TextMatch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Matcher operation, as reported to [`MatchMetrics`](crate::MatchMetrics).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchOperation {
    AllIgnorable,
    PrefixLength,
    FindText,
}

impl MatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperation::AllIgnorable => "all_ignorable",
            MatchOperation::PrefixLength => "prefix_length",
            MatchOperation::FindText => "find_text",
        }
    }
}

impl fmt::Display for MatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_extra_rules_are_no_extra_rules() {
        assert_eq!(LocaleKey::new("en_US", Some("")), LocaleKey::base("en-us"));
        assert_ne!(
            LocaleKey::new("en", Some("& a = b")),
            LocaleKey::base("en")
        );
    }

    #[test]
    fn locale_key_deserializes_with_normalized_tag() {
        let key: LocaleKey = serde_json::from_str(r#"{"locale":"de_at"}"#).expect("valid key");
        assert_eq!(key, LocaleKey::base("de-AT"));
        assert_eq!(key.to_string(), "de-AT");

        let key: LocaleKey =
            serde_json::from_str(r#"{"locale":"de","extra_rules":""}"#).expect("valid key");
        assert_eq!(key.extra_rules, None);
    }

    #[test]
    fn text_match_ranges() {
        let text = "two hundred fifty-five";
        let m = TextMatch { start: 12, len: 5 };
        assert_eq!(m.end(), 17);
        assert_eq!(&text[m.range()], "fifty");
    }

    #[test]
    fn operation_names_match_serde() {
        for op in [
            MatchOperation::AllIgnorable,
            MatchOperation::PrefixLength,
            MatchOperation::FindText,
        ] {
            let json = serde_json::to_string(&op).expect("serialize");
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
    }
}
