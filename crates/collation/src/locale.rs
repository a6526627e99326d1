//! Locale identifiers and the built-in base tailorings.
//!
//! [`LocaleId`] normalizes BCP 47 / POSIX-ish tags (`en_us`, `EN-US`,
//! `sr-latn-rs`) into one canonical spelling so they can be used as cache
//! keys. Normalization never fails: malformed tags are kept, just cased
//! consistently.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ROOT: &str = "und";

/// Normalized locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleId {
    tag: String,
}

impl LocaleId {
    /// The root locale, `und`.
    pub fn root() -> Self {
        Self {
            tag: ROOT.to_string(),
        }
    }

    /// Normalizes `tag`.
    ///
    /// Subtags split on `-` or `_`. The first subtag is lowercased; a
    /// four-letter subtag is titlecased (script); a two-letter or
    /// three-digit subtag after the language is uppercased (region);
    /// anything else is lowercased. Empty tags and `root` map to `und`.
    pub fn new(tag: &str) -> Self {
        let mut normalized = String::with_capacity(tag.len());
        for (idx, subtag) in tag
            .split(['-', '_'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
        {
            if idx > 0 {
                normalized.push('-');
            }
            if idx == 0 {
                normalized.push_str(&subtag.to_ascii_lowercase());
            } else if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
                let mut chars = subtag.chars();
                if let Some(first) = chars.next() {
                    normalized.push(first.to_ascii_uppercase());
                }
                normalized.push_str(&chars.as_str().to_ascii_lowercase());
            } else if (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
            {
                normalized.push_str(&subtag.to_ascii_uppercase());
            } else {
                normalized.push_str(&subtag.to_ascii_lowercase());
            }
        }

        if normalized.is_empty() || normalized == "root" {
            return Self::root();
        }
        Self { tag: normalized }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    pub fn is_root(&self) -> bool {
        self.tag == ROOT
    }

    /// The tag, then each shorter tag obtained by dropping the last subtag,
    /// ending with `und`.
    ///
    /// ```rust
    /// use collation::LocaleId;
    ///
    /// let chain: Vec<String> = LocaleId::new("sr_latn_rs")
    ///     .fallback_chain()
    ///     .map(|l| l.to_string())
    ///     .collect();
    /// assert_eq!(chain, ["sr-Latn-RS", "sr-Latn", "sr", "und"]);
    /// ```
    pub fn fallback_chain(&self) -> impl Iterator<Item = LocaleId> + '_ {
        let mut next = Some(self.tag.as_str());
        std::iter::from_fn(move || {
            let current = next?;
            next = match current.rfind('-') {
                Some(idx) => Some(&current[..idx]),
                None if current != ROOT => Some(ROOT),
                None => None,
            };
            Some(LocaleId {
                tag: current.to_string(),
            })
        })
    }
}

impl Default for LocaleId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl From<&str> for LocaleId {
    fn from(tag: &str) -> Self {
        LocaleId::new(tag)
    }
}

impl From<String> for LocaleId {
    fn from(tag: String) -> Self {
        LocaleId::new(&tag)
    }
}

impl Serialize for LocaleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag)
    }
}

impl<'de> Deserialize<'de> for LocaleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(LocaleId::new(&tag))
    }
}

/// Base tailorings shipped with the crate, keyed by normalized tag.
const BASE_RULES: &[(&str, &str)] = &[
    ("cs", "& h < ch"),
    ("sk", "& h < ch"),
    ("da", "& z < æ < ø < å"),
    ("nb", "& z < æ < ø < å"),
    ("nn", "& z < æ < ø < å"),
    ("no", "& z < æ < ø < å"),
    ("sv", "& z < å < ä < ö"),
    ("fi", "& z < å < ä < ö"),
    ("de", "& ss = ß"),
    ("es", "& n < ñ"),
];

/// Base rule text for `locale`, walking its fallback chain. Locales with no
/// tailoring of their own use the root rules, which are empty.
pub fn base_rules(locale: &LocaleId) -> &'static str {
    locale
        .fallback_chain()
        .find_map(|candidate| {
            BASE_RULES
                .iter()
                .find(|(tag, _)| *tag == candidate.as_str())
                .map(|(_, rules)| *rules)
        })
        .unwrap_or("")
}
