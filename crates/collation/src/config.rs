//! Engine settings.
//!
//! [`CollationSettings`] controls the two behaviours rule text can toggle:
//! whether whitespace and punctuation are ignorable, and whether input is
//! canonically decomposed before keys are assigned.
//!
//! ```rust
//! use collation::{Alternate, CollationSettings, Decomposition};
//!
//! let settings = CollationSettings::default();
//! assert_eq!(settings.alternate, Alternate::Shifted);
//! assert_eq!(settings.decomposition, Decomposition::Canonical);
//! ```

use serde::{Deserialize, Serialize};

/// Handling of "variable" characters (whitespace and punctuation).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alternate {
    /// Variable characters are ignorable at primary strength, so
    /// "fifty-five", "fifty five" and "fiftyfive" produce the same primaries.
    #[default]
    Shifted,
    /// Variable characters get their own primary weight.
    NonIgnorable,
}

/// Normalization applied to each source character before key lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Decomposition {
    /// Characters are lowercased only; a precomposed "é" keeps a primary of
    /// its own and does not match "e".
    None,
    /// Characters are canonically decomposed and combining marks fold into
    /// their base letter, so "é", "e\u{301}" and "e" are primary-equal.
    #[default]
    Canonical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CollationSettings {
    #[serde(default)]
    pub alternate: Alternate,
    #[serde(default)]
    pub decomposition: Decomposition,
}
