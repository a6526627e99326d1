//! Lenient collation layer.
//!
//! Turns text into streams of primary-strength comparison keys so callers
//! can ask "do these two strings read the same?" without caring about case,
//! accents, or punctuation. The matcher crate builds its prefix and search
//! operations on top of these streams.
//!
//! ## What we do
//!
//! - Case folding and canonical decomposition (configurable per engine)
//! - Primary weights only; combining marks fold into their base letter
//! - Whitespace and punctuation ignorable when `alternate` is shifted
//! - Locale tailorings (`& z < æ < ø < å`, `& ss = ß`, `& h < ch`) compiled
//!   from a subset of ICU rule syntax, extendable with caller rules
//! - Byte offsets on every stream so matches map back to source text
//!
//! ## Invariants worth knowing
//!
//! - Engines are immutable once built; every stream is independent
//! - A stream only folds as much text as has been pulled from it
//! - Offsets always land on `char` boundaries of the source
//!
//! ```rust
//! use collation::{CollationEngine, LocaleId};
//!
//! let engine = CollationEngine::for_locale(&LocaleId::new("de")).expect("base rules");
//! assert!(engine.primary_eq("Fünfzig-Straße", "funfzig strasse"));
//! ```

mod config;
mod elements;
mod engine;
mod error;
mod key;
mod locale;
mod rules;
mod tailoring;

pub use crate::config::{Alternate, CollationSettings, Decomposition};
pub use crate::elements::CollationElements;
pub use crate::engine::CollationEngine;
pub use crate::error::CollationError;
pub use crate::key::{Collation, CollationKey, KeyStream};
pub use crate::locale::{base_rules, LocaleId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_rules_build_on_the_base() {
        let base = CollationEngine::for_locale(&LocaleId::new("da")).expect("da rules");
        let extended = CollationEngine::from_rules(&format!("{}{}", base.rules(), " & '-' < x"))
            .expect("extended rules");

        assert!(!extended.primary_eq("å", "a"));
        assert!(!extended.primary_eq("x", "'-'"));
        assert_eq!(extended.primaries("x").len(), 1);
        assert!(extended.rules().starts_with(base.rules()));
    }

    #[test]
    fn extended_rules_report_errors() {
        let base = CollationEngine::for_locale(&LocaleId::new("sv")).expect("sv rules");
        let err = CollationEngine::from_rules(&format!("{} & a <", base.rules()))
            .expect_err("dangling relation");
        assert!(matches!(err, CollationError::MissingText { .. }));
    }

    #[test]
    fn stream_offsets_land_on_char_boundaries() {
        let engine = CollationEngine::root();
        let text = "Ça\u{10348}—ñ e\u{301}";
        let mut stream = engine.stream_keys(text);
        while stream.next().is_some() {
            assert!(text.is_char_boundary(stream.offset()), "{}", stream.offset());
        }
        assert_eq!(stream.offset(), text.len());
    }

    #[test]
    fn settings_round_trip_through_the_engine() {
        let settings = CollationSettings {
            alternate: Alternate::NonIgnorable,
            decomposition: Decomposition::None,
        };
        let engine = CollationEngine::root().with_settings(settings);
        assert_eq!(engine.settings(), settings);
        assert_ne!(
            engine.primaries("a b"),
            CollationEngine::root().primaries("a b")
        );
    }
}
