//! # Lenient matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` answers "does this text start with that word, if we ignore
//! case, accents and punctuation the way the locale does?" and "where does
//! that word first occur?". It sits on top of the `collation` crate, which
//! turns text into primary-strength key streams, and is the building block
//! number-word parsers use to accept "fifty-five", "fifty five" and
//! "Fiftyfive" alike.
//!
//! ## Core Types
//!
//! - [`LocaleKey`]: normalized locale plus optional rule text appended to the
//!   locale's base rules.
//! - [`LenientMatcher`]: immutable matcher for one key, generic over any
//!   [`Collation`](collation::Collation). Malformed rules leave it
//!   [`EngineState::Degraded`] rather than failing.
//! - [`TextMatch`]: byte range of a match found by
//!   [`LenientMatcher::find_text`].
//! - [`MatcherCache`]: concurrent cache of matchers, one published instance
//!   per key; [`global`] is the process-wide one.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::MatcherCache;
//!
//! let cache = MatcherCache::new();
//! let m = cache.get_or_build("en-US", None);
//!
//! assert_eq!(m.prefix_length("Fifty-seven", "fifty"), 5);
//! assert_eq!(m.prefix_length("fiftyfive", "fifty-five"), 9);
//!
//! let text = "two hundred fifty-five";
//! let found = m.find_text(text, "fifty", 0).expect("present");
//! assert_eq!(&text[found.range()], "fifty");
//! assert!(m.all_ignorable(&text[found.end()..found.end() + 1]));
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-operation latency and outcome, and matchers that degraded at
//! construction. Degraded construction is also logged with `tracing::warn!`.

pub mod cache;
pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::cache::{global, MatcherCache};
pub use crate::engine::{EngineState, LenientMatcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::types::{LocaleKey, MatchOperation, TextMatch};
