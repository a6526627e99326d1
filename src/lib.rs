//! Workspace umbrella crate for the lenient matcher.
//!
//! Re-exports the `collation` and `matcher` crates and adds the pieces a
//! process needs around them: a process-wide [`get_matcher`] lookup, YAML
//! configuration, and cache warming at startup.
//!
//! ```
//! let m = lenient::get_matcher("en", None);
//! assert_eq!(m.prefix_length("fifty-five", "fifty five"), 10);
//! assert!(m.all_ignorable(" - "));
//! ```

pub mod config;

pub use collation::{
    Alternate, Collation, CollationEngine, CollationError, CollationKey, CollationSettings,
    Decomposition, KeyStream, LocaleId, base_rules,
};
pub use matcher::{
    EngineState, LenientMatcher, LocaleKey, MatchMetrics, MatchOperation, MatcherCache,
    TextMatch, set_match_metrics,
};

pub use crate::config::{ConfigLoadError, LenientConfig, LocaleYamlConfig};

use std::sync::Arc;

use tracing::{Level, info, warn};

/// Matcher for `locale` plus optional extra rules, from the process-wide
/// cache. Empty `extra_rules` is the same as none.
pub fn get_matcher(locale: &str, extra_rules: Option<&str>) -> Arc<LenientMatcher> {
    matcher::global().get_or_build(locale, extra_rules)
}

/// Builds a matcher for every locale in `config`, plus the default locale,
/// into `cache`. Returns how many came out degraded.
pub fn warm_cache(config: &LenientConfig, cache: &MatcherCache) -> usize {
    let span = tracing::span!(
        Level::INFO,
        "lenient.warm_cache",
        locales = config.locales.len()
    );
    let _guard = span.enter();

    let mut keys = config.locale_keys();
    let default_key = config.default_key();
    if !keys.contains(&default_key) {
        keys.push(default_key);
    }
    let total = keys.len();

    let degraded = cache.preload(keys);
    if degraded > 0 {
        warn!(total, degraded, "warm_cache_degraded");
    } else {
        info!(total, "warm_cache_complete");
    }
    degraded
}
