//! Process-wide matcher cache.
//!
//! One [`LenientMatcher`] per [`LocaleKey`], built on first use and kept for
//! the life of the cache. Entries are never replaced or evicted.
//!
//! Construction runs outside the map's locks. Two threads asking for the
//! same missing key may therefore both build a matcher; only the first one
//! inserted is published and every caller, including the loser, gets that
//! published instance back.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::engine::LenientMatcher;
use crate::types::LocaleKey;

#[derive(Debug, Default)]
pub struct MatcherCache {
    entries: DashMap<LocaleKey, Arc<LenientMatcher>>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The published matcher for `key`, building it if needed.
    pub fn get(&self, key: &LocaleKey) -> Arc<LenientMatcher> {
        if let Some(existing) = self.entries.get(key) {
            return Arc::clone(existing.value());
        }

        let candidate = Arc::new(LenientMatcher::new(key.clone()));
        let published = Arc::clone(
            self.entries
                .entry(key.clone())
                .or_insert_with(|| Arc::clone(&candidate))
                .value(),
        );
        debug!(
            key = %key,
            degraded = published.is_degraded(),
            raced = !Arc::ptr_eq(&published, &candidate),
            "matcher_cache_publish"
        );
        published
    }

    pub fn get_or_build(&self, locale: &str, extra_rules: Option<&str>) -> Arc<LenientMatcher> {
        self.get(&LocaleKey::new(locale, extra_rules))
    }

    /// Builds every key up front. Returns how many of them ended up
    /// degraded.
    pub fn preload<I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = LocaleKey>,
    {
        keys.into_iter()
            .filter(|key| self.get(key).is_degraded())
            .count()
    }

    pub fn contains(&self, key: &LocaleKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The shared cache behind `get_matcher`-style lookups.
pub fn global() -> &'static MatcherCache {
    static GLOBAL: OnceCell<MatcherCache> = OnceCell::new();
    GLOBAL.get_or_init(MatcherCache::new)
}
