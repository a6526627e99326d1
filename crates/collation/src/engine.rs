use tracing::debug;

use crate::config::{CollationSettings, Decomposition};
use crate::elements::CollationElements;
use crate::error::CollationError;
use crate::key::Collation;
use crate::locale::{base_rules, LocaleId};
use crate::rules;
use crate::tailoring::Tailoring;

/// A compiled, immutable collation engine.
///
/// Built once from rule text, then shared freely: every call to
/// [`Collation::stream_keys`] returns an independent stream.
#[derive(Debug, Clone)]
pub struct CollationEngine {
    rules: String,
    tailoring: Tailoring,
    settings: CollationSettings,
}

impl CollationEngine {
    /// Untailored engine with default settings.
    pub fn root() -> Self {
        Self {
            rules: String::new(),
            tailoring: Tailoring::new(),
            settings: CollationSettings::default(),
        }
    }

    /// Engine for `locale`, using the base rules found along its fallback
    /// chain.
    pub fn for_locale(locale: &LocaleId) -> Result<Self, CollationError> {
        let rules = base_rules(locale);
        debug!(locale = %locale, rules_len = rules.len(), "collation_engine_for_locale");
        Self::from_rules(rules)
    }

    /// Compiles `rules` on top of the root collation.
    pub fn from_rules(rules: &str) -> Result<Self, CollationError> {
        let mut settings = CollationSettings::default();
        let tailoring = rules::compile(rules, &mut settings)?;
        Ok(Self {
            rules: rules.to_string(),
            tailoring,
            settings,
        })
    }

    /// The full rule text this engine was compiled from.
    pub fn rules(&self) -> &str {
        &self.rules
    }

    pub fn settings(&self) -> CollationSettings {
        self.settings
    }

    pub fn set_decomposition(&mut self, decomposition: Decomposition) {
        self.settings.decomposition = decomposition;
    }

    /// Replaces every setting, overriding whatever the rule text chose.
    pub fn with_settings(mut self, settings: CollationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn elements<'a>(&'a self, text: &'a str) -> CollationElements<'a> {
        CollationElements::new(&self.tailoring, self.settings, text)
    }

    /// Non-ignorable primaries of `text`, in order.
    pub fn primaries(&self, text: &str) -> Vec<u32> {
        self.tailoring.primaries_of(text, self.settings)
    }

    /// Whether `a` and `b` are equal at primary strength.
    pub fn primary_eq(&self, a: &str, b: &str) -> bool {
        let mut left = self.elements(a).filter(|key| !key.is_ignorable());
        let mut right = self.elements(b).filter(|key| !key.is_ignorable());
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(l), Some(r)) if l.primary_eq(r) => {}
                _ => return false,
            }
        }
    }
}

impl Default for CollationEngine {
    fn default() -> Self {
        Self::root()
    }
}

impl Collation for CollationEngine {
    type Stream<'a> = CollationElements<'a>;

    fn stream_keys<'a>(&'a self, text: &'a str) -> CollationElements<'a> {
        self.elements(text)
    }
}
