//! YAML configuration for the lenient matcher.
//!
//! Lists the locales a process expects to match in, with any extra rule
//! text per locale, so the matcher cache can be warmed at startup.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "number-words"
//! default_locale: "en-US"
//!
//! locales:
//!   - locale: "en-US"
//!   - locale: "da"
//!     extra_rules: "& aa = å"
//!   - locale: "de"
//!     extra_rules: "&[last primary ignorable] = '·'"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use collation::LocaleId;
use matcher::LocaleKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LenientConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Locale used when a caller does not name one
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Locales to build matchers for
    #[serde(default)]
    pub locales: Vec<LocaleYamlConfig>,
}

impl LenientConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LenientConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.default_locale.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "default_locale must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.locales {
            entry.validate()?;
            let locale = LocaleId::new(&entry.locale);
            if !seen.insert(locale.clone()) {
                return Err(ConfigLoadError::Validation(format!(
                    "locale {locale} is listed more than once"
                )));
            }
        }

        Ok(())
    }

    /// Cache keys for every configured locale, in file order.
    pub fn locale_keys(&self) -> Vec<LocaleKey> {
        self.locales.iter().map(LocaleYamlConfig::locale_key).collect()
    }

    /// Extra rules configured for `locale`, matched on the normalized tag.
    pub fn extra_rules_for(&self, locale: &str) -> Option<&str> {
        let wanted = LocaleId::new(locale);
        self.locales
            .iter()
            .find(|entry| LocaleId::new(&entry.locale) == wanted)
            .and_then(|entry| entry.extra_rules.as_deref())
            .filter(|rules| !rules.is_empty())
    }

    /// Cache key for the default locale, with its configured rules if any.
    pub fn default_key(&self) -> LocaleKey {
        LocaleKey::new(
            self.default_locale.as_str(),
            self.extra_rules_for(&self.default_locale),
        )
    }
}

impl Default for LenientConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            default_locale: default_locale(),
            locales: Vec::new(),
        }
    }
}

/// One configured locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleYamlConfig {
    pub locale: String,

    /// Rule text appended to the locale's base rules
    #[serde(default)]
    pub extra_rules: Option<String>,
}

impl LocaleYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.locale.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "locale must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn locale_key(&self) -> LocaleKey {
        LocaleKey::new(self.locale.as_str(), self.extra_rules.as_deref())
    }
}

fn default_locale() -> String {
    "und".to_string()
}
