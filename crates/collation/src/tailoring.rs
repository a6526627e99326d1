use fxhash::{FxHashMap, FxHashSet};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::{Alternate, CollationSettings};
use crate::elements::CollationElements;
use crate::error::CollationError;

/// First weight handed out by `<` relations. Untailored characters use
/// `code point + 1`, which stays below this.
pub(crate) const FIRST_TAILORED_PRIMARY: u32 = 0x0011_0001;

/// Compiled tailoring: primaries for single folded characters and for
/// multi-character contractions.
///
/// Targets are stored lowercased in both NFC and NFD form so lookups work
/// whichever decomposition mode the engine runs in. An empty primary list
/// means the target is ignorable.
#[derive(Debug, Clone)]
pub(crate) struct Tailoring {
    singles: FxHashMap<char, Vec<u32>>,
    contractions: FxHashMap<String, Vec<u32>>,
    contraction_starts: FxHashSet<char>,
    max_contraction: usize,
    next_primary: u32,
}

impl Tailoring {
    pub(crate) fn new() -> Self {
        Self {
            singles: FxHashMap::default(),
            contractions: FxHashMap::default(),
            contraction_starts: FxHashSet::default(),
            max_contraction: 0,
            next_primary: FIRST_TAILORED_PRIMARY,
        }
    }

    pub(crate) fn allocate(&mut self) -> Result<u32, CollationError> {
        let primary = self.next_primary;
        self.next_primary = primary
            .checked_add(1)
            .ok_or(CollationError::WeightOverflow)?;
        Ok(primary)
    }

    pub(crate) fn insert(&mut self, target: &str, primaries: Vec<u32>) {
        let lower = target.to_lowercase();
        let composed: String = lower.nfc().collect();
        let decomposed: String = lower.nfd().collect();

        self.insert_form(composed.clone(), primaries.clone());
        if decomposed != composed {
            self.insert_form(decomposed, primaries);
        }
    }

    fn insert_form(&mut self, form: String, primaries: Vec<u32>) {
        let mut chars = form.chars();
        let (Some(first), rest) = (chars.next(), chars.as_str()) else {
            return;
        };
        if rest.is_empty() {
            self.singles.insert(first, primaries);
            return;
        }
        self.max_contraction = self.max_contraction.max(form.chars().count());
        self.contraction_starts.insert(first);
        self.contractions.insert(form, primaries);
    }

    pub(crate) fn single(&self, ch: char) -> Option<&[u32]> {
        self.singles.get(&ch).map(Vec::as_slice)
    }

    pub(crate) fn contraction(&self, folded: &str) -> Option<&[u32]> {
        self.contractions.get(folded).map(Vec::as_slice)
    }

    pub(crate) fn starts_contraction(&self, ch: char) -> bool {
        self.contraction_starts.contains(&ch)
    }

    pub(crate) fn max_contraction(&self) -> usize {
        self.max_contraction
    }

    /// Non-ignorable primaries of `text` under the tailoring built so far.
    pub(crate) fn primaries_of(&self, text: &str, settings: CollationSettings) -> Vec<u32> {
        CollationElements::new(self, settings, text)
            .filter(|key| !key.is_ignorable())
            .map(|key| key.primary())
            .collect()
    }
}

/// Primary weight of an untailored folded character, `None` when it is
/// ignorable.
pub(crate) fn default_primary(ch: char, settings: &CollationSettings) -> Option<u32> {
    if ch.is_mark_nonspacing()
        || ch.is_mark_enclosing()
        || ch.is_other_control()
        || ch.is_other_format()
    {
        return None;
    }
    let variable = ch.is_whitespace() || ch.is_punctuation() || ch.is_separator();
    if variable && settings.alternate == Alternate::Shifted {
        return None;
    }
    Some(ch as u32 + 1)
}
