//! Per-locale text of a category and the reconciliation of submitted edits.
//!
//! A [`TranslationSet`] maps every locale a category has text for to its
//! [`CategoryTranslation`]. Admin submissions arrive as partial
//! [`TranslationPatch`]es keyed by raw locale code; [`reconcile`] folds them
//! into the stored set and guarantees an entry for every supported locale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::errors::field_error;
use crate::domain::locale::SupportedLocales;
use crate::domain::types::Locale;

pub const BLANK_TITLE: &str = "Title can't be blank";
pub const BLANK_DESCRIPTION: &str = "Description can't be blank";

/// Translatable fields of a category in one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub title: String,
    pub description: String,
}

impl CategoryTranslation {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// An entry with no text yet, created so the locale is addressable.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Both fields carry text.
    pub fn is_complete(&self) -> bool {
        self.has_title() && self.has_description()
    }

    fn apply(&mut self, patch: &TranslationPatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.trim().to_string();
        }
    }
}

/// Partial update of one locale. `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranslationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TranslationPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn full(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Lays `other` on top of `self`; fields set in `other` win.
    pub fn overlay(&mut self, other: TranslationPatch) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
    }
}

/// Translations of one category keyed by locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationSet(BTreeMap<Locale, CategoryTranslation>);

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &str) -> Option<&CategoryTranslation> {
        self.0.get(locale)
    }

    pub fn insert(&mut self, locale: Locale, translation: CategoryTranslation) {
        self.0.insert(locale, translation);
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.0.contains_key(locale)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &CategoryTranslation)> {
        self.0.iter()
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.0.keys()
    }

    /// True when every supported locale has an entry, blank or not.
    pub fn covers(&self, locales: &SupportedLocales) -> bool {
        locales.iter().all(|locale| self.0.contains_key(locale))
    }

    /// Returns a copy with a blank entry added for every supported locale that
    /// has none. Existing entries are left as they are.
    pub fn complete_for(&self, locales: &SupportedLocales) -> Self {
        let mut completed = self.clone();
        for locale in locales.iter() {
            completed.0.entry(locale.clone()).or_default();
        }
        completed
    }

    /// Text to show in `locale`, falling back to the default locale when the
    /// requested one has no title.
    pub fn localized(
        &self,
        locale: &Locale,
        locales: &SupportedLocales,
    ) -> Option<&CategoryTranslation> {
        self.0
            .get(locale)
            .filter(|translation| translation.has_title())
            .or_else(|| self.0.get(locales.default_locale()))
    }
}

impl FromIterator<(Locale, CategoryTranslation)> for TranslationSet {
    fn from_iter<T: IntoIterator<Item = (Locale, CategoryTranslation)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for TranslationSet {
    type Item = (Locale, CategoryTranslation);
    type IntoIter = std::collections::btree_map::IntoIter<Locale, CategoryTranslation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Submitted translations could not be accepted.
///
/// `attempted` holds the set as far as it could be reconciled so the form can
/// be shown again with what the admin typed.
#[derive(Debug, Clone, Error)]
#[error("translations rejected: {errors}")]
pub struct TranslationRejection {
    pub attempted: TranslationSet,
    pub errors: ValidationErrors,
}

/// Folds `submitted` patches into `existing`.
///
/// Every supported locale ends up with an entry. Submitted locales outside the
/// supported set are reported under `translations`, and the default locale
/// must end with both a title and a description.
pub fn reconcile(
    existing: &TranslationSet,
    submitted: &BTreeMap<String, TranslationPatch>,
    locales: &SupportedLocales,
) -> Result<TranslationSet, TranslationRejection> {
    let mut errors = ValidationErrors::new();
    let mut reconciled = existing.clone();

    for locale in locales.iter() {
        let entry = reconciled.0.entry(locale.clone()).or_default();
        if let Some(patch) = submitted.get(locale.as_str()) {
            entry.apply(patch);
        }
    }

    for code in submitted.keys() {
        if !locales.contains(code) {
            errors.add(
                "translations",
                field_error("unsupported_locale", format!("unsupported locale: {code}")),
            );
        }
    }

    let default = reconciled
        .get(locales.default_locale().as_str())
        .cloned()
        .unwrap_or_default();
    if !default.has_title() {
        errors.add("title", field_error("blank", BLANK_TITLE));
    }
    if !default.has_description() {
        errors.add("description", field_error("blank", BLANK_DESCRIPTION));
    }

    if errors.is_empty() {
        Ok(reconciled)
    } else {
        Err(TranslationRejection {
            attempted: reconciled,
            errors,
        })
    }
}
