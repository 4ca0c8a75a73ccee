//! Decoding of the category create/edit form.
//!
//! The form posts flat urlencoded pairs:
//!
//! - `title`, `description`, `category_tag`
//! - `translations[<locale>][title]`, `translations[<locale>][description]`
//! - `headings[<anything>] = <heading id>`; only the values matter. A bare
//!   `headings` key with an empty value marks a selection that is present but
//!   empty, which clears every link.
//!
//! Only undecodable keys fail outright. Overlong text and heading values that
//! are not ids are carried on the payload as field errors so the form can be
//! shown again with everything the admin typed.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::errors::{field_error, messages};
use crate::domain::translation::TranslationPatch;
use crate::domain::types::{HeadingId, Locale};

pub const TITLE_TOO_LONG: &str = "Title is too long (maximum is 255 characters)";

#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct TranslationForm {
    #[validate(length(max = 255, message = "Title is too long (maximum is 255 characters)"))]
    pub title: Option<String>,
    #[validate(length(
        max = 10000,
        message = "Description is too long (maximum is 10000 characters)"
    ))]
    pub description: Option<String>,
}

impl From<TranslationForm> for TranslationPatch {
    fn from(value: TranslationForm) -> Self {
        Self {
            title: value.title,
            description: value.description,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct CategoryForm {
    #[validate(length(max = 255, message = "Title is too long (maximum is 255 characters)"))]
    pub title: Option<String>,
    #[validate(length(
        max = 10000,
        message = "Description is too long (maximum is 10000 characters)"
    ))]
    pub description: Option<String>,
    /// Posted as `category_tag`.
    #[validate(length(max = 255, message = "Tag is too long (maximum is 255 characters)"))]
    pub tag: Option<String>,
    pub translations: BTreeMap<String, TranslationForm>,
    pub headings: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form contains a malformed field: {0}")]
    MalformedField(String),
}

/// Splits `translations[es][title]` into `("translations", ["es", "title"])`.
fn split_key(key: &str) -> Result<(&str, Vec<&str>), CategoryFormError> {
    let Some(open) = key.find('[') else {
        return Ok((key, Vec::new()));
    };

    let (base, mut rest) = key.split_at(open);
    let mut parts = Vec::new();
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .ok_or_else(|| CategoryFormError::MalformedField(key.to_string()))?;
        parts.push(inner.0);
        rest = inner.1;
    }
    Ok((base, parts))
}

impl CategoryForm {
    /// Builds the form from the pairs posted by the browser. Unknown keys
    /// (CSRF tokens, submit buttons) are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, CategoryFormError> {
        let mut form = Self::default();

        for (key, value) in pairs {
            let (base, parts) = split_key(&key)?;
            match (base, parts.as_slice()) {
                ("title", []) => form.title = Some(value),
                ("description", []) => form.description = Some(value),
                ("category_tag", []) => form.tag = Some(value),
                ("translations", [locale, field]) => {
                    let entry = form.translations.entry(locale.to_string()).or_default();
                    match *field {
                        "title" => entry.title = Some(value),
                        "description" => entry.description = Some(value),
                        // Rails-style forms repeat the locale inside the entry.
                        "locale" => {}
                        _ => return Err(CategoryFormError::MalformedField(key.clone())),
                    }
                }
                ("translations", _) => return Err(CategoryFormError::MalformedField(key.clone())),
                ("headings", _) => {
                    let selection = form.headings.get_or_insert_with(Vec::new);
                    if !value.trim().is_empty() {
                        selection.push(value);
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Typed submission handed to the category service.
#[derive(Debug, Default, Clone)]
pub struct CategoryFormPayload {
    /// Title in the default locale.
    pub title: Option<String>,
    /// Description in the default locale.
    pub description: Option<String>,
    /// Raw tag; checked by the service so a bad tag becomes a field error.
    pub tag: Option<String>,
    pub translations: BTreeMap<String, TranslationPatch>,
    /// `None` leaves links untouched, `Some(vec![])` clears them. Values that
    /// are not heading ids are dropped here and reported in `errors`.
    pub headings: Option<Vec<HeadingId>>,
    /// Field errors found while decoding; the service reports them together
    /// with its own checks.
    pub errors: ValidationErrors,
}

impl CategoryFormPayload {
    /// Per-locale patches with the top-level title and description laid over
    /// the default locale's entry.
    pub fn translation_patches(&self, default: &Locale) -> BTreeMap<String, TranslationPatch> {
        let mut patches = self.translations.clone();
        let top_level = TranslationPatch {
            title: self.title.clone(),
            description: self.description.clone(),
        };
        if !top_level.is_empty() {
            patches
                .entry(default.to_string())
                .or_default()
                .overlay(top_level);
        }
        patches
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        let mut errors = value.validate().err().unwrap_or_default();

        for translation in value.translations.values() {
            let Err(invalid) = translation.validate() else {
                continue;
            };
            for message in messages(&invalid, "title")
                .into_iter()
                .chain(messages(&invalid, "description"))
            {
                errors.add("translations", field_error("length", message));
            }
        }

        let headings = value.headings.map(|raw| {
            let mut ids = Vec::with_capacity(raw.len());
            for token in raw {
                let token = token.trim();
                match token.parse::<i32>().ok().and_then(|id| HeadingId::new(id).ok()) {
                    Some(id) => ids.push(id),
                    None => errors.add(
                        "headings",
                        field_error("unknown_heading", format!("unknown headings: {token}")),
                    ),
                }
            }
            ids
        });

        Ok(Self {
            title: value.title,
            description: value.description,
            tag: value.tag,
            translations: value
                .translations
                .into_iter()
                .map(|(locale, entry)| (locale, entry.into()))
                .collect(),
            headings,
            errors,
        })
    }
}
