use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::heading::Heading;
use crate::domain::locale::SupportedLocales;
use crate::domain::public_body::PublicBody;
use crate::domain::types::Locale;

/// Category as shown in listings, rendered in one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub tag: String,
    pub title: String,
    pub description: String,
    /// Every supported locale has both a title and a description.
    pub complete: bool,
}

impl CategoryDto {
    pub fn localized(category: &Category, locale: &Locale, locales: &SupportedLocales) -> Self {
        let translation = category.translation(locale, locales).cloned().unwrap_or_default();
        let complete = locales.iter().all(|locale| {
            category
                .translations
                .get(locale.as_str())
                .is_some_and(|t| t.is_complete())
        });

        Self {
            id: category.id.get(),
            tag: category.tag.to_string(),
            title: translation.title,
            description: translation.description,
            complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingDto {
    pub id: i32,
    pub name: String,
    pub categories: Vec<CategoryDto>,
}

/// Data for the category index screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryIndex {
    /// Locale the listing is rendered in.
    pub locale: String,
    pub locales: Vec<String>,
    pub headings: Vec<HeadingDto>,
    pub without_heading: Vec<CategoryDto>,
}

/// Data for the new/edit form, including a rejected submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFormView {
    pub draft: CategoryDraft,
    pub default_locale: String,
    pub locales: Vec<String>,
    pub headings: Vec<Heading>,
    /// Public bodies using the stored tag; empty for new categories.
    pub tagged_public_bodies: Vec<PublicBody>,
    /// Messages per form field.
    pub errors: BTreeMap<String, Vec<String>>,
}
