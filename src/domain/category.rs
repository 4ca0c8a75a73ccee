use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::linker::HeadingPlacement;
use crate::domain::locale::SupportedLocales;
use crate::domain::translation::{CategoryTranslation, TranslationSet};
use crate::domain::types::{CategoryId, CategoryTag, DisplayOrder, HeadingId, Locale};

/// Classification of public bodies, translated into every supported locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub tag: CategoryTag,
    pub translations: TranslationSet,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Text of the category in `locale`, falling back to the default locale.
    pub fn translation(
        &self,
        locale: &Locale,
        locales: &SupportedLocales,
    ) -> Option<&CategoryTranslation> {
        self.translations.localized(locale, locales)
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub tag: CategoryTag,
    pub translations: TranslationSet,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Persisted association between a category and a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHeadingLink {
    pub category_id: CategoryId,
    pub heading_id: HeadingId,
    pub display_order: DisplayOrder,
}

/// Target state of an existing category, written in one transaction.
///
/// `placements` is `None` when the heading links must stay as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChanges {
    pub id: CategoryId,
    pub tag: CategoryTag,
    pub translations: TranslationSet,
    pub placements: Option<Vec<HeadingPlacement>>,
    pub updated_at: NaiveDateTime,
}

/// A category together with its heading links ordered by display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithLinks {
    pub category: Category,
    pub links: Vec<CategoryHeadingLink>,
}

impl CategoryWithLinks {
    pub fn new(category: Category, mut links: Vec<CategoryHeadingLink>) -> Self {
        links.sort_by_key(|link| link.display_order);
        Self { category, links }
    }

    /// Heading ids in display order.
    pub fn heading_ids(&self) -> Vec<HeadingId> {
        self.links.iter().map(|link| link.heading_id).collect()
    }
}

/// What the admin submitted, kept for redisplay when a submission is
/// rejected. The tag stays a raw string because it may be the invalid part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub tag: String,
    pub translations: TranslationSet,
    pub heading_ids: Vec<HeadingId>,
}

impl CategoryDraft {
    /// Empty draft for the "new category" form.
    pub fn blank(locales: &SupportedLocales) -> Self {
        Self {
            id: None,
            tag: String::new(),
            translations: TranslationSet::new().complete_for(locales),
            heading_ids: Vec::new(),
        }
    }

    /// Draft showing the stored state of `current`.
    pub fn from_stored(current: &CategoryWithLinks, locales: &SupportedLocales) -> Self {
        Self {
            id: Some(current.category.id),
            tag: current.category.tag.to_string(),
            translations: current.category.translations.complete_for(locales),
            heading_ids: current.heading_ids(),
        }
    }
}
