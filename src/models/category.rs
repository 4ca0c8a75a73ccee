use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::translation::{
    CategoryTranslation as DomainCategoryTranslation, TranslationSet,
};
use crate::domain::types::{CategoryTag, Locale, TypeConstraintError};
use crate::models::translation::CategoryTranslation;

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub category_tag: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub category_tag: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<(Category, Vec<CategoryTranslation>)> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(
        (category, translations): (Category, Vec<CategoryTranslation>),
    ) -> Result<Self, Self::Error> {
        let translations = translations
            .into_iter()
            .map(<(Locale, DomainCategoryTranslation)>::try_from)
            .collect::<Result<TranslationSet, _>>()?;

        Ok(Self {
            id: category.id.try_into()?,
            tag: CategoryTag::new(category.category_tag)?,
            translations,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            category_tag: category.tag.as_str(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
