use diesel::prelude::*;

use crate::domain::translation::CategoryTranslation as DomainCategoryTranslation;
use crate::domain::types::{Locale, TypeConstraintError};

/// Diesel model representing the `category_translations` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::category_translations)]
pub struct CategoryTranslation {
    pub id: i32,
    pub category_id: i32,
    pub locale: String,
    pub title: String,
    pub description: String,
}

/// Insertable form of [`CategoryTranslation`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::category_translations)]
pub struct NewCategoryTranslation<'a> {
    pub category_id: i32,
    pub locale: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

impl<'a> NewCategoryTranslation<'a> {
    pub fn new(
        category_id: i32,
        locale: &'a Locale,
        translation: &'a DomainCategoryTranslation,
    ) -> Self {
        Self {
            category_id,
            locale: locale.as_str(),
            title: translation.title.as_str(),
            description: translation.description.as_str(),
        }
    }
}

impl TryFrom<CategoryTranslation> for (Locale, DomainCategoryTranslation) {
    type Error = TypeConstraintError;

    fn try_from(row: CategoryTranslation) -> Result<Self, Self::Error> {
        Ok((
            Locale::new(row.locale)?,
            DomainCategoryTranslation::new(row.title, row.description),
        ))
    }
}
