use diesel::prelude::*;

use crate::domain::category::CategoryHeadingLink as DomainCategoryHeadingLink;
use crate::domain::linker::HeadingPlacement;
use crate::domain::types::{DisplayOrder, TypeConstraintError};

/// Diesel model representing the `category_heading_links` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::category_heading_links)]
pub struct CategoryHeadingLink {
    pub id: i32,
    pub category_id: i32,
    pub heading_id: i32,
    pub display_order: i32,
}

/// Insertable form of [`CategoryHeadingLink`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::category_heading_links)]
pub struct NewCategoryHeadingLink {
    pub category_id: i32,
    pub heading_id: i32,
    pub display_order: i32,
}

impl NewCategoryHeadingLink {
    pub fn new(category_id: i32, placement: &HeadingPlacement) -> Self {
        Self {
            category_id,
            heading_id: placement.heading_id.get(),
            display_order: placement.display_order.get(),
        }
    }
}

impl TryFrom<CategoryHeadingLink> for DomainCategoryHeadingLink {
    type Error = TypeConstraintError;

    fn try_from(link: CategoryHeadingLink) -> Result<Self, Self::Error> {
        Ok(Self {
            category_id: link.category_id.try_into()?,
            heading_id: link.heading_id.try_into()?,
            display_order: DisplayOrder::new(link.display_order)?,
        })
    }
}
