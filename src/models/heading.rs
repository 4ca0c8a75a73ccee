use diesel::prelude::*;

use crate::domain::heading::Heading as DomainHeading;
use crate::domain::types::{DisplayOrder, HeadingName, TypeConstraintError};

/// Diesel model representing the `headings` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::headings)]
pub struct Heading {
    pub id: i32,
    pub name: String,
    pub display_order: i32,
}

impl TryFrom<Heading> for DomainHeading {
    type Error = TypeConstraintError;

    fn try_from(heading: Heading) -> Result<Self, Self::Error> {
        Ok(Self {
            id: heading.id.try_into()?,
            name: HeadingName::new(heading.name)?,
            display_order: DisplayOrder::new(heading.display_order)?,
        })
    }
}
