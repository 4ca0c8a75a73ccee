use diesel::prelude::*;

use crate::domain::public_body::PublicBody as DomainPublicBody;
use crate::domain::types::{PublicBodyName, TypeConstraintError};

/// Diesel model representing the `public_bodies` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::public_bodies)]
pub struct PublicBody {
    pub id: i32,
    pub name: String,
}

/// Diesel model representing the `public_body_tags` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(PublicBody))]
#[diesel(table_name = crate::schema::public_body_tags)]
pub struct PublicBodyTag {
    pub id: i32,
    pub public_body_id: i32,
    pub name: String,
}

impl TryFrom<(PublicBody, Vec<PublicBodyTag>)> for DomainPublicBody {
    type Error = TypeConstraintError;

    fn try_from((body, tags): (PublicBody, Vec<PublicBodyTag>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: body.id.try_into()?,
            name: PublicBodyName::new(body.name)?,
            tags: tags.into_iter().map(|tag| tag.name).collect(),
        })
    }
}
