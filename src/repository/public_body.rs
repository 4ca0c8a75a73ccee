use std::collections::HashMap;

use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::public_body::PublicBody;
use crate::domain::types::CategoryTag;
use crate::models::public_body::{PublicBody as DbPublicBody, PublicBodyTag as DbPublicBodyTag};
use crate::repository::{DieselRepository, PublicBodyReader};

impl PublicBodyReader for DieselRepository {
    fn count_public_bodies_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<usize> {
        use crate::schema::public_body_tags;

        let mut conn = self.conn()?;

        let total = public_body_tags::table
            .filter(public_body_tags::name.eq(tag.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }

    fn list_public_bodies_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<Vec<PublicBody>> {
        use crate::schema::{public_bodies, public_body_tags};

        let mut conn = self.conn()?;

        let bodies = public_bodies::table
            .filter(
                public_bodies::id.eq_any(
                    public_body_tags::table
                        .filter(public_body_tags::name.eq(tag.as_str()))
                        .select(public_body_tags::public_body_id),
                ),
            )
            .order(public_bodies::id.asc())
            .load::<DbPublicBody>(&mut conn)?;

        let ids: Vec<i32> = bodies.iter().map(|body| body.id).collect();
        let mut tags: HashMap<i32, Vec<DbPublicBodyTag>> = HashMap::new();
        for row in public_body_tags::table
            .filter(public_body_tags::public_body_id.eq_any(&ids))
            .order(public_body_tags::id.asc())
            .load::<DbPublicBodyTag>(&mut conn)?
        {
            tags.entry(row.public_body_id).or_default().push(row);
        }

        let bodies = bodies
            .into_iter()
            .map(|body| {
                let own = tags.remove(&body.id).unwrap_or_default();
                PublicBody::try_from((body, own))
            })
            .collect::<Result<Vec<PublicBody>, _>>()?;

        Ok(bodies)
    }
}
