use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::heading::Heading;
use crate::models::heading::Heading as DbHeading;
use crate::repository::{DieselRepository, HeadingReader};

impl HeadingReader for DieselRepository {
    fn list_headings(&self) -> RepositoryResult<Vec<Heading>> {
        use crate::schema::headings;

        let mut conn = self.conn()?;

        let headings = headings::table
            .order((headings::display_order.asc(), headings::id.asc()))
            .load::<DbHeading>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Heading>, _>>()?;

        Ok(headings)
    }
}
