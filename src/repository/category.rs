use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, CategoryChanges, CategoryHeadingLink, NewCategory};
use crate::domain::linker::HeadingPlacement;
use crate::domain::translation::TranslationSet;
use crate::domain::types::{CategoryId, CategoryTag};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::models::link::{CategoryHeadingLink as DbCategoryHeadingLink, NewCategoryHeadingLink};
use crate::models::translation::{
    CategoryTranslation as DbCategoryTranslation, NewCategoryTranslation,
};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

fn load_translations(
    conn: &mut SqliteConnection,
    category_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<DbCategoryTranslation>>> {
    use crate::schema::category_translations;

    let rows = category_translations::table
        .filter(category_translations::category_id.eq_any(category_ids))
        .order(category_translations::locale.asc())
        .load::<DbCategoryTranslation>(conn)?;

    let mut grouped: HashMap<i32, Vec<DbCategoryTranslation>> = HashMap::new();
    for row in rows {
        grouped.entry(row.category_id).or_default().push(row);
    }
    Ok(grouped)
}

fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<DbCategory>,
) -> RepositoryResult<Vec<Category>> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut translations = load_translations(conn, &ids)?;

    let categories = rows
        .into_iter()
        .map(|row| {
            let own = translations.remove(&row.id).unwrap_or_default();
            Category::try_from((row, own))
        })
        .collect::<Result<Vec<Category>, _>>()?;

    Ok(categories)
}

fn insert_translations(
    conn: &mut SqliteConnection,
    category_id: i32,
    translations: &TranslationSet,
) -> QueryResult<usize> {
    use crate::schema::category_translations;

    let rows = translations
        .iter()
        .map(|(locale, translation)| NewCategoryTranslation::new(category_id, locale, translation))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(category_translations::table)
        .values(&rows)
        .execute(conn)
}

fn replace_links(
    conn: &mut SqliteConnection,
    category_id: i32,
    placements: &[HeadingPlacement],
) -> QueryResult<usize> {
    use crate::schema::category_heading_links;

    diesel::delete(
        category_heading_links::table.filter(category_heading_links::category_id.eq(category_id)),
    )
    .execute(conn)?;

    let rows = placements
        .iter()
        .map(|placement| NewCategoryHeadingLink::new(category_id, placement))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(category_heading_links::table)
        .values(&rows)
        .execute(conn)
}

fn load_links(
    conn: &mut SqliteConnection,
    category_id: Option<i32>,
) -> RepositoryResult<Vec<CategoryHeadingLink>> {
    use crate::schema::category_heading_links;

    let mut query = category_heading_links::table.into_boxed::<diesel::sqlite::Sqlite>();
    if let Some(category_id) = category_id {
        query = query.filter(category_heading_links::category_id.eq(category_id));
    }

    let links = query
        .order((
            category_heading_links::category_id.asc(),
            category_heading_links::display_order.asc(),
        ))
        .load::<DbCategoryHeadingLink>(conn)?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<CategoryHeadingLink>, _>>()?;

    Ok(links)
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let rows = categories::table
            .order(categories::category_tag.asc())
            .load::<DbCategory>(&mut conn)?;

        assemble(&mut conn, rows)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let row = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(assemble(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_category_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let row = categories::table
            .filter(categories::category_tag.eq(tag.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(assemble(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn list_category_links(&self, id: CategoryId) -> RepositoryResult<Vec<CategoryHeadingLink>> {
        let mut conn = self.conn()?;

        load_links(&mut conn, Some(id.get()))
    }

    fn list_all_links(&self) -> RepositoryResult<Vec<CategoryHeadingLink>> {
        let mut conn = self.conn()?;

        load_links(&mut conn, None)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        category: &NewCategory,
        placements: &[HeadingPlacement],
    ) -> RepositoryResult<CategoryId> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category = DbNewCategory::from(category);

        let id = conn.transaction(|conn| {
            let id: i32 = diesel::insert_into(categories::table)
                .values(&db_category)
                .returning(categories::id)
                .get_result(conn)?;

            insert_translations(conn, id, &category.translations)?;
            replace_links(conn, id, placements)?;

            QueryResult::Ok(id)
        })?;

        Ok(CategoryId::new(id)?)
    }

    fn update_category(&self, changes: &CategoryChanges) -> RepositoryResult<usize> {
        use crate::schema::{categories, category_translations};

        let mut conn = self.conn()?;
        let id = changes.id.get();

        let affected = conn.transaction(|conn| {
            let affected = diesel::update(categories::table.filter(categories::id.eq(id)))
                .set((
                    categories::category_tag.eq(changes.tag.as_str()),
                    categories::updated_at.eq(changes.updated_at),
                ))
                .execute(conn)?;
            if affected == 0 {
                return QueryResult::Ok(0);
            }

            diesel::delete(
                category_translations::table.filter(category_translations::category_id.eq(id)),
            )
            .execute(conn)?;
            insert_translations(conn, id, &changes.translations)?;

            if let Some(placements) = &changes.placements {
                replace_links(conn, id, placements)?;
            }

            QueryResult::Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{categories, category_heading_links, category_translations};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(
                category_heading_links::table
                    .filter(category_heading_links::category_id.eq(id.get())),
            )
            .execute(conn)?;

            diesel::delete(
                category_translations::table
                    .filter(category_translations::category_id.eq(id.get())),
            )
            .execute(conn)?;

            diesel::delete(categories::table.filter(categories::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
