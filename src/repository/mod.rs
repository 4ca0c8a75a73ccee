use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, CategoryChanges, CategoryHeadingLink, NewCategory};
use crate::domain::heading::Heading;
use crate::domain::linker::HeadingPlacement;
use crate::domain::public_body::PublicBody;
use crate::domain::types::{CategoryId, CategoryTag};

pub mod category;
pub mod heading;
pub mod public_body;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category with its translations, ordered by tag.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve the category carrying `tag`.
    fn get_category_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<Option<Category>>;
    /// Heading links of one category ordered by display order.
    fn list_category_links(&self, id: CategoryId) -> RepositoryResult<Vec<CategoryHeadingLink>>;
    /// Every heading link, used to group categories on the index screen.
    fn list_all_links(&self) -> RepositoryResult<Vec<CategoryHeadingLink>>;
}

/// Write operations for category entities.
///
/// Each method writes the category row, its translations and its heading
/// links in a single transaction.
pub trait CategoryWriter {
    /// Persist a new category together with its heading placements.
    fn create_category(
        &self,
        category: &NewCategory,
        placements: &[HeadingPlacement],
    ) -> RepositoryResult<CategoryId>;
    /// Apply the target state of an existing category.
    fn update_category(&self, changes: &CategoryChanges) -> RepositoryResult<usize>;
    /// Delete a category with its translations and links.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for headings.
pub trait HeadingReader {
    /// List headings ordered by display order.
    fn list_headings(&self) -> RepositoryResult<Vec<Heading>>;
}

/// Read-only operations for public bodies, looked up by tag.
pub trait PublicBodyReader {
    /// Number of public bodies carrying `tag`.
    fn count_public_bodies_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<usize>;
    /// Public bodies carrying `tag`, ordered by id.
    fn list_public_bodies_by_tag(&self, tag: &CategoryTag) -> RepositoryResult<Vec<PublicBody>>;
}
