//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_registry::domain::types::{HeadingId, PublicBodyId};
use pushkind_registry::schema::{headings, public_bodies, public_body_tags};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Inserts a heading; headings are managed outside of this service.
    pub fn heading(&self, name: &str, display_order: i32) -> HeadingId {
        let mut conn = self.pool.get().expect("should acquire DB connection");
        let id: i32 = diesel::insert_into(headings::table)
            .values((
                headings::name.eq(name),
                headings::display_order.eq(display_order),
            ))
            .returning(headings::id)
            .get_result(&mut conn)
            .expect("should insert heading");
        HeadingId::new(id).expect("valid heading id")
    }

    /// Inserts a public body carrying `tags`.
    pub fn public_body(&self, name: &str, tags: &[&str]) -> PublicBodyId {
        let mut conn = self.pool.get().expect("should acquire DB connection");
        let id: i32 = diesel::insert_into(public_bodies::table)
            .values(public_bodies::name.eq(name))
            .returning(public_bodies::id)
            .get_result(&mut conn)
            .expect("should insert public body");

        let rows: Vec<_> = tags
            .iter()
            .map(|tag| {
                (
                    public_body_tags::public_body_id.eq(id),
                    public_body_tags::name.eq(*tag),
                )
            })
            .collect();
        diesel::insert_into(public_body_tags::table)
            .values(&rows)
            .execute(&mut conn)
            .expect("should insert public body tags");

        PublicBodyId::new(id).expect("valid public body id")
    }
}
