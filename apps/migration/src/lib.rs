//! Schema migrations for the Quill database.

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_profiles;
mod m20250601_000002_create_posts;
mod m20250601_000003_create_categories;
mod m20250601_000004_create_post_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_profiles::Migration),
            Box::new(m20250601_000002_create_posts::Migration),
            Box::new(m20250601_000003_create_categories::Migration),
            Box::new(m20250601_000004_create_post_categories::Migration),
        ]
    }
}
