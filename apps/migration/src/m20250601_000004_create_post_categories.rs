use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_posts::Posts;
use super::m20250601_000003_create_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostCategories::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostCategories::CategoryId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostCategories::PostId)
                            .col(PostCategories::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_categories_post")
                            .from(PostCategories::Table, PostCategories::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_categories_category")
                            .from(PostCategories::Table, PostCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PostCategories {
    Table,
    PostId,
    CategoryId,
}
