//! Typed query intents for the post read paths.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use super::entity::post;

/// The three read intents, each compiled to one fixed select shape.
/// Call sites pick a variant; they never assemble filters ad hoc.
#[derive(Debug, Clone)]
pub enum PostQuery {
    /// Publicly visible posts, newest first.
    Published,
    /// The unique published post with this slug. Unpublished posts are
    /// invisible through this intent no matter who asks.
    BySlug(String),
    /// Everything one author wrote, drafts included, newest first.
    ByAuthor(Uuid),
}

impl PostQuery {
    pub fn select(self) -> Select<post::Entity> {
        match self {
            PostQuery::Published => post::Entity::find()
                .filter(post::Column::Published.eq(true))
                .order_by_desc(post::Column::CreatedAt),
            PostQuery::BySlug(slug) => post::Entity::find()
                .filter(post::Column::Slug.eq(slug))
                .filter(post::Column::Published.eq(true)),
            PostQuery::ByAuthor(author_id) => post::Entity::find()
                .filter(post::Column::AuthorId.eq(author_id))
                .order_by_desc(post::Column::CreatedAt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: PostQuery) -> String {
        query.select().build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_published_intent_filters_and_orders() {
        let sql = sql(PostQuery::Published);
        assert!(sql.contains(r#""posts"."published" = TRUE"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "posts"."created_at" DESC"#),
            "{sql}"
        );
    }

    #[test]
    fn test_by_slug_intent_requires_published() {
        let sql = sql(PostQuery::BySlug("hello".to_owned()));
        assert!(sql.contains(r#""posts"."slug" = 'hello'"#), "{sql}");
        assert!(sql.contains(r#""posts"."published" = TRUE"#), "{sql}");
    }

    #[test]
    fn test_by_author_intent_skips_published_filter() {
        let author = Uuid::new_v4();
        let sql = sql(PostQuery::ByAuthor(author));
        assert!(sql.contains(&author.to_string()), "{sql}");
        let predicates = sql.split("WHERE").nth(1).unwrap().to_owned();
        assert!(!predicates.contains("published"), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "posts"."created_at" DESC"#),
            "{sql}"
        );
    }
}
