//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use quill_core::domain::{Author, Category, NewPost, Post, PostUpdate, PostWithAuthor, Profile};
use quill_core::error::DomainError;
use quill_core::ports::{CategoryRepository, PostRepository, ProfileRepository};

use super::entity::{category, post, post_category, profile};
use super::query::PostQuery;

/// Map a store failure on a write path into the domain taxonomy.
/// Unique-constraint violations become `Duplicate`; everything else is a
/// `Store` failure.
fn classify(err: sea_orm::DbErr) -> DomainError {
    let msg = err.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        DomainError::Duplicate(msg)
    } else {
        DomainError::Store(msg)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// One batched profile lookup covering the distinct author ids on a
    /// page. Bounds the read path to two round trips regardless of how
    /// many posts it returns.
    async fn authors_for(&self, rows: &[post::Model]) -> HashMap<Uuid, Author> {
        let ids: BTreeSet<Uuid> = rows.iter().map(|row| row.author_id).collect();
        if ids.is_empty() {
            return HashMap::new();
        }

        match profile::Entity::find()
            .filter(profile::Column::Id.is_in(ids))
            .all(&self.db)
            .await
        {
            Ok(profiles) => profiles
                .into_iter()
                .map(|p| (p.id, Author::from(p)))
                .collect(),
            Err(err) => {
                tracing::error!(error = %err, "author batch lookup failed, rendering anonymously");
                HashMap::new()
            }
        }
    }

    /// Load a post row and require `requester_id` to own it. Shared
    /// precondition of `update` and `delete`.
    async fn load_owned(&self, post_id: Uuid, requester_id: Uuid) -> Result<post::Model, DomainError> {
        let row = post::Entity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(classify)?
            .ok_or(DomainError::NotFound {
                entity: "post",
                id: post_id,
            })?;

        if row.author_id != requester_id {
            return Err(DomainError::Unauthorized);
        }
        Ok(row)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self) -> Vec<PostWithAuthor> {
        let rows = match PostQuery::Published.select().all(&self.db).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(error = %err, "failed to list published posts");
                return Vec::new();
            }
        };

        let authors = self.authors_for(&rows).await;
        rows.into_iter()
            .map(|row| {
                let author = authors.get(&row.author_id).cloned();
                PostWithAuthor {
                    post: row.into(),
                    author,
                }
            })
            .collect()
    }

    async fn get_by_slug(&self, slug: &str) -> Option<PostWithAuthor> {
        // The unique index makes more than one match impossible in a
        // healthy store; if it happens anyway, resolve as absent rather
        // than pick one.
        let mut rows = match PostQuery::BySlug(slug.to_owned()).select().all(&self.db).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(error = %err, slug, "failed to fetch post by slug");
                return None;
            }
        };
        if rows.len() > 1 {
            tracing::warn!(slug, matches = rows.len(), "slug collision, resolving as absent");
            return None;
        }
        let row = rows.pop()?;

        let author = match profile::Entity::find_by_id(row.author_id).one(&self.db).await {
            Ok(found) => found.map(Author::from),
            Err(err) => {
                tracing::error!(error = %err, "author lookup failed, rendering anonymously");
                None
            }
        };

        Some(PostWithAuthor {
            post: row.into(),
            author,
        })
    }

    async fn list_by_author(&self, author_id: Uuid) -> Vec<Post> {
        match PostQuery::ByAuthor(author_id).select().all(&self.db).await {
            Ok(rows) => rows.into_iter().map(Into::into).collect(),
            Err(err) => {
                tracing::error!(error = %err, %author_id, "failed to list posts by author");
                Vec::new()
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Option<Post> {
        match post::Entity::find_by_id(id).one(&self.db).await {
            Ok(row) => row.map(Into::into),
            Err(err) => {
                tracing::error!(error = %err, %id, "failed to fetch post by id");
                None
            }
        }
    }

    async fn create(&self, author_id: Uuid, fields: NewPost) -> Result<Post, DomainError> {
        fields.validate()?;

        let active: post::ActiveModel = Post::new(author_id, fields).into();
        let model = active.insert(&self.db).await.map_err(classify)?;
        Ok(model.into())
    }

    async fn update(
        &self,
        post_id: Uuid,
        requester_id: Uuid,
        fields: PostUpdate,
    ) -> Result<Post, DomainError> {
        fields.validate()?;

        let current = self.load_owned(post_id, requester_id).await?;
        let active: post::ActiveModel = fields.apply(current.into()).into();
        let model = active.update(&self.db).await.map_err(classify)?;
        Ok(model.into())
    }

    async fn delete(&self, post_id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
        self.load_owned(post_id, requester_id).await?;

        let result = post::Entity::delete_by_id(post_id)
            .exec(&self.db)
            .await
            .map_err(classify)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "post",
                id: post_id,
            });
        }
        Ok(())
    }
}

/// PostgreSQL profile repository.
pub struct PostgresProfileRepository {
    db: DbConn,
}

impl PostgresProfileRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Option<Profile> {
        match profile::Entity::find_by_id(id).one(&self.db).await {
            Ok(row) => row.map(Into::into),
            Err(err) => {
                tracing::error!(error = %err, %id, "failed to fetch profile by id");
                None
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Option<Profile> {
        match profile::Entity::find()
            .filter(profile::Column::Email.eq(email))
            .one(&self.db)
            .await
        {
            Ok(row) => row.map(Into::into),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch profile by email");
                None
            }
        }
    }

    async fn create(&self, profile: Profile) -> Result<Profile, DomainError> {
        let active: profile::ActiveModel = profile.into();
        let model = active.insert(&self.db).await.map_err(classify)?;
        Ok(model.into())
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Vec<Category> {
        match category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(Into::into).collect(),
            Err(err) => {
                tracing::error!(error = %err, "failed to list categories");
                Vec::new()
            }
        }
    }

    async fn for_post(&self, post_id: Uuid) -> Vec<Category> {
        match category::Entity::find()
            .join(JoinType::InnerJoin, category::Relation::PostCategories.def())
            .filter(post_category::Column::PostId.eq(post_id))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(Into::into).collect(),
            Err(err) => {
                tracing::error!(error = %err, %post_id, "failed to list post categories");
                Vec::new()
            }
        }
    }
}
