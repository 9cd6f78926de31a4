use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, NewPost, Post, PostUpdate, PostWithAuthor, Profile};
use crate::error::DomainError;

/// Post repository - the store-facing contract for posts.
///
/// Read methods return plain collections: a store failure on a read is
/// logged by the implementation and collapses to empty/absent, never an
/// error. Write methods propagate the typed failure for display.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Published posts, newest first, each with its author attached.
    /// Author profiles are fetched in one batched query for the page.
    async fn list_published(&self) -> Vec<PostWithAuthor>;

    /// The unique published post with this slug. An unpublished slug
    /// resolves exactly like a nonexistent one, regardless of caller.
    async fn get_by_slug(&self, slug: &str) -> Option<PostWithAuthor>;

    /// All posts by this author, drafts included, newest first. The
    /// owner-dashboard path - deliberately skips the published filter.
    async fn list_by_author(&self, author_id: Uuid) -> Vec<Post>;

    /// Any post by primary key, for the edit page's advisory ownership
    /// check before rendering a form.
    async fn find_by_id(&self, id: Uuid) -> Option<Post>;

    /// Insert a new post owned by `author_id`. Fails `Validation` on empty
    /// required fields and `Duplicate` when the slug is already taken.
    async fn create(&self, author_id: Uuid, fields: NewPost) -> Result<Post, DomainError>;

    /// Replace a post's fields. Requires `requester_id` to match the
    /// current `author_id` (else `Unauthorized`, store untouched);
    /// advances `updated_at`.
    async fn update(
        &self,
        post_id: Uuid,
        requester_id: Uuid,
        fields: PostUpdate,
    ) -> Result<Post, DomainError>;

    /// Permanently delete a post. Same ownership requirement as `update`;
    /// no soft-delete.
    async fn delete(&self, post_id: Uuid, requester_id: Uuid) -> Result<(), DomainError>;
}

/// Profile repository. Profiles are provisioned at sign-up or first OAuth
/// sign-in and read-only afterwards.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Option<Profile>;

    async fn find_by_email(&self, email: &str) -> Option<Profile>;

    /// Insert a new profile. Fails `Duplicate` when the email is taken.
    async fn create(&self, profile: Profile) -> Result<Profile, DomainError>;
}

/// Category repository. Categories are reference data; both paths are
/// reads and collapse failures to empty.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, ordered by name.
    async fn list(&self) -> Vec<Category>;

    /// Categories attached to one post through the join table.
    async fn for_post(&self, post_id: Uuid) -> Vec<Category>;
}
