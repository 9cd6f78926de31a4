use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Author;
use crate::error::DomainError;

/// Post entity - a blog post, draft or published.
///
/// `author_id` is fixed at creation and never reassigned. Only posts with
/// `published = true` are visible through the public read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id` from validated fields.
    pub fn new(author_id: Uuid, fields: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            slug: fields.slug,
            content: fields.content,
            excerpt: fields.excerpt,
            featured_image: fields.featured_image,
            published: fields.published,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A post with its author projection attached.
///
/// `author` is `None` when the profile lookup misses (author deleted, or the
/// batch query failed); the page renders it as "Anonymous" rather than
/// treating it as an error.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<Author>,
}

/// Fields supplied when creating a post. The author id is never part of
/// this payload - it comes from the authenticated session.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
}

impl NewPost {
    /// Title, slug and content are required.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_required(&self.title, &self.slug, &self.content)
    }
}

/// Full-field replacement applied by an update. Same required fields as
/// creation; `updated_at` is advanced by the repository.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_required(&self.title, &self.slug, &self.content)
    }

    /// Apply the changes to an existing post, advancing `updated_at`.
    pub fn apply(self, mut post: Post) -> Post {
        post.title = self.title;
        post.slug = self.slug;
        post.content = self.content;
        post.excerpt = self.excerpt;
        post.featured_image = self.featured_image;
        post.published = self.published;
        post.updated_at = Utc::now();
        post
    }
}

fn validate_required(title: &str, slug: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    if slug.trim().is_empty() {
        return Err(DomainError::Validation("slug must not be empty".into()));
    }
    if content.trim().is_empty() {
        return Err(DomainError::Validation("content must not be empty".into()));
    }
    Ok(())
}

/// Derive a URL slug from a title: lowercase, non-alphanumeric runs collapse
/// to a single hyphen, leading/trailing hyphens trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewPost {
        NewPost {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: "World".to_string(),
            excerpt: None,
            featured_image: None,
            published: false,
        }
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_required_fields() {
        for field in ["title", "slug", "content"] {
            let mut d = draft();
            match field {
                "title" => d.title = "  ".to_string(),
                "slug" => d.slug = String::new(),
                _ => d.content = "\n".to_string(),
            }
            let err = d.validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert!(err.to_string().contains(field));
        }
    }

    #[test]
    fn test_update_apply_advances_updated_at() {
        let post = Post::new(Uuid::new_v4(), draft());
        let before = post.updated_at;
        let update = PostUpdate {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            published: true,
        };
        let updated = update.apply(post);
        assert!(updated.published);
        assert!(updated.updated_at >= before);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & Tea  "), "rust-tea");
        assert_eq!(slugify("Already-Sluggy"), "already-sluggy");
        assert_eq!(slugify("???"), "");
    }
}
