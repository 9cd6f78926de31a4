//! Form payloads for the server-rendered pages.

use serde::{Deserialize, Serialize};

use quill_core::domain::{NewPost, Post, PostUpdate, slugify};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// The create/edit post form. Checkboxes arrive as `Some("on")` when
/// ticked and are absent otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl PostForm {
    /// A blank slug falls back to one derived from the title.
    fn slug_or_derived(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.title)
        } else {
            self.slug.trim().to_owned()
        }
    }

    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            title: self.title.trim().to_owned(),
            slug: self.slug_or_derived(),
            content: self.content.clone(),
            excerpt: none_if_empty(&self.excerpt),
            featured_image: none_if_empty(&self.featured_image),
            published: self.published.is_some(),
        }
    }

    pub fn to_update(&self) -> PostUpdate {
        PostUpdate {
            title: self.title.trim().to_owned(),
            slug: self.slug_or_derived(),
            content: self.content.clone(),
            excerpt: none_if_empty(&self.excerpt),
            featured_image: none_if_empty(&self.featured_image),
            published: self.published.is_some(),
        }
    }

    /// Prefill for the edit page.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            featured_image: post.featured_image.clone().unwrap_or_default(),
            published: post.published.then(|| "on".to_owned()),
        }
    }

    /// An empty form for the create page.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: String::new(),
            featured_image: String::new(),
            published: None,
        }
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PostForm {
        PostForm {
            title: "Hello, World!".to_string(),
            slug: String::new(),
            content: "Body".to_string(),
            excerpt: "  ".to_string(),
            featured_image: String::new(),
            published: Some("on".to_string()),
        }
    }

    #[test]
    fn test_blank_slug_is_derived_from_title() {
        let draft = form().to_new_post();

        assert_eq!(draft.slug, "hello-world");
        assert!(draft.published);
    }

    #[test]
    fn test_explicit_slug_wins() {
        let mut f = form();
        f.slug = " custom-slug ".to_string();

        assert_eq!(f.to_new_post().slug, "custom-slug");
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let draft = form().to_new_post();

        assert!(draft.excerpt.is_none());
        assert!(draft.featured_image.is_none());
    }

    #[test]
    fn test_unchecked_checkbox_means_draft() {
        let mut f = form();
        f.published = None;

        assert!(!f.to_update().published);
    }
}
