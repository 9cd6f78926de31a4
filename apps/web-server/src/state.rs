//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryRepository, PostRepository, ProfileRepository};

use crate::oauth::GithubOAuth;

/// Shared application state. Repository handles are injected here once at
/// startup; no handler reaches for a global client.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub templates: Arc<tera::Tera>,
    pub github: Option<Arc<GithubOAuth>>,
}
