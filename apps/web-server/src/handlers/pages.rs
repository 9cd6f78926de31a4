//! Public pages - home listing and post detail.

use actix_web::{HttpResponse, web};

use crate::handlers::{base_context, render};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET / - published posts, newest first.
pub async fn home(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await;

    let mut ctx = base_context(&identity);
    ctx.insert("posts", &posts);
    render(&state, "index.html", &ctx)
}

/// GET /posts/{slug} - published post detail.
///
/// Unknown and unpublished slugs are indistinguishable here: both 404.
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let Some(item) = state.posts.get_by_slug(&slug).await else {
        return Err(AppError::NotFound(format!("no post at /posts/{slug}")));
    };

    let categories = state.categories.for_post(item.post.id).await;

    let mut ctx = base_context(&identity);
    ctx.insert("content_html", &content_to_html(&item.post.content));
    ctx.insert("item", &item);
    ctx.insert("categories", &categories);
    render(&state, "post.html", &ctx)
}

/// Escape the raw post body, then turn newlines into `<br>` - the same
/// minimal rendering the post editor assumes.
fn content_to_html(content: &str) -> String {
    tera::escape_html(content).replace('\n', "<br>\n")
}
