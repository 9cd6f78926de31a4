//! Authenticated dashboard - the author's own posts and the write flows.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::error::DomainError;

use crate::forms::PostForm;
use crate::handlers::{base_context, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /dashboard - the caller's posts, drafts included.
pub async fn dashboard(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(identity.user_id).await;

    let mut ctx = base_context(&OptionalIdentity(Some(identity)));
    ctx.insert("posts", &posts);
    render(&state, "dashboard.html", &ctx)
}

/// GET /dashboard/posts/new
pub async fn new_post_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let ctx = form_context(identity, "New post", "/dashboard/posts", PostForm::empty(), "");
    render(&state, "post_form.html", &ctx)
}

/// POST /dashboard/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let payload = form.into_inner();

    match state
        .posts
        .create(identity.user_id, payload.to_new_post())
        .await
    {
        Ok(_) => Ok(redirect("/dashboard")),
        Err(err) if is_form_error(&err) => {
            let ctx = form_context(
                identity,
                "New post",
                "/dashboard/posts",
                payload,
                &form_error_message(&err),
            );
            render(&state, "post_form.html", &ctx)
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /dashboard/posts/{id}/edit
///
/// The ownership check here only decides whether to render the form; the
/// repository re-verifies it when the edit is submitted.
pub async fn edit_post_form(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let Some(post) = state.posts.find_by_id(*id).await else {
        return Err(AppError::NotFound(format!("post {id} not found")));
    };
    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    let action = format!("/dashboard/posts/{id}");
    let ctx = form_context(identity, "Edit post", &action, PostForm::from_post(&post), "");
    render(&state, "post_form.html", &ctx)
}

/// POST /dashboard/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let payload = form.into_inner();

    match state
        .posts
        .update(*id, identity.user_id, payload.to_update())
        .await
    {
        Ok(_) => Ok(redirect("/dashboard")),
        Err(err) if is_form_error(&err) => {
            let action = format!("/dashboard/posts/{id}");
            let ctx = form_context(
                identity,
                "Edit post",
                &action,
                payload,
                &form_error_message(&err),
            );
            render(&state, "post_form.html", &ctx)
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /dashboard/posts/{id}/delete
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(*id, identity.user_id).await?;
    Ok(redirect("/dashboard"))
}

/// Errors worth re-rendering the form for; everything else becomes an
/// error page.
fn is_form_error(err: &DomainError) -> bool {
    matches!(err, DomainError::Validation(_) | DomainError::Duplicate(_))
}

fn form_error_message(err: &DomainError) -> String {
    match err {
        DomainError::Validation(msg) => msg.clone(),
        DomainError::Duplicate(_) => "That slug is already taken.".to_string(),
        other => other.to_string(),
    }
}

fn form_context(
    identity: Identity,
    heading: &str,
    action: &str,
    form: PostForm,
    error: &str,
) -> tera::Context {
    let mut ctx = base_context(&OptionalIdentity(Some(identity)));
    ctx.insert("heading", heading);
    ctx.insert("action", action);
    ctx.insert("form", &form);
    ctx.insert("error", error);
    ctx
}
