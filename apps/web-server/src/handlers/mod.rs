//! HTTP handlers and route configuration.

mod auth;
mod dashboard;
mod health;
mod pages;

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::home))
        .route("/health", web::get().to(health::health_check))
        .route("/posts/{slug}", web::get().to(pages::post_detail))
        .service(
            web::scope("/dashboard")
                .route("", web::get().to(dashboard::dashboard))
                .route("/posts/new", web::get().to(dashboard::new_post_form))
                .route("/posts", web::post().to(dashboard::create_post))
                .route("/posts/{id}/edit", web::get().to(dashboard::edit_post_form))
                .route("/posts/{id}", web::post().to(dashboard::update_post))
                .route("/posts/{id}/delete", web::post().to(dashboard::delete_post)),
        )
        .service(
            web::scope("/auth")
                .route("/login", web::get().to(auth::login_page))
                .route("/login", web::post().to(auth::login))
                .route("/signup", web::get().to(auth::signup_page))
                .route("/signup", web::post().to(auth::signup))
                .route("/github", web::get().to(auth::github_redirect))
                .route("/callback", web::get().to(auth::github_callback))
                .route("/logout", web::post().to(auth::logout)),
        );
}

/// Render a template into an HTML response.
pub(crate) fn render(state: &AppState, name: &str, ctx: &tera::Context) -> AppResult<HttpResponse> {
    let body = state
        .templates
        .render(name, ctx)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Context pre-populated with what the base layout expects.
pub(crate) fn base_context(identity: &OptionalIdentity) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert("current_user", &identity.0);
    ctx
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
