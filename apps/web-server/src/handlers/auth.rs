//! Authentication handlers - login, signup, GitHub OAuth, logout.

use actix_web::{
    HttpRequest, HttpResponse,
    cookie::{Cookie, SameSite, time::Duration as CookieDuration},
    web,
};
use serde::Deserialize;
use std::sync::Arc;

use quill_core::domain::Profile;
use quill_core::error::DomainError;
use quill_core::ports::{PasswordService, TokenService};

use crate::handlers::{base_context, redirect, render};
use crate::middleware::auth::{OptionalIdentity, SESSION_COOKIE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// CSRF state cookie for the OAuth round trip.
const OAUTH_STATE_COOKIE: &str = "quill_oauth_state";

/// GET /auth/login
pub async fn login_page(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if identity.0.is_some() {
        return Ok(redirect("/dashboard"));
    }
    render(&state, "login.html", &auth_context(&state, "", ""))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<crate::forms::LoginForm>,
) -> AppResult<HttpResponse> {
    let req = form.into_inner();

    let Some(profile) = state.profiles.find_by_email(&req.email).await else {
        return login_failed(&state, &req.email);
    };

    // An OAuth-provisioned profile has no password credential.
    let Some(hash) = profile.password_hash.as_deref() else {
        return login_failed(&state, &req.email);
    };

    let valid = password_service
        .verify(&req.password, hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return login_failed(&state, &req.email);
    }

    signed_in(token_service.get_ref().as_ref(), &profile)
}

fn login_failed(state: &AppState, email: &str) -> AppResult<HttpResponse> {
    render(
        state,
        "login.html",
        &auth_context(state, email, "Invalid email or password."),
    )
}

/// GET /auth/signup
pub async fn signup_page(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if identity.0.is_some() {
        return Ok(redirect("/dashboard"));
    }
    render(&state, "signup.html", &auth_context(&state, "", ""))
}

/// POST /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<crate::forms::SignupForm>,
) -> AppResult<HttpResponse> {
    let req = form.into_inner();

    let signup_failed = |message: &str| {
        render(
            &state,
            "signup.html",
            &auth_context(&state, &req.email, message),
        )
    };

    if req.email.is_empty() || !req.email.contains('@') {
        return signup_failed("Please enter a valid email address.");
    }
    if req.password.len() < 8 {
        return signup_failed("Password must be at least 8 characters.");
    }
    if state.profiles.find_by_email(&req.email).await.is_some() {
        return signup_failed("That email is already registered.");
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let full_name = (!req.full_name.trim().is_empty()).then(|| req.full_name.trim().to_owned());
    let profile = Profile::new(req.email.clone(), full_name, password_hash);

    match state.profiles.create(profile).await {
        Ok(saved) => signed_in(token_service.get_ref().as_ref(), &saved),
        // Lost a race on the unique email index
        Err(DomainError::Duplicate(_)) => signup_failed("That email is already registered."),
        Err(err) => Err(err.into()),
    }
}

/// GET /auth/github - redirect the browser into the OAuth flow.
pub async fn github_redirect(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let Some(oauth) = &state.github else {
        return Err(AppError::NotFound("GitHub sign-in is not configured".into()));
    };

    let csrf = uuid::Uuid::new_v4().simple().to_string();
    let authorize = oauth.authorize_url(&csrf);

    Ok(HttpResponse::SeeOther()
        .cookie(
            Cookie::build(OAUTH_STATE_COOKIE, csrf)
                .path("/auth")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish(),
        )
        .insert_header((actix_web::http::header::LOCATION, authorize))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// GET /auth/callback - finish the OAuth flow and provision on first
/// sign-in.
pub async fn github_callback(
    req: HttpRequest,
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    query: web::Query<CallbackQuery>,
) -> AppResult<HttpResponse> {
    let Some(oauth) = &state.github else {
        return Err(AppError::NotFound("GitHub sign-in is not configured".into()));
    };

    let expected = req.cookie(OAUTH_STATE_COOKIE);
    if expected.as_ref().map(|c| c.value()) != Some(query.state.as_str()) {
        return Err(AppError::BadRequest("OAuth state mismatch".into()));
    }

    let gh_user = oauth
        .exchange_code(&query.code)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let email = gh_user.email_or_noreply();
    let profile = match state.profiles.find_by_email(&email).await {
        Some(existing) => existing,
        None => {
            state
                .profiles
                .create(Profile::from_oauth(
                    email,
                    gh_user.name.clone(),
                    gh_user.avatar_url.clone(),
                ))
                .await?
        }
    };

    let mut state_cookie = Cookie::build(OAUTH_STATE_COOKIE, "").path("/auth").finish();
    state_cookie.make_removal();

    let mut response = signed_in(token_service.get_ref().as_ref(), &profile)?;
    response
        .add_cookie(&state_cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// POST /auth/logout
pub async fn logout() -> HttpResponse {
    let mut session = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    session.make_removal();

    HttpResponse::SeeOther()
        .cookie(session)
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .finish()
}

/// Issue the session cookie and land on the dashboard.
fn signed_in(token_service: &dyn TokenService, profile: &Profile) -> AppResult<HttpResponse> {
    let token = token_service
        .generate_token(profile.id, &profile.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(token_service.expiration_seconds()))
        .finish();

    Ok(HttpResponse::SeeOther()
        .cookie(cookie)
        .insert_header((actix_web::http::header::LOCATION, "/dashboard"))
        .finish())
}

/// Context for the login/signup pages: previously entered email, error
/// message, and whether to offer the GitHub button.
fn auth_context(state: &AppState, email: &str, error: &str) -> tera::Context {
    let mut ctx = base_context(&OptionalIdentity(None));
    ctx.insert("email", email);
    ctx.insert("error", error);
    ctx.insert("oauth_enabled", &state.github.is_some());
    ctx
}
