//! # Quill Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod forms;
mod handlers;
mod middleware;
mod oauth;
mod state;

use config::AppConfig;
use oauth::GithubOAuth;
use quill_core::ports::{PasswordService, TokenService};
use quill_infra::{
    Argon2PasswordService, JwtTokenService, PostgresCategoryRepository, PostgresPostRepository,
    PostgresProfileRepository,
};
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill web server on {}:{}",
        config.host,
        config.port
    );

    let db_config = config
        .database
        .clone()
        .ok_or_else(|| std::io::Error::other("DATABASE_URL must be set"))?;
    let db = db_config.connect().await.map_err(std::io::Error::other)?;

    let templates = tera::Tera::new(&format!("{}/**/*.html", config.template_dir))
        .map_err(std::io::Error::other)?;

    let github = config
        .github
        .clone()
        .map(|gh| Arc::new(GithubOAuth::new(gh, &config.public_base_url)));
    if github.is_none() {
        tracing::info!("GitHub OAuth not configured; password sign-in only");
    }

    let state = AppState {
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        profiles: Arc::new(PostgresProfileRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db)),
        templates: Arc::new(templates),
        github,
    };

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,web_server=debug,quill_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
