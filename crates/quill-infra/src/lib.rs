//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the PostgreSQL repositories and the authentication
//! services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresPostRepository, PostgresProfileRepository,
};
