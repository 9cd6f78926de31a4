//! Authentication middleware and extractors.

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header};
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "quill_session";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a signed-in caller:
/// ```ignore
/// async fn dashboard(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::SEE_OTHER
    }

    /// Pages are server-rendered: an anonymous caller or a stale session
    /// is sent to the login page instead of a bare 401.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/auth/login"))
            .finish()
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }

    // Bearer header fallback, mostly for scripted checks
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        let token = match session_token(req) {
            Some(token) => token,
            None => return ready(Err(AuthenticationError(AuthError::MissingAuth))),
        };

        match token_service.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
/// Public pages use it to render the right navigation.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(_) => ready(Ok(OptionalIdentity(None))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use quill_infra::{JwtConfig, JwtTokenService};

    fn service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }))
    }

    #[actix_web::test]
    async fn test_identity_from_session_cookie() {
        let service = service();
        let user_id = uuid::Uuid::new_v4();
        let token = service.generate_token(user_id, "alice@example.com").unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(service))
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_http_request();

        let identity = Identity::from_request(&req, &mut Payload::None)
            .await
            .unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "alice@example.com");
    }

    #[actix_web::test]
    async fn test_missing_session_redirects_to_login() {
        let req = TestRequest::default()
            .app_data(web::Data::new(service()))
            .to_http_request();

        let err = Identity::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();

        let resp = actix_web::ResponseError::error_response(&err);
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/auth/login"
        );
    }

    #[actix_web::test]
    async fn test_garbage_token_is_rejected() {
        let req = TestRequest::default()
            .app_data(web::Data::new(service()))
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-jwt"))
            .to_http_request();

        assert!(
            Identity::from_request(&req, &mut Payload::None)
                .await
                .is_err()
        );
    }

    #[actix_web::test]
    async fn test_optional_identity_defaults_to_anonymous() {
        let req = TestRequest::default()
            .app_data(web::Data::new(service()))
            .to_http_request();

        let OptionalIdentity(identity) = OptionalIdentity::from_request(&req, &mut Payload::None)
            .await
            .unwrap();

        assert!(identity.is_none());
    }
}
