//! Error handling for page requests.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use quill_core::error::DomainError;

/// Application-level error type rendered as a plain HTML error page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Forbidden,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = match self {
            AppError::NotFound(detail) => detail.clone(),
            AppError::BadRequest(detail) => detail.clone(),
            AppError::Forbidden => "You do not have access to this resource.".to_string(),
            AppError::Conflict(detail) => detail.clone(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                // Never leak internals to the page
                "Something went wrong on our side.".to_string()
            }
        };

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(error_page(status, &detail))
    }
}

fn error_page(status: StatusCode, detail: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{status}</title></head>\n\
         <body><main style=\"max-width:36rem;margin:4rem auto;font-family:sans-serif\">\n\
         <h1>{status}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the front page</a></p>\n\
         </main></body></html>\n",
        tera::escape_html(detail)
    )
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        if err.is_transient() {
            tracing::error!(error = %err, "store failure on write path");
        }
        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} {} not found", entity, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Forbidden,
            DomainError::Store(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_page_statuses() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (
                DomainError::NotFound {
                    entity: "post",
                    id: Uuid::new_v4(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Validation("title must not be empty".into()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Duplicate("slug".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::FORBIDDEN),
            (
                DomainError::Store("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_error_page_escapes_detail() {
        let page = error_page(StatusCode::NOT_FOUND, "<script>alert(1)</script>");
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
