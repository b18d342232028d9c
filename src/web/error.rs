//! Page error handling for dsforum.
//!
//! Errors at the page boundary become redirects or a generic failure
//! page. Storage error detail is logged, never shown to the client.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::ForumError;

/// Error type returned by page handlers.
#[derive(Debug)]
pub enum PageError {
    /// The action requires a logged-in session. Redirects to the login page.
    RequiresLogin,
    /// The requested resource does not exist. Redirects to the index page.
    Gone,
    /// An internal failure. Logged, then rendered as a generic 500 page.
    Internal(String),
}

impl From<ForumError> for PageError {
    fn from(err: ForumError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::RequiresLogin => Redirect::to("/login").into_response(),
            PageError::Gone => Redirect::to("/").into_response(),
            PageError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                let body = "<!DOCTYPE html>\n<html lang=\"en\"><head>\
                            <meta charset=\"UTF-8\"><title>Error</title></head>\
                            <body><h2>Something went wrong</h2>\
                            <p>Please try again later.</p></body></html>\n";
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login_redirects() {
        let response = PageError::RequiresLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }

    #[test]
    fn test_gone_redirects_home() {
        let response = PageError::Gone.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");
    }

    #[test]
    fn test_internal_is_generic_500() {
        let response = PageError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_forum_error() {
        let err = PageError::from(ForumError::Database("locked".to_string()));
        assert!(matches!(err, PageError::Internal(_)));
    }
}
