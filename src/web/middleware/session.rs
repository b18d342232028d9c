//! Session middleware.
//!
//! Resolves the `forum_sid` cookie to a session in the store and attaches
//! a [`RequestContext`] extension carrying the session ID and the
//! logged-in identity, if any. Handlers never touch the cookie directly
//! except to rotate it at login.

use axum::{
    body::Body,
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::Identity;
use crate::web::error::PageError;
use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "forum_sid";

/// Per-request session context, attached as a request extension.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The session ID for this request.
    pub sid: String,
    /// The logged-in user, if any.
    pub identity: Option<Identity>,
}

impl RequestContext {
    /// Whether a user is logged into this session.
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Get the logged-in identity or fail with a redirect to the login page.
    pub fn require_login(&self) -> Result<&Identity, PageError> {
        self.identity.as_ref().ok_or(PageError::RequiresLogin)
    }
}

/// Build the session cookie for a given session ID.
pub fn session_cookie(sid: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, sid.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn response_sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().map(|s| s.starts_with(SESSION_COOKIE)).unwrap_or(false))
}

/// Session middleware.
///
/// Unknown or absent cookies get a fresh session; the Set-Cookie for it
/// goes out on the response unless a handler already set one (login
/// rotation sets its own).
pub async fn session_context(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookie_sid = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (sid, created) = state.sessions.ensure(cookie_sid.as_deref());
    let identity = state.sessions.identity(&sid);

    req.extensions_mut().insert(RequestContext {
        sid: sid.clone(),
        identity,
    });

    let mut response = next.run(req).await;

    if created && !response_sets_session_cookie(&response) {
        let cookie = session_cookie(&sid);
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}
