//! Login, registration, and logout handlers.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::{hash_password, verify_password};
use crate::db::{NewUser, UserRepository};
use crate::web::error::PageError;
use crate::web::middleware::{session_cookie, RequestContext};
use crate::web::pages;

use super::AppState;

/// Login form fields. Missing fields behave as empty strings.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form fields.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn form_token(state: &AppState, sid: &str) -> Result<String, PageError> {
    state
        .sessions
        .token(sid)
        .ok_or_else(|| PageError::Internal("session missing for token generation".to_string()))
}

fn render_login(
    state: &AppState,
    sid: &str,
    error: Option<&str>,
) -> Result<Html<String>, PageError> {
    let token = form_token(state, sid)?;
    Ok(Html(pages::login_page(&state.site, &token, error)))
}

fn render_register(
    state: &AppState,
    sid: &str,
    error: Option<&str>,
) -> Result<Html<String>, PageError> {
    let token = form_token(state, sid)?;
    Ok(Html(pages::register_page(&state.site, &token, error)))
}

/// GET /login - show the login form.
pub async fn login_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, PageError> {
    render_login(&state, &ctx.sid, None)
}

/// POST /login - check credentials and open a logged-in session.
///
/// Failures are deliberately indistinct: a bad username and a bad
/// password both produce "Invalid credentials".
pub async fn login_submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if !state.sessions.validate_token(&ctx.sid, &form.token) {
        return Ok(render_login(&state, &ctx.sid, Some("Invalid request"))?.into_response());
    }

    let username = match state.rules.validate_username(&form.username) {
        Ok(username) => username,
        Err(err) => {
            return Ok(render_login(&state, &ctx.sid, Some(&err.0))?.into_response());
        }
    };

    let repo = UserRepository::new(state.db.pool());
    let user = repo.get_by_username(&username).await?;

    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password).unwrap_or(false),
        None => false,
    };

    match (user, verified) {
        (Some(user), true) => {
            tracing::info!(user_id = user.id, username = %user.username, "User logged in");
            let new_sid = state.sessions.login(&ctx.sid, user.id, &user.username);
            let jar = jar.add(session_cookie(&new_sid));
            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => {
            tracing::debug!(username = %username, "Login rejected");
            Ok(render_login(&state, &ctx.sid, Some("Invalid credentials"))?.into_response())
        }
    }
}

/// GET /register - show the registration form.
pub async fn register_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, PageError> {
    render_register(&state, &ctx.sid, None)
}

/// POST /register - create an account and redirect to the login form.
pub async fn register_submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    if !state.sessions.validate_token(&ctx.sid, &form.token) {
        return Ok(render_register(&state, &ctx.sid, Some("Invalid request"))?.into_response());
    }

    let username = match state.rules.validate_username(&form.username) {
        Ok(username) => username,
        Err(err) => {
            return Ok(render_register(&state, &ctx.sid, Some(&err.0))?.into_response());
        }
    };
    if let Err(err) = state.rules.validate_password(&form.password) {
        return Ok(render_register(&state, &ctx.sid, Some(&err.0))?.into_response());
    }

    let repo = UserRepository::new(state.db.pool());
    if repo.username_exists(&username).await? {
        return Ok(render_register(&state, &ctx.sid, Some("Username taken"))?.into_response());
    }

    // The hash covers the password exactly as typed; validation trims
    // only for checking. Login verifies the raw value too.
    let hash = hash_password(&form.password)?;
    let user = repo.create(&NewUser::new(username, hash)).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Redirect::to("/login").into_response())
}

/// GET /logout - destroy the session and go home.
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Redirect {
    if let Some(identity) = &ctx.identity {
        tracing::info!(user_id = identity.user_id, "User logged out");
    }
    state.sessions.logout(&ctx.sid);
    Redirect::to("/")
}
