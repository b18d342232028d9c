//! Forum page handlers: index, category, thread, and posting.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::forum::{CategoryRepository, NewReply, NewThread, ReplyRepository, ThreadRepository};
use crate::web::error::PageError;
use crate::web::middleware::RequestContext;
use crate::web::pages;

use super::AppState;

/// Query string for paginated listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// New-thread form fields.
#[derive(Debug, Deserialize)]
pub struct NewThreadForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Reply form fields.
#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub body: String,
}

/// Parse a positive ID out of a path segment; anything else is a
/// redirect to the index page.
fn parse_id(raw: &str) -> Result<i64, PageError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(PageError::Gone),
    }
}

/// GET / - the category index.
pub async fn index(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, PageError> {
    let categories = CategoryRepository::new(state.db.pool()).list().await?;
    Ok(Html(pages::index_page(
        &state.site,
        ctx.identity.as_ref(),
        &categories,
    )))
}

/// GET /category/:id - threads in a category, newest first, paginated.
pub async fn view_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(raw_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let category_id = parse_id(&raw_id)?;
    let category = CategoryRepository::new(state.db.pool())
        .get_by_id(category_id)
        .await?
        .ok_or(PageError::Gone)?;

    let page = query.page.unwrap_or(1).max(1);
    // A misconfigured page size of 0 would divide by zero below
    let limit = state.site.threads_per_page.max(1);
    let offset = (page - 1) * limit;

    let threads_repo = ThreadRepository::new(state.db.pool());
    let threads = threads_repo
        .list_by_category(category_id, limit, offset)
        .await?;
    let total = threads_repo.count_by_category(category_id).await?;
    let total_pages = (total + limit - 1) / limit;

    Ok(Html(pages::category_page(
        &state.site,
        ctx.identity.as_ref(),
        &category,
        &threads,
        page,
        total_pages,
    )))
}

/// GET /thread/:id - a thread with its replies, oldest first.
pub async fn view_thread(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let thread_id = parse_id(&raw_id)?;
    let thread = ThreadRepository::new(state.db.pool())
        .get(thread_id)
        .await?
        .ok_or(PageError::Gone)?;
    let replies = ReplyRepository::new(state.db.pool())
        .list_by_thread(thread_id)
        .await?;

    let flash = state.sessions.take_flash(&ctx.sid);
    // The reply form (and its token) only exists for logged-in users
    let token = if ctx.is_logged_in() {
        state.sessions.token(&ctx.sid)
    } else {
        None
    };

    Ok(Html(pages::thread_page(
        &state.site,
        ctx.identity.as_ref(),
        &thread,
        &replies,
        token.as_deref(),
        flash.as_deref(),
    )))
}

fn render_new_thread(
    state: &AppState,
    ctx: &RequestContext,
    categories: &[crate::forum::Category],
    error: Option<&str>,
) -> Result<Html<String>, PageError> {
    let token = state
        .sessions
        .token(&ctx.sid)
        .ok_or_else(|| PageError::Internal("session missing for token generation".to_string()))?;
    Ok(Html(pages::new_thread_page(
        &state.site,
        ctx.identity.as_ref(),
        categories,
        &token,
        error,
    )))
}

/// GET /new-thread - the thread creation form. Requires login.
pub async fn new_thread_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, PageError> {
    ctx.require_login()?;
    let categories = CategoryRepository::new(state.db.pool()).list().await?;
    render_new_thread(&state, &ctx, &categories, None)
}

/// POST /new-thread - create a thread and redirect to the index page.
pub async fn new_thread_submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(form): Form<NewThreadForm>,
) -> Result<Response, PageError> {
    let identity = ctx.require_login()?.clone();
    let categories = CategoryRepository::new(state.db.pool()).list().await?;

    if !state.sessions.validate_token(&ctx.sid, &form.token) {
        return Ok(render_new_thread(&state, &ctx, &categories, Some("Invalid request"))?
            .into_response());
    }

    let title = match state.rules.validate_title(&form.title) {
        Ok(title) => title,
        Err(err) => {
            return Ok(render_new_thread(&state, &ctx, &categories, Some(&err.0))?
                .into_response());
        }
    };
    let body = match state.rules.validate_body(&form.body) {
        Ok(body) => body,
        Err(err) => {
            return Ok(render_new_thread(&state, &ctx, &categories, Some(&err.0))?
                .into_response());
        }
    };

    let category = match form.category_id.parse::<i64>() {
        Ok(id) if id > 0 => {
            CategoryRepository::new(state.db.pool())
                .get_by_id(id)
                .await?
        }
        _ => None,
    };
    let Some(category) = category else {
        return Ok(render_new_thread(&state, &ctx, &categories, Some("Select a category"))?
            .into_response());
    };

    let thread = ThreadRepository::new(state.db.pool())
        .create(&NewThread::new(identity.user_id, category.id, title, body))
        .await?;
    tracing::info!(
        thread_id = thread.id,
        user_id = identity.user_id,
        category_id = category.id,
        "Thread created"
    );

    Ok(Redirect::to("/").into_response())
}

/// POST /reply - add a reply and return to the thread.
///
/// A bad token silently redirects home; a validation failure leaves the
/// message in the session flash and returns to the thread page.
pub async fn reply_submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(form): Form<ReplyForm>,
) -> Result<Response, PageError> {
    let identity = ctx.require_login()?.clone();

    if !state.sessions.validate_token(&ctx.sid, &form.token) {
        return Err(PageError::Gone);
    }

    let thread_id = parse_id(&form.thread_id)?;
    ThreadRepository::new(state.db.pool())
        .get(thread_id)
        .await?
        .ok_or(PageError::Gone)?;

    match state.rules.validate_body(&form.body) {
        Ok(body) => {
            let reply = ReplyRepository::new(state.db.pool())
                .create(&NewReply::new(thread_id, identity.user_id, body))
                .await?;
            tracing::info!(
                reply_id = reply.id,
                thread_id,
                user_id = identity.user_id,
                "Reply created"
            );
        }
        Err(err) => {
            state.sessions.set_flash(&ctx.sid, &err.0);
        }
    }

    Ok(Redirect::to(&format!("/thread/{thread_id}")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7").unwrap(), 7);
        assert!(matches!(parse_id("0"), Err(PageError::Gone)));
        assert!(matches!(parse_id("-3"), Err(PageError::Gone)));
        assert!(matches!(parse_id("abc"), Err(PageError::Gone)));
        assert!(matches!(parse_id(""), Err(PageError::Gone)));
    }
}
