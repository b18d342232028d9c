//! Middleware for the web layer.

pub mod security;
pub mod session;

pub use security::security_headers;
pub use session::{session_context, session_cookie, RequestContext, SESSION_COOKIE};
