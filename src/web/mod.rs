//! Web layer for dsforum: routes, handlers, middleware, and pages.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;

pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
