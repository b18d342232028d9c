//! Page handlers for dsforum.

pub mod auth;
pub mod forum;

pub use auth::*;
pub use forum::*;

use crate::auth::{Rules, SessionStore};
use crate::config::SiteConfig;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// In-memory session store.
    pub sessions: SessionStore,
    /// Input validation rules.
    pub rules: Rules,
    /// Site information for page rendering.
    pub site: SiteConfig,
}

impl AppState {
    /// Create a new application state with an empty session store.
    pub fn new(db: Database, rules: Rules, site: SiteConfig) -> Self {
        Self {
            db,
            sessions: SessionStore::new(),
            rules,
            site,
        }
    }
}
