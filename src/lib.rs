//! dsforum - DoppelServe-Forum
//!
//! A minimal discussion forum: categories hold threads, threads hold
//! replies, accounts are session-based. Served as plain HTML over axum
//! with SQLite storage.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forum;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, Identity, Rules, SessionStore, ValidationError};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{ForumError, Result};
pub use forum::{
    Category, CategoryRepository, NewReply, NewThread, Reply, ReplyRepository, ReplyView, Thread,
    ThreadRepository, ThreadSummary, ThreadView,
};
pub use web::{AppState, WebServer};
