//! Authentication module for dsforum.
//!
//! Password hashing, form-input validation, and the in-memory session
//! store used by the web layer.

pub mod password;
pub mod session;
pub mod validation;

pub use password::{hash_password, verify_password};
pub use session::{Identity, SessionStore};
pub use validation::{Rules, ValidationError};
