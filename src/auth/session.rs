//! In-memory session store for dsforum.
//!
//! Sessions are keyed by a random ID carried in the `forum_sid` cookie.
//! Each session holds the logged-in identity (if any), a lazily created
//! form token, and a one-shot flash message. The store is process-local;
//! restarting the server logs everyone out.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// The logged-in user attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Default, Clone)]
struct SessionData {
    identity: Option<Identity>,
    token: Option<String>,
    flash: Option<String>,
}

/// Thread-safe in-memory session store.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SessionData>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionData>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve the session for an incoming request.
    ///
    /// Returns the session ID plus whether it was newly created (and so
    /// needs a Set-Cookie on the response). An unknown or absent cookie
    /// value gets a fresh session.
    pub fn ensure(&self, cookie_sid: Option<&str>) -> (String, bool) {
        if let Some(sid) = cookie_sid {
            if self.read().contains_key(sid) {
                return (sid.to_string(), false);
            }
        }
        let sid = Uuid::new_v4().to_string();
        self.write().insert(sid.clone(), SessionData::default());
        (sid, true)
    }

    /// Get the identity logged into a session, if any.
    pub fn identity(&self, sid: &str) -> Option<Identity> {
        self.read().get(sid).and_then(|s| s.identity.clone())
    }

    /// Attach a logged-in identity to a session, rotating its ID.
    ///
    /// The old ID becomes invalid immediately; a cookie captured before
    /// login cannot be replayed into the authenticated session. Returns
    /// the new session ID.
    pub fn login(&self, sid: &str, user_id: i64, username: &str) -> String {
        let mut sessions = self.write();
        let mut data = sessions.remove(sid).unwrap_or_default();
        data.identity = Some(Identity {
            user_id,
            username: username.to_string(),
        });
        let new_sid = Uuid::new_v4().to_string();
        sessions.insert(new_sid.clone(), data);
        new_sid
    }

    /// Destroy a session entirely.
    pub fn logout(&self, sid: &str) {
        self.write().remove(sid);
    }

    /// Get the session's form token, creating it on first use.
    ///
    /// Returns `None` if the session does not exist.
    pub fn token(&self, sid: &str) -> Option<String> {
        let mut sessions = self.write();
        let data = sessions.get_mut(sid)?;
        if data.token.is_none() {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            data.token = Some(token);
        }
        data.token.clone()
    }

    /// Check a submitted form token against the session's token.
    ///
    /// Comparison is constant-time. Returns `false` when the session is
    /// missing or has never issued a token.
    pub fn validate_token(&self, sid: &str, submitted: &str) -> bool {
        let stored = match self.read().get(sid).and_then(|s| s.token.clone()) {
            Some(t) => t,
            None => return false,
        };
        stored.as_bytes().ct_eq(submitted.as_bytes()).into()
    }

    /// Store a one-shot message on the session.
    pub fn set_flash(&self, sid: &str, message: &str) {
        if let Some(data) = self.write().get_mut(sid) {
            data.flash = Some(message.to_string());
        }
    }

    /// Take (and clear) the session's one-shot message.
    pub fn take_flash(&self, sid: &str) -> Option<String> {
        self.write().get_mut(sid).and_then(|s| s.flash.take())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
