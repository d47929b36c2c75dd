//! In-memory login sessions keyed by opaque bearer tokens.

use std::collections::HashMap;
use std::sync::RwLock;

use akwaaba_models::{Role, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{poisoned, Result};

/// An authenticated login.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// Logged-in user.
    pub user_id: UserId,
    /// Role at login time.
    pub role: Role,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// When the session stops resolving.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true once `now` is past the expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues, resolves and revokes sessions.
#[derive(Debug)]
pub struct SessionManager {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    /// Creates a manager whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a 256-bit random token encoded as base64url (43 characters).
    fn generate_token() -> String {
        use base64::Engine;
        use rand::RngCore;

        let mut random_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Starts a session for `user_id`.
    pub fn create(&self, user_id: &UserId, role: Role) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            token: Self::generate_token(),
            user_id: user_id.clone(),
            role,
            created_at: now,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    /// Looks up a live session. Expired sessions are dropped.
    pub fn resolve(&self, token: &str) -> Result<Option<Session>> {
        let now = Utc::now();
        let found = {
            let sessions = self.sessions.read().map_err(poisoned)?;
            sessions.get(token).cloned()
        };
        match found {
            Some(s) if s.is_expired(now) => {
                self.revoke(token)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Ends one session. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(sessions.remove(token).is_some())
    }

    /// Ends every session of a user; returns how many were removed.
    pub fn revoke_user(&self, user_id: &UserId) -> Result<usize> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != *user_id);
        Ok(before - sessions.len())
    }

    /// Number of sessions held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Returns true if no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
