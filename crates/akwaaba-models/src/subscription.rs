//! Newsletter subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source recorded when a subscriber does not name one.
pub const DEFAULT_SOURCE: &str = "homepage";

/// A newsletter subscription, keyed by lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscriber email (lower-cased).
    pub email: String,
    /// Where the subscription came from.
    pub source: String,
    /// Client IP of the latest request.
    #[serde(default)]
    pub ip: String,
    /// User agent of the latest request.
    #[serde(default)]
    pub user_agent: String,
    /// First subscription time.
    pub created_at: DateTime<Utc>,
    /// Latest subscription time.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a new subscription.
    pub fn new(
        email: impl Into<String>,
        source: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            source: source.into(),
            ip: ip.into(),
            user_agent: user_agent.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the mutable fields, keeping `created_at`.
    pub fn refresh(&mut self, source: String, ip: String, user_agent: String) {
        self.source = source;
        self.ip = ip;
        self.user_agent = user_agent;
        self.updated_at = Utc::now();
    }
}
