//! User accounts.
//!
//! A user is either an organizer (publishes events) or an attendee (buys
//! tickets). The role is fixed at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::UserId;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates and manages events.
    Organizer,
    /// Browses events and buys tickets.
    Attendee,
}

impl Role {
    /// Returns the lowercase role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "organizer",
            Role::Attendee => "attendee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organizer" => Ok(Role::Organizer),
            "attendee" => Ok(Role::Attendee),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account can log in.
    #[default]
    Active,
    /// Account has been disabled by an operator.
    Disabled,
}

/// Per-user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Whether the email address has been verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Whether the phone number has been verified.
    #[serde(default)]
    pub phone_verified: bool,
    /// Whether the user accepts marketing messages.
    #[serde(default)]
    pub marketing_opt_in: bool,
    /// Where organizer proceeds should be paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,

    /// Organizer or attendee.
    pub role: Role,

    /// Display name.
    pub full_name: String,

    /// Lower-cased email address (unique).
    pub email: String,

    /// Normalized phone number (unique).
    pub phone: String,

    /// Argon2 PHC string.
    pub password_hash: String,

    /// Active or disabled.
    #[serde(default)]
    pub status: AccountStatus,

    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Wallet address for payouts (organizers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,

    /// Settings.
    #[serde(default)]
    pub settings: UserSettings,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// Sessions started at or before this instant are void. Set when the
    /// account is disabled, so any process sharing the data directory sees it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_revoked_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active user.
    pub fn new(
        role: Role,
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            role,
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: password_hash.into(),
            status: AccountStatus::Active,
            avatar_url: None,
            wallet_address: None,
            settings: UserSettings::default(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
            sessions_revoked_at: None,
        }
    }

    /// Returns true if the account may log in.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Returns true for organizer accounts.
    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizer
    }

    /// Returns the first word of the full name, or "Friend".
    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("Friend")
    }

    /// Records a successful login.
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }

    /// Returns true if a session started at `started_at` may still be used.
    pub fn accepts_session(&self, started_at: DateTime<Utc>) -> bool {
        self.is_active()
            && self
                .sessions_revoked_at
                .map_or(true, |revoked| started_at > revoked)
    }

    /// Bumps `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
