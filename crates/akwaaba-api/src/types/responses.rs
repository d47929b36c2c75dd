//! Response DTOs for the API.

use akwaaba_core::WalletTicket;
use akwaaba_models::{
    format_minor, AccountStatus, Availability, Event, Lifecycle, Role, TicketTier, User,
    UserId, UserSettings,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Whether the data directory is reachable.
    pub storage: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    /// Success message.
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A user as shown to clients; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub role: Role,
    pub full_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub settings: UserSettings,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            full_name: user.full_name.clone(),
            first_name: user.first_name().to_string(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            status: user.status,
            avatar_url: user.avatar_url.clone(),
            wallet_address: user.wallet_address.clone(),
            settings: user.settings.clone(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Bearer token for later requests.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserView,
}

/// An event on a listing page.
#[derive(Debug, Clone, Serialize)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "where")]
    pub where_text: String,
    pub categories: Vec<String>,
    /// Lowest tier price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            starts_at: event.starts_at,
            where_text: event.where_text(),
            categories: event.categories.clone(),
            from_price: event.from_price(),
            image: event.images.first().cloned(),
        }
    }
}

/// A tier with live availability.
#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub index: usize,
    pub name: String,
    pub price: u64,
    /// Price as a decimal string.
    pub price_display: String,
    pub per_order_limit: u32,
    pub sales_open: bool,
    pub sold_out: bool,
    #[serde(flatten)]
    pub availability: Availability,
}

impl TierView {
    pub fn new(index: usize, tier: &TicketTier, availability: Availability, now: DateTime<Utc>) -> Self {
        Self {
            index,
            name: tier.name.clone(),
            price: tier.price,
            price_display: format_minor(tier.price),
            per_order_limit: tier.per_order_limit,
            sales_open: tier.sales_open(now),
            sold_out: availability.available == 0,
            availability,
        }
    }
}

/// Public event page.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailResponse {
    pub event: Event,
    pub lifecycle: Lifecycle,
    #[serde(rename = "where")]
    pub where_text: String,
    pub tiers: Vec<TierView>,
    pub ics_url: String,
    pub google_calendar_url: String,
}

/// Category slugs in use.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// An attendee's tickets.
#[derive(Debug, Clone, Serialize)]
pub struct TicketsResponse {
    pub tickets: Vec<WalletTicket>,
    pub total: usize,
}

/// Newsletter subscription result.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    pub message: String,
    /// False when the email was already subscribed.
    pub created: bool,
}
