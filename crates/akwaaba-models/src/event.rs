//! Events and their ticket tiers.
//!
//! An event belongs to exactly one organizer and carries one or more tiers.
//! Tiers are addressed by their index within the event; sold counts live in
//! the ticket ledger, not on the tier.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{EventId, UserId};

/// Default length of an event with no explicit end time.
pub const DEFAULT_EVENT_HOURS: i64 = 2;

/// Publication status stored on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Visible only to the owning organizer.
    #[default]
    Draft,
    /// Listed publicly and on sale.
    Published,
}

/// Status derived from publication state and start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Not yet published.
    Draft,
    /// Published and starting now or later.
    Upcoming,
    /// Published and already started.
    Past,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Draft => "draft",
            Lifecycle::Upcoming => "upcoming",
            Lifecycle::Past => "past",
        };
        f.write_str(s)
    }
}

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    /// A physical venue.
    Venue {
        /// Venue name.
        venue_name: String,
        /// Street address.
        #[serde(default)]
        address: String,
        /// City.
        #[serde(default)]
        city: String,
    },
    /// An online event.
    Online {
        /// Join URL.
        url: String,
    },
}

impl Location {
    /// Human-readable location, skipping blank venue parts.
    pub fn display(&self) -> String {
        match self {
            Location::Venue {
                venue_name,
                address,
                city,
            } => [venue_name, address, city]
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Location::Online { url } => url.trim().to_string(),
        }
    }
}

/// Counts for one tier at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Total tickets the tier offers.
    pub supply: u32,
    /// Tickets issued so far.
    pub sold: u32,
    /// Tickets still purchasable.
    pub available: u32,
}

/// A priced class of tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    /// Tier name (e.g. "Regular", "VIP").
    pub name: String,

    /// Unit price in minor currency units.
    pub price: u64,

    /// Number of tickets offered.
    pub supply: u32,

    /// Maximum tickets per purchase; 0 means no limit.
    #[serde(default)]
    pub per_order_limit: u32,

    /// Sales open at this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_start: Option<DateTime<Utc>>,

    /// Sales close after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_end: Option<DateTime<Utc>>,

    /// Whether tickets may be refunded.
    #[serde(default)]
    pub refundable: bool,
}

impl TicketTier {
    /// Creates a tier with no sales window and no per-order limit.
    pub fn new(name: impl Into<String>, price: u64, supply: u32) -> Self {
        Self {
            name: name.into(),
            price,
            supply,
            per_order_limit: 0,
            sales_start: None,
            sales_end: None,
            refundable: false,
        }
    }

    /// Sets the per-order limit.
    pub fn with_per_order_limit(mut self, limit: u32) -> Self {
        self.per_order_limit = limit;
        self
    }

    /// Sets the sales window.
    pub fn with_sales_window(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.sales_start = start;
        self.sales_end = end;
        self
    }

    /// Returns true if `now` falls inside the sales window.
    pub fn sales_open(&self, now: DateTime<Utc>) -> bool {
        if let Some(start) = self.sales_start {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.sales_end {
            if now > end {
                return false;
            }
        }
        true
    }

    /// Availability given the number already sold.
    pub fn availability(&self, sold: u32) -> Availability {
        Availability {
            supply: self.supply,
            sold,
            available: self.supply.saturating_sub(sold),
        }
    }

    /// Largest quantity a single purchase may request.
    pub fn max_per_order(&self, sold: u32) -> u32 {
        let available = self.availability(sold).available;
        if self.per_order_limit > 0 {
            self.per_order_limit.min(available)
        } else {
            available
        }
    }

    /// Total price for `quantity` tickets, or `None` if it does not fit in
    /// a `u64`.
    pub fn total_for(&self, quantity: u32) -> Option<u64> {
        self.price.checked_mul(u64::from(quantity))
    }
}

/// A ticketed occasion published by an organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,

    /// Owning organizer.
    pub organizer_id: UserId,

    /// Title.
    pub title: String,

    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Start time.
    pub starts_at: DateTime<Utc>,

    /// End time, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,

    /// Where it happens.
    pub location: Location,

    /// Category slugs.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Ticket tiers, addressed by index.
    pub tiers: Vec<TicketTier>,

    /// Draft or published.
    #[serde(default)]
    pub status: EventStatus,

    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,

    /// When the event was created.
    pub created_at: DateTime<Utc>,

    /// When the event was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a draft event with no tiers.
    pub fn new(
        organizer_id: impl Into<UserId>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        location: Location,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            organizer_id: organizer_id.into(),
            title: title.into(),
            description: String::new(),
            starts_at,
            ends_at: None,
            location,
            categories: Vec::new(),
            tiers: Vec::new(),
            status: EventStatus::Draft,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the event is publicly visible.
    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published
    }

    /// Returns true if `user_id` owns this event.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.organizer_id == *user_id
    }

    /// Draft, upcoming or past relative to `now`.
    pub fn lifecycle(&self, now: DateTime<Utc>) -> Lifecycle {
        match self.status {
            EventStatus::Draft => Lifecycle::Draft,
            EventStatus::Published if self.starts_at >= now => Lifecycle::Upcoming,
            EventStatus::Published => Lifecycle::Past,
        }
    }

    /// End time, defaulting to two hours after the start.
    pub fn ends_at_or_default(&self) -> DateTime<Utc> {
        self.ends_at
            .unwrap_or_else(|| self.starts_at + Duration::hours(DEFAULT_EVENT_HOURS))
    }

    /// Lowest tier price, if any tier exists.
    pub fn from_price(&self) -> Option<u64> {
        self.tiers.iter().map(|t| t.price).min()
    }

    /// Human-readable location.
    pub fn where_text(&self) -> String {
        self.location.display()
    }

    /// Looks up a tier by index.
    pub fn tier(&self, index: usize) -> Option<&TicketTier> {
        self.tiers.get(index)
    }

    /// Returns a fresh draft copy with " (Copy)" appended to the title.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        let mut copy = self.clone();
        copy.id = EventId::new();
        copy.title = format!("{} (Copy)", self.title);
        copy.status = EventStatus::Draft;
        copy.created_at = now;
        copy.updated_at = now;
        copy
    }

    /// Case-insensitive match of `needle` against title and description.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Bumps `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Location {
        Location::Venue {
            venue_name: "National Theatre".to_string(),
            address: "".to_string(),
            city: "Accra".to_string(),
        }
    }

    fn make_event(starts_in_hours: i64) -> Event {
        let mut event = Event::new(
            "usr-organizer",
            "Highlife Night",
            Utc::now() + Duration::hours(starts_in_hours),
            venue(),
        );
        event.tiers.push(TicketTier::new("Regular", 5000, 100));
        event.tiers.push(TicketTier::new("VIP", 15000, 10));
        event
    }

    #[test]
    fn test_lifecycle() {
        let now = Utc::now();
        let mut event = make_event(24);
        assert_eq!(event.lifecycle(now), Lifecycle::Draft);

        event.status = EventStatus::Published;
        assert_eq!(event.lifecycle(now), Lifecycle::Upcoming);

        let mut past = make_event(-24);
        past.status = EventStatus::Published;
        assert_eq!(past.lifecycle(now), Lifecycle::Past);
    }

    #[test]
    fn test_where_text_skips_blank_parts() {
        let event = make_event(1);
        assert_eq!(event.where_text(), "National Theatre, Accra");

        let online = Location::Online {
            url: " https://meet.example.com/x ".to_string(),
        };
        assert_eq!(online.display(), "https://meet.example.com/x");
    }

    #[test]
    fn test_from_price_and_default_end() {
        let event = make_event(1);
        assert_eq!(event.from_price(), Some(5000));
        assert_eq!(
            event.ends_at_or_default() - event.starts_at,
            Duration::hours(2)
        );
    }

    #[test]
    fn test_duplicate_is_draft_copy() {
        let mut event = make_event(1);
        event.status = EventStatus::Published;
        let copy = event.duplicate();

        assert_ne!(copy.id, event.id);
        assert_eq!(copy.title, "Highlife Night (Copy)");
        assert_eq!(copy.status, EventStatus::Draft);
        assert_eq!(copy.tiers, event.tiers);
        assert_eq!(copy.organizer_id, event.organizer_id);
    }

    #[test]
    fn test_tier_sales_window() {
        let now = Utc::now();
        let tier = TicketTier::new("Early", 1000, 5)
            .with_sales_window(Some(now + Duration::hours(1)), None);
        assert!(!tier.sales_open(now));

        let tier = TicketTier::new("Late", 1000, 5)
            .with_sales_window(None, Some(now - Duration::hours(1)));
        assert!(!tier.sales_open(now));

        let tier = TicketTier::new("Open", 1000, 5).with_sales_window(
            Some(now - Duration::hours(1)),
            Some(now + Duration::hours(1)),
        );
        assert!(tier.sales_open(now));
    }

    #[test]
    fn test_tier_availability_and_limits() {
        let tier = TicketTier::new("Regular", 2500, 3);
        assert_eq!(tier.availability(1).available, 2);
        assert_eq!(tier.availability(5).available, 0);
        assert_eq!(tier.max_per_order(0), 3);

        let limited = tier.clone().with_per_order_limit(2);
        assert_eq!(limited.max_per_order(0), 2);
        assert_eq!(limited.max_per_order(2), 1);
        assert_eq!(limited.total_for(2), Some(5000));

        let dear = TicketTier::new("Dear", u64::MAX / 2 + 1, 3);
        assert_eq!(dear.total_for(1), Some(u64::MAX / 2 + 1));
        assert_eq!(dear.total_for(2), None);

        let empty = TicketTier::new("Sold out", 100, 0);
        assert_eq!(empty.availability(0).available, 0);
    }

    #[test]
    fn test_matches_text() {
        let mut event = make_event(1);
        event.description = "Live band and dancing".to_string();
        assert!(event.matches_text("highlife"));
        assert!(event.matches_text("DANCING"));
        assert!(event.matches_text("  "));
        assert!(!event.matches_text("jazz"));
    }

    #[test]
    fn test_location_serde_tagged() {
        let json = serde_json::to_value(venue()).unwrap();
        assert_eq!(json["type"], "venue");
        assert_eq!(json["venue_name"], "National Theatre");

        let online: Location =
            serde_json::from_str(r#"{"type":"online","url":"https://x.test"}"#).unwrap();
        assert_eq!(
            online,
            Location::Online {
                url: "https://x.test".to_string()
            }
        );
    }
}
