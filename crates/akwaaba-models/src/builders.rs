//! Builder patterns for complex types.

use chrono::{DateTime, Utc};

use crate::event::{Event, EventStatus, Location, TicketTier};
use crate::ids::UserId;

/// Builder for creating Event instances with a fluent API.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    organizer_id: UserId,
    title: String,
    starts_at: DateTime<Utc>,
    location: Location,
    description: String,
    ends_at: Option<DateTime<Utc>>,
    categories: Vec<String>,
    tiers: Vec<TicketTier>,
    status: EventStatus,
}

impl EventBuilder {
    /// Creates a new EventBuilder with required fields.
    pub fn new(
        organizer_id: impl Into<UserId>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        location: Location,
    ) -> Self {
        Self {
            organizer_id: organizer_id.into(),
            title: title.into(),
            starts_at,
            location,
            description: String::new(),
            ends_at: None,
            categories: Vec::new(),
            tiers: Vec::new(),
            status: EventStatus::Draft,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the end time.
    pub fn ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    /// Adds a category slug.
    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.categories.push(slug.into());
        self
    }

    /// Adds a tier.
    pub fn tier(mut self, tier: TicketTier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Marks the event published.
    pub fn published(mut self) -> Self {
        self.status = EventStatus::Published;
        self
    }

    /// Builds the Event.
    pub fn build(self) -> Event {
        let mut event = Event::new(self.organizer_id, self.title, self.starts_at, self.location);
        event.description = self.description;
        event.ends_at = self.ends_at;
        event.categories = self.categories;
        event.tiers = self.tiers;
        event.status = self.status;
        event
    }
}

/// Convenience methods on Event for creating builders.
impl Event {
    /// Creates a builder for a new event.
    pub fn builder(
        organizer_id: impl Into<UserId>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        location: Location,
    ) -> EventBuilder {
        EventBuilder::new(organizer_id, title, starts_at, location)
    }

    /// Creates a published online event with a single tier.
    pub fn online(
        organizer_id: impl Into<UserId>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        url: impl Into<String>,
        tier: TicketTier,
    ) -> Self {
        EventBuilder::new(
            organizer_id,
            title,
            starts_at,
            Location::Online { url: url.into() },
        )
        .tier(tier)
        .published()
        .build()
    }
}
