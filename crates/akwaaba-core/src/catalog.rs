//! Event catalog: organizer event management and public browsing.
//!
//! Events are indexed in memory behind an `RwLock` and persisted through
//! [`EventStore`] before the index changes. Updates and deletions consult
//! the [`Ledger`] for sold counts and take its lock before the catalog's.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use akwaaba_models::{Event, EventId, EventStatus, Location, Role, TicketTier, User, UserId};
use akwaaba_persistence::EventStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::require_role;
use crate::error::{poisoned, CoreError, Result};
use crate::filter::{OrganizerEventQuery, PublicEventQuery};
use crate::ledger::Ledger;
use crate::pagination::Page;
use crate::validation::{is_valid_slug, MIN_TITLE_LEN};

/// A tier as submitted by an organizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TierDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub supply: u32,
    #[serde(default)]
    pub per_order_limit: u32,
    #[serde(default)]
    pub sales_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sales_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refundable: bool,
}

impl TierDraft {
    /// A named tier with price and supply.
    pub fn new(name: impl Into<String>, price: u64, supply: u32) -> Self {
        Self {
            name: name.into(),
            price,
            supply,
            ..Default::default()
        }
    }
}

/// Event fields as submitted for create or update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tiers: Vec<TierDraft>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A draft that passed validation.
struct ValidDraft {
    title: String,
    description: String,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    location: Location,
    categories: Vec<String>,
    tiers: Vec<TicketTier>,
    images: Vec<String>,
}

impl ValidDraft {
    fn apply(self, event: &mut Event) {
        event.title = self.title;
        event.description = self.description;
        event.starts_at = self.starts_at;
        event.ends_at = self.ends_at;
        event.location = self.location;
        event.categories = self.categories;
        event.tiers = self.tiers;
        event.images = self.images;
    }
}

fn location_problem(location: &Option<Location>) -> Option<String> {
    match location {
        None => Some("Location is required".to_string()),
        Some(Location::Venue { venue_name, .. }) if venue_name.trim().is_empty() => {
            Some("Venue name is required".to_string())
        }
        Some(Location::Online { url }) if url.trim().is_empty() => {
            Some("Online URL is required".to_string())
        }
        Some(Location::Online { url }) => match url::Url::parse(url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
            _ => Some("Online URL must be an http(s) link".to_string()),
        },
        Some(Location::Venue { .. }) => None,
    }
}

fn trim_location(location: Location) -> Location {
    match location {
        Location::Venue {
            venue_name,
            address,
            city,
        } => Location::Venue {
            venue_name: venue_name.trim().to_string(),
            address: address.trim().to_string(),
            city: city.trim().to_string(),
        },
        Location::Online { url } => Location::Online {
            url: url.trim().to_string(),
        },
    }
}

impl EventDraft {
    fn validate(self) -> Result<ValidDraft> {
        let mut problems = Vec::new();

        let title = self.title.trim().to_string();
        if title.chars().count() < MIN_TITLE_LEN {
            problems.push(format!(
                "Title must be at least {} characters",
                MIN_TITLE_LEN
            ));
        }

        match (self.starts_at, self.ends_at) {
            (None, _) => problems.push("Start date and time is required".to_string()),
            (Some(start), Some(end)) if end < start => {
                problems.push("End time must be after the start time".to_string())
            }
            _ => {}
        }

        if let Some(problem) = location_problem(&self.location) {
            problems.push(problem);
        }

        let tiers: Vec<TicketTier> = self
            .tiers
            .into_iter()
            .filter(|t| !t.name.trim().is_empty())
            .map(|t| TicketTier {
                name: t.name.trim().to_string(),
                price: t.price,
                supply: t.supply,
                per_order_limit: t.per_order_limit,
                sales_start: t.sales_start,
                sales_end: t.sales_end,
                refundable: t.refundable,
            })
            .collect();
        if tiers.is_empty() {
            problems.push("Add at least one ticket tier with a name".to_string());
        }
        let gross = tiers.iter().try_fold(0u64, |acc, t| {
            t.total_for(t.supply).and_then(|v| acc.checked_add(v))
        });
        if gross.is_none() {
            problems.push("Ticket prices times supply are too large to sell".to_string());
        }
        for tier in &tiers {
            if let (Some(start), Some(end)) = (tier.sales_start, tier.sales_end) {
                if end < start {
                    problems.push(format!(
                        "Tier '{}': sales end must be after sales start",
                        tier.name
                    ));
                }
            }
        }

        let mut categories = Vec::new();
        for raw in &self.categories {
            let slug = raw.trim().to_lowercase();
            if is_valid_slug(&slug) && !categories.contains(&slug) {
                categories.push(slug);
            }
        }

        let (Some(starts_at), Some(location), true) =
            (self.starts_at, self.location, problems.is_empty())
        else {
            return Err(CoreError::Validation(problems));
        };

        Ok(ValidDraft {
            title,
            description: self.description.trim().to_string(),
            starts_at,
            ends_at: self.ends_at,
            location: trim_location(location),
            categories,
            tiers,
            images: self
                .images
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
        })
    }
}

/// A row on the organizer's event list.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerEventRow {
    pub event: Event,
    /// Total supply across tiers.
    pub supply: u32,
    /// Tickets sold across tiers.
    pub sold: u32,
}

/// Event catalog service.
#[derive(Debug)]
pub struct Catalog {
    store: EventStore,
    events: RwLock<HashMap<EventId, Event>>,
    ledger: Arc<Ledger>,
}

impl Catalog {
    /// Loads every stored event into the index.
    pub fn load(store: EventStore, ledger: Arc<Ledger>) -> Result<Self> {
        let events: HashMap<EventId, Event> = store
            .list()?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        tracing::debug!(count = events.len(), "Loaded events");
        Ok(Self {
            store,
            events: RwLock::new(events),
            ledger,
        })
    }

    /// Creates an event, published immediately when `publish` is set.
    pub fn create(&self, organizer: &User, draft: EventDraft, publish: bool) -> Result<Event> {
        require_role(organizer, Role::Organizer)?;
        let valid = draft.validate()?;

        let mut event = Event::new(
            organizer.id.clone(),
            valid.title.clone(),
            valid.starts_at,
            valid.location.clone(),
        );
        valid.apply(&mut event);
        if publish {
            event.status = EventStatus::Published;
        }

        let mut events = self.events.write().map_err(poisoned)?;
        self.store.save(&event)?;
        events.insert(event.id.clone(), event.clone());

        info!(event_id = %event.id, organizer_id = %organizer.id, published = publish, "Event created");
        Ok(event)
    }

    /// Replaces an event's editable fields.
    ///
    /// Tickets point at their tier by position, so a tier that has sales
    /// must keep its name and position and cannot shrink below what it sold.
    pub fn update(&self, organizer: &User, id: &EventId, draft: EventDraft) -> Result<Event> {
        require_role(organizer, Role::Organizer)?;
        let valid = draft.validate()?;

        let ledger = self.ledger.lock()?;
        let mut events = self.events.write().map_err(poisoned)?;
        let mut event = owned(&events, organizer, id)?.clone();

        for (index, old_tier) in event.tiers.iter().enumerate() {
            let sold = ledger.sold(id, index);
            if sold == 0 {
                continue;
            }
            match valid.tiers.get(index) {
                Some(new_tier) if new_tier.name == old_tier.name => {
                    if new_tier.supply < sold {
                        return Err(CoreError::Conflict(format!(
                            "Tier '{}' supply cannot go below the {} ticket(s) already sold",
                            new_tier.name, sold
                        )));
                    }
                }
                _ if valid.tiers.iter().any(|t| t.name == old_tier.name) => {
                    return Err(CoreError::Conflict(format!(
                        "Tier '{}' has sales and must stay in position {}",
                        old_tier.name,
                        index + 1
                    )))
                }
                _ => {
                    return Err(CoreError::Conflict(format!(
                        "Tier '{}' has sales and cannot be removed or renamed",
                        old_tier.name
                    )))
                }
            }
        }

        valid.apply(&mut event);
        event.touch();
        self.store.save(&event)?;
        events.insert(event.id.clone(), event.clone());

        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Makes an event publicly visible.
    pub fn publish(&self, organizer: &User, id: &EventId) -> Result<Event> {
        self.set_status(organizer, id, EventStatus::Published)
    }

    /// Returns an event to draft.
    pub fn unpublish(&self, organizer: &User, id: &EventId) -> Result<Event> {
        self.set_status(organizer, id, EventStatus::Draft)
    }

    fn set_status(&self, organizer: &User, id: &EventId, status: EventStatus) -> Result<Event> {
        require_role(organizer, Role::Organizer)?;
        let mut events = self.events.write().map_err(poisoned)?;
        let mut event = owned(&events, organizer, id)?.clone();
        if event.status == status {
            return Ok(event);
        }

        event.status = status;
        event.touch();
        self.store.save(&event)?;
        events.insert(event.id.clone(), event.clone());

        info!(event_id = %event.id, status = ?status, "Event status changed");
        Ok(event)
    }

    /// Copies an event into a new draft titled "... (Copy)".
    pub fn duplicate(&self, organizer: &User, id: &EventId) -> Result<Event> {
        require_role(organizer, Role::Organizer)?;
        let mut events = self.events.write().map_err(poisoned)?;
        let copy = owned(&events, organizer, id)?.duplicate();

        self.store.save(&copy)?;
        events.insert(copy.id.clone(), copy.clone());

        info!(source_id = %id, event_id = %copy.id, "Event duplicated");
        Ok(copy)
    }

    /// Deletes an event that has no sold tickets.
    pub fn delete(&self, organizer: &User, id: &EventId) -> Result<()> {
        require_role(organizer, Role::Organizer)?;
        let ledger = self.ledger.lock()?;
        let mut events = self.events.write().map_err(poisoned)?;
        owned(&events, organizer, id)?;

        let sold = ledger.sold_for_event(id);
        if sold > 0 {
            return Err(CoreError::Conflict(format!(
                "Event has {} sold ticket(s) and cannot be deleted",
                sold
            )));
        }

        self.store.delete(id)?;
        events.remove(id);
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Lists an organizer's events, newest created first.
    pub fn list_for_organizer(
        &self,
        organizer: &User,
        query: &OrganizerEventQuery,
        now: DateTime<Utc>,
    ) -> Result<Page<OrganizerEventRow>> {
        require_role(organizer, Role::Organizer)?;
        let mut mine: Vec<Event> = {
            let events = self.events.read().map_err(poisoned)?;
            events
                .values()
                .filter(|e| e.is_owned_by(&organizer.id) && query.matches(e, now))
                .cloned()
                .collect()
        };
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let page = Page::from_vec(mine, query.page, query.per_page, false);
        let ledger = self.ledger.lock()?;
        Ok(page.map(|event| OrganizerEventRow {
            supply: event.tiers.iter().fold(0, |n, t| n.saturating_add(t.supply)),
            sold: ledger.sold_for_event(&event.id),
            event,
        }))
    }

    /// Every event owned by `organizer_id`.
    pub fn events_of(&self, organizer_id: &UserId) -> Result<Vec<Event>> {
        let events = self.events.read().map_err(poisoned)?;
        Ok(events
            .values()
            .filter(|e| e.is_owned_by(organizer_id))
            .cloned()
            .collect())
    }

    /// Public listing: published events ordered by start time.
    pub fn browse(&self, query: &PublicEventQuery) -> Result<Page<Event>> {
        let mut found: Vec<Event> = {
            let events = self.events.read().map_err(poisoned)?;
            events
                .values()
                .filter(|e| query.matches(e))
                .cloned()
                .collect()
        };
        found.sort_by(|a, b| {
            a.starts_at
                .cmp(&b.starts_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(Page::from_vec(found, query.page, query.per_page, true))
    }

    /// Distinct category slugs of published events, sorted.
    pub fn categories(&self) -> Result<Vec<String>> {
        let events = self.events.read().map_err(poisoned)?;
        let slugs: BTreeSet<String> = events
            .values()
            .filter(|e| e.is_published())
            .flat_map(|e| e.categories.iter())
            .filter(|c| is_valid_slug(c))
            .cloned()
            .collect();
        Ok(slugs.into_iter().collect())
    }

    /// Any event by id, regardless of status or owner.
    pub fn find(&self, id: &EventId) -> Result<Option<Event>> {
        let events = self.events.read().map_err(poisoned)?;
        Ok(events.get(id).cloned())
    }

    /// A published event; drafts are reported as missing.
    pub fn get_published(&self, id: &EventId) -> Result<Event> {
        let events = self.events.read().map_err(poisoned)?;
        events
            .get(id)
            .filter(|e| e.is_published())
            .cloned()
            .ok_or_else(|| CoreError::not_found("event"))
    }

    /// An event owned by `organizer`.
    pub fn get_owned(&self, organizer: &User, id: &EventId) -> Result<Event> {
        require_role(organizer, Role::Organizer)?;
        let events = self.events.read().map_err(poisoned)?;
        owned(&events, organizer, id).cloned()
    }
}

fn owned<'a>(
    events: &'a HashMap<EventId, Event>,
    organizer: &User,
    id: &EventId,
) -> Result<&'a Event> {
    let event = events.get(id).ok_or_else(|| CoreError::not_found("event"))?;
    if !event.is_owned_by(&organizer.id) {
        return Err(CoreError::Forbidden(
            "You do not own this event".to_string(),
        ));
    }
    Ok(event)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::filter::StatusFilter;
    use akwaaba_models::{PaymentStatus, Ticket, Transaction, TransactionId, TransactionKind};
    use akwaaba_persistence::{TicketStore, TransactionStore};
    use chrono::Duration;
    use tempfile::tempdir;

    pub(crate) fn organizer(name: &str) -> User {
        User::new(
            Role::Organizer,
            name,
            format!("{}@example.com", name.to_lowercase()),
            "0200000000",
            "x",
        )
    }

    pub(crate) fn draft(title: &str, days_ahead: i64) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: "An evening of music".to_string(),
            starts_at: Some(Utc::now() + Duration::days(days_ahead)),
            location: Some(Location::Venue {
                venue_name: "Labadi Beach".to_string(),
                address: String::new(),
                city: "Accra".to_string(),
            }),
            categories: vec!["music".to_string()],
            tiers: vec![TierDraft::new("Regular", 2500, 3)],
            ..Default::default()
        }
    }

    fn setup(dir: &std::path::Path) -> (Catalog, Arc<Ledger>) {
        let ledger = Arc::new(
            Ledger::load(TicketStore::new(dir), TransactionStore::new(dir)).unwrap(),
        );
        let catalog = Catalog::load(EventStore::new(dir), ledger.clone()).unwrap();
        (catalog, ledger)
    }

    fn sell(ledger: &Ledger, event: &Event, tier: usize, qty: u32) {
        let mut state = ledger.lock().unwrap();
        let tx_id = TransactionId::new();
        let attendee = UserId::new();
        let tickets: Vec<Ticket> = (0..qty)
            .map(|_| {
                Ticket::issue(
                    event.id.clone(),
                    tier,
                    attendee.clone(),
                    tx_id.clone(),
                    event.tiers[tier].price,
                    Utc::now(),
                )
            })
            .collect();
        let tx = Transaction {
            id: tx_id,
            kind: TransactionKind::TicketPurchase,
            attendee_id: attendee,
            organizer_id: event.organizer_id.clone(),
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            tier_index: tier,
            quantity: qty,
            unit_price: event.tiers[tier].price,
            amount: event.tiers[tier].total_for(qty).unwrap(),
            currency: "USDC".to_string(),
            status: PaymentStatus::Paid,
            payment_reference: None,
            ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
            created_at: Utc::now(),
        };
        ledger.commit(&mut state, tickets, tx).unwrap();
    }

    #[test]
    fn test_create_validates_everything() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");

        let err = catalog
            .create(
                &org,
                EventDraft {
                    title: "ab".to_string(),
                    tiers: vec![TierDraft::new("  ", 100, 1)],
                    ..Default::default()
                },
                false,
            )
            .unwrap_err();
        match err {
            CoreError::Validation(problems) => assert_eq!(problems.len(), 4),
            other => panic!("expected validation, got {:?}", other),
        }
    }

    #[test]
    fn test_create_drops_unnamed_tiers_and_bad_slugs() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");

        let mut d = draft("Highlife Night", 3);
        d.tiers.push(TierDraft::new("", 0, 0));
        d.categories = vec!["Music".to_string(), "bad slug".to_string()];

        let event = catalog.create(&org, d, true).unwrap();
        assert_eq!(event.tiers.len(), 1);
        assert_eq!(event.categories, vec!["music".to_string()]);
        assert!(event.is_published());
    }

    #[test]
    fn test_online_url_checked() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");

        let mut d = draft("Webinar", 3);
        d.location = Some(Location::Online {
            url: "not a url".to_string(),
        });
        assert!(matches!(
            catalog.create(&org, d, false),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_attendee_cannot_create() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let attendee = User::new(Role::Attendee, "Ama", "ama@example.com", "0201111111", "x");

        assert!(matches!(
            catalog.create(&attendee, draft("Show", 1), true),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let owner = organizer("Kwame");
        let intruder = organizer("Kojo");
        let event = catalog.create(&owner, draft("Show", 1), true).unwrap();

        assert!(matches!(
            catalog.update(&intruder, &event.id, draft("Mine now", 1)),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            catalog.delete(&intruder, &event.id),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            catalog.get_owned(&owner, &EventId::new()),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_supply_floor_and_tier_removal() {
        let dir = tempdir().unwrap();
        let (catalog, ledger) = setup(dir.path());
        let org = organizer("Kwame");
        let event = catalog.create(&org, draft("Show", 1), true).unwrap();
        sell(&ledger, &event, 0, 2);

        let mut shrink = draft("Show", 1);
        shrink.tiers = vec![TierDraft::new("Regular", 2500, 1)];
        assert!(matches!(
            catalog.update(&org, &event.id, shrink),
            Err(CoreError::Conflict(_))
        ));

        let mut remove = draft("Show", 1);
        remove.tiers = vec![TierDraft::new("", 0, 0)];
        // Unnamed tier is dropped, leaving none: validation fails first
        assert!(matches!(
            catalog.update(&org, &event.id, remove),
            Err(CoreError::Validation(_))
        ));

        let mut ok = draft("Show (revised)", 1);
        ok.tiers = vec![
            TierDraft::new("Regular", 2500, 2),
            TierDraft::new("VIP", 9000, 5),
        ];
        let updated = catalog.update(&org, &event.id, ok).unwrap();
        assert_eq!(updated.tiers.len(), 2);
        assert_eq!(updated.title, "Show (revised)");
        assert!(updated.is_published());
    }

    #[test]
    fn test_remove_sold_tier_conflicts() {
        let dir = tempdir().unwrap();
        let (catalog, ledger) = setup(dir.path());
        let org = organizer("Kwame");
        let mut d = draft("Two tiers", 1);
        d.tiers.push(TierDraft::new("VIP", 9000, 5));
        let event = catalog.create(&org, d, true).unwrap();
        sell(&ledger, &event, 1, 1);

        let only_first = draft("Two tiers", 1);
        match catalog.update(&org, &event.id, only_first) {
            Err(CoreError::Conflict(msg)) => assert!(msg.contains("VIP")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_tier_ahead_of_sold_tier_conflicts() {
        let dir = tempdir().unwrap();
        let (catalog, ledger) = setup(dir.path());
        let org = organizer("Kwame");
        let mut d = draft("Two tiers", 1);
        d.tiers = vec![
            TierDraft::new("Regular", 2500, 3),
            TierDraft::new("VIP", 9000, 5),
        ];
        let event = catalog.create(&org, d, true).unwrap();
        sell(&ledger, &event, 1, 2);

        // Same length, and the new tier at the sold index has enough supply.
        let mut shifted = draft("Two tiers", 1);
        shifted.tiers = vec![
            TierDraft::new("Early Bird", 1500, 10),
            TierDraft::new("Regular", 2500, 3),
            TierDraft::new("VIP", 9000, 5),
        ];
        match catalog.update(&org, &event.id, shifted) {
            Err(CoreError::Conflict(msg)) => assert!(msg.contains("position 2")),
            other => panic!("expected conflict, got {:?}", other),
        }

        let mut renamed = draft("Two tiers", 1);
        renamed.tiers = vec![
            TierDraft::new("Regular", 2500, 3),
            TierDraft::new("Gold", 9000, 5),
        ];
        assert!(matches!(
            catalog.update(&org, &event.id, renamed),
            Err(CoreError::Conflict(_))
        ));

        let mut appended = draft("Two tiers", 1);
        appended.tiers = vec![
            TierDraft::new("Regular", 2500, 3),
            TierDraft::new("VIP", 9000, 2),
            TierDraft::new("Table", 50000, 4),
        ];
        assert_eq!(catalog.update(&org, &event.id, appended).unwrap().tiers.len(), 3);
    }

    #[test]
    fn test_tier_totals_must_fit() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");

        let mut dear = draft("Gold Gala", 3);
        dear.tiers = vec![TierDraft::new("Gold", u64::MAX / 2 + 1, 3)];
        match catalog.create(&org, dear, false) {
            Err(CoreError::Validation(problems)) => {
                assert!(problems[0].contains("too large"))
            }
            other => panic!("expected validation, got {:?}", other),
        }

        let mut split = draft("Split Gala", 3);
        split.tiers = vec![
            TierDraft::new("A", u64::MAX / 2, 1),
            TierDraft::new("B", u64::MAX / 2, 1),
        ];
        assert!(catalog.create(&org, split, false).is_ok());
        let mut over = draft("Over Gala", 3);
        over.tiers = vec![
            TierDraft::new("A", u64::MAX / 2, 1),
            TierDraft::new("B", u64::MAX / 2 + 2, 1),
        ];
        assert!(catalog.create(&org, over, false).is_err());
    }

    #[test]
    fn test_delete_refused_with_sales() {
        let dir = tempdir().unwrap();
        let (catalog, ledger) = setup(dir.path());
        let org = organizer("Kwame");
        let sold = catalog.create(&org, draft("Sold", 1), true).unwrap();
        let unsold = catalog.create(&org, draft("Unsold", 1), true).unwrap();
        sell(&ledger, &sold, 0, 1);

        assert!(matches!(
            catalog.delete(&org, &sold.id),
            Err(CoreError::Conflict(_))
        ));
        catalog.delete(&org, &unsold.id).unwrap();
        assert!(matches!(
            catalog.get_owned(&org, &unsold.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_publish_duplicate_and_visibility() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");
        let event = catalog.create(&org, draft("Draft show", 1), false).unwrap();

        assert!(matches!(
            catalog.get_published(&event.id),
            Err(CoreError::NotFound(_))
        ));
        catalog.publish(&org, &event.id).unwrap();
        assert!(catalog.get_published(&event.id).is_ok());

        let copy = catalog.duplicate(&org, &event.id).unwrap();
        assert_eq!(copy.title, "Draft show (Copy)");
        assert!(!copy.is_published());

        catalog.unpublish(&org, &event.id).unwrap();
        assert!(catalog.get_published(&event.id).is_err());
    }

    #[test]
    fn test_browse_orders_filters_and_clamps() {
        let dir = tempdir().unwrap();
        let (catalog, _) = setup(dir.path());
        let org = organizer("Kwame");
        for i in 0..12 {
            let mut d = draft(&format!("Show {}", i), 12 - i);
            if i % 2 == 0 {
                d.categories = vec!["comedy".to_string()];
            }
            catalog.create(&org, d, true).unwrap();
        }
        catalog.create(&org, draft("Hidden draft", 1), false).unwrap();

        let page = catalog
            .browse(&PublicEventQuery::new().with_per_page(15))
            .unwrap();
        assert_eq!(page.per_page, 10);
        assert_eq!(page.total, 12);
        assert_eq!(page.items[0].title, "Show 11");

        let last = catalog
            .browse(&PublicEventQuery::new().with_page(99))
            .unwrap();
        assert_eq!(last.page, 2);
        assert_eq!(last.items.len(), 2);

        let comedy = catalog
            .browse(&PublicEventQuery::new().with_categories("comedy,!!"))
            .unwrap();
        assert_eq!(comedy.total, 6);

        assert_eq!(
            catalog.categories().unwrap(),
            vec!["comedy".to_string(), "music".to_string()]
        );
    }

    #[test]
    fn test_list_for_organizer_rows() {
        let dir = tempdir().unwrap();
        let (catalog, ledger) = setup(dir.path());
        let org = organizer("Kwame");
        let other = organizer("Kojo");
        let published = catalog.create(&org, draft("Published", 1), true).unwrap();
        catalog.create(&org, draft("Drafted", 1), false).unwrap();
        catalog.create(&other, draft("Not mine", 1), true).unwrap();
        sell(&ledger, &published, 0, 2);

        let all = catalog
            .list_for_organizer(&org, &OrganizerEventQuery::new(), Utc::now())
            .unwrap();
        assert_eq!(all.total, 2);

        let drafts = catalog
            .list_for_organizer(
                &org,
                &OrganizerEventQuery::new().with_status(StatusFilter::Draft),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(drafts.total, 1);
        assert_eq!(drafts.items[0].event.title, "Drafted");

        let upcoming = catalog
            .list_for_organizer(
                &org,
                &OrganizerEventQuery::new().with_status(StatusFilter::Upcoming),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(upcoming.items[0].sold, 2);
        assert_eq!(upcoming.items[0].supply, 3);
    }

    #[test]
    fn test_reload_from_disk() {
        let dir = tempdir().unwrap();
        let org = organizer("Kwame");
        let id = {
            let (catalog, _) = setup(dir.path());
            catalog.create(&org, draft("Persisted", 1), true).unwrap().id
        };
        let (catalog, _) = setup(dir.path());
        assert_eq!(catalog.get_published(&id).unwrap().title, "Persisted");
    }
}
