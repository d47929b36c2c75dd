//! Event documents.

use std::path::PathBuf;

use akwaaba_models::{Event, EventId};

use crate::atomic::{atomic_write_json, read_json_dir, read_json_optional, remove_file};
use crate::error::{PersistenceError, Result};

/// Stores one JSON document per event, tiers embedded:
/// ```text
/// base_path/
/// └── events/
///     └── evt-abc123.json
/// ```
#[derive(Debug, Clone)]
pub struct EventStore {
    base_path: PathBuf,
}

impl EventStore {
    /// Creates a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn events_dir(&self) -> PathBuf {
        self.base_path.join("events")
    }

    fn event_path(&self, id: &EventId) -> PathBuf {
        self.events_dir().join(format!("{}.json", id))
    }

    /// Writes an event document.
    pub fn save(&self, event: &Event) -> Result<()> {
        if !event.id.is_well_formed() {
            return Err(PersistenceError::InvalidData(format!(
                "malformed event id: {}",
                event.id
            )));
        }
        atomic_write_json(&self.event_path(&event.id), event)
    }

    /// Loads an event by id.
    pub fn load(&self, id: &EventId) -> Result<Event> {
        if !id.is_well_formed() {
            return Err(PersistenceError::not_found("event", id));
        }
        read_json_optional(&self.event_path(id))?
            .ok_or_else(|| PersistenceError::not_found("event", id))
    }

    /// Loads every event, soonest start first.
    pub fn list(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = read_json_dir(&self.events_dir(), "event")?;
        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(events)
    }

    /// Deletes an event document. Deleting a missing event is a no-op.
    pub fn delete(&self, id: &EventId) -> Result<()> {
        if !id.is_well_formed() {
            return Ok(());
        }
        remove_file(&self.event_path(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akwaaba_models::{Location, TicketTier};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn make_event(title: &str, starts_in_days: i64) -> Event {
        Event::builder(
            "usr-org",
            title,
            Utc::now() + Duration::days(starts_in_days),
            Location::Online {
                url: "https://live.example.com".to_string(),
            },
        )
        .tier(TicketTier::new("General", 1000, 50))
        .build()
    }

    #[test]
    fn test_save_load_delete() {
        let dir = tempdir().unwrap();
        let store = EventStore::new(dir.path());
        let event = make_event("Afrobeats Live", 3);

        store.save(&event).unwrap();
        let loaded = store.load(&event.id).unwrap();
        assert_eq!(loaded.title, "Afrobeats Live");
        assert_eq!(loaded.tiers.len(), 1);

        store.delete(&event.id).unwrap();
        assert!(matches!(
            store.load(&event.id),
            Err(PersistenceError::NotFound { kind: "event", .. })
        ));
        // Second delete is a no-op
        store.delete(&event.id).unwrap();
    }

    #[test]
    fn test_list_orders_by_start() {
        let dir = tempdir().unwrap();
        let store = EventStore::new(dir.path());
        store.save(&make_event("Later", 10)).unwrap();
        store.save(&make_event("Sooner", 1)).unwrap();

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_save_rejects_malformed_id() {
        let dir = tempdir().unwrap();
        let store = EventStore::new(dir.path());
        let mut event = make_event("Bad", 1);
        event.id = EventId::from_string("../escape");

        assert!(matches!(
            store.save(&event),
            Err(PersistenceError::InvalidData(_))
        ));
    }
}
