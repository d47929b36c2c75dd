//! Issued ticket documents, grouped by event.

use std::path::PathBuf;

use akwaaba_models::{EventId, Ticket};

use crate::atomic::{atomic_write_json, read_json_dir, remove_file, subdirs};
use crate::error::{PersistenceError, Result};

/// Stores tickets as individual JSON files organized by event:
/// ```text
/// base_path/
/// └── tickets/
///     └── {event_id}/
///         ├── tkt-abc123.json
///         └── tkt-def456.json
/// ```
#[derive(Debug, Clone)]
pub struct TicketStore {
    base_path: PathBuf,
}

impl TicketStore {
    /// Creates a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn tickets_root(&self) -> PathBuf {
        self.base_path.join("tickets")
    }

    fn event_dir(&self, event_id: &EventId) -> PathBuf {
        self.tickets_root().join(event_id.as_str())
    }

    fn ticket_path(&self, ticket: &Ticket) -> PathBuf {
        self.event_dir(&ticket.event_id)
            .join(format!("{}.json", ticket.id))
    }

    fn check(ticket: &Ticket) -> Result<()> {
        if ticket.id.is_well_formed() && ticket.event_id.is_well_formed() {
            Ok(())
        } else {
            Err(PersistenceError::InvalidData(format!(
                "malformed ticket {} for event {}",
                ticket.id, ticket.event_id
            )))
        }
    }

    /// Writes a single ticket.
    pub fn save(&self, ticket: &Ticket) -> Result<()> {
        Self::check(ticket)?;
        atomic_write_json(&self.ticket_path(ticket), ticket)
    }

    /// Writes a batch of tickets.
    ///
    /// If any write fails, tickets already written by this call are removed
    /// before the error is returned.
    pub fn save_all(&self, tickets: &[Ticket]) -> Result<()> {
        for ticket in tickets {
            Self::check(ticket)?;
        }
        for (written, ticket) in tickets.iter().enumerate() {
            if let Err(e) = atomic_write_json(&self.ticket_path(ticket), ticket) {
                self.remove_all(&tickets[..written]);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Best-effort removal of tickets, used to undo a partial write.
    pub fn remove_all(&self, tickets: &[Ticket]) {
        for ticket in tickets {
            if let Err(e) = remove_file(&self.ticket_path(ticket)) {
                tracing::error!(ticket_id = %ticket.id, error = %e, "Failed to roll back ticket");
            }
        }
    }

    /// Lists tickets issued for one event, oldest first.
    pub fn list_for_event(&self, event_id: &EventId) -> Result<Vec<Ticket>> {
        if !event_id.is_well_formed() {
            return Ok(Vec::new());
        }
        let mut tickets: Vec<Ticket> = read_json_dir(&self.event_dir(event_id), "ticket")?;
        tickets.sort_by(|a, b| a.purchased_at.cmp(&b.purchased_at));
        Ok(tickets)
    }

    /// Lists every ticket across all events, oldest first.
    pub fn list_all(&self) -> Result<Vec<Ticket>> {
        let mut tickets = Vec::new();
        for dir in subdirs(&self.tickets_root())? {
            tickets.extend(read_json_dir::<Ticket>(&dir, "ticket")?);
        }
        tickets.sort_by(|a, b| a.purchased_at.cmp(&b.purchased_at));
        Ok(tickets)
    }
}
