//! Issued tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, TicketId, TransactionId, UserId};

/// Status of an issued ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Ticket is valid for admission.
    #[default]
    Valid,
}

impl TicketStatus {
    /// Returns the lowercase status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Valid => "valid",
        }
    }
}

/// One admission to one event, bought by one attendee.
///
/// Tickets are immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier.
    pub id: TicketId,

    /// Event this ticket admits to.
    pub event_id: EventId,

    /// Index of the tier within the event.
    pub tier_index: usize,

    /// Buyer.
    pub attendee_id: UserId,

    /// Purchase that issued this ticket.
    pub transaction_id: TransactionId,

    /// Unit price paid, in minor units.
    pub price: u64,

    /// Ticket status.
    #[serde(default)]
    pub status: TicketStatus,

    /// When the ticket was issued.
    pub purchased_at: DateTime<Utc>,
}

impl Ticket {
    /// Issues a valid ticket.
    pub fn issue(
        event_id: EventId,
        tier_index: usize,
        attendee_id: UserId,
        transaction_id: TransactionId,
        price: u64,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TicketId::new(),
            event_id,
            tier_index,
            attendee_id,
            transaction_id,
            price,
            status: TicketStatus::Valid,
            purchased_at,
        }
    }
}
