//! Purchase transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, TicketId, TransactionId, UserId};

/// Currency every price is quoted in.
pub const DEFAULT_CURRENCY: &str = "USDC";

/// Kind of transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Tickets bought for an event.
    #[default]
    TicketPurchase,
}

impl TransactionKind {
    /// Returns the snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::TicketPurchase => "ticket_purchase",
        }
    }
}

/// Payment state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment was accepted and tickets issued.
    #[default]
    Paid,
}

impl PaymentStatus {
    /// Returns the snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Record of a single purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,

    /// Kind of transaction.
    #[serde(default)]
    pub kind: TransactionKind,

    /// Buyer.
    pub attendee_id: UserId,

    /// Organizer of the event.
    pub organizer_id: UserId,

    /// Event bought for.
    pub event_id: EventId,

    /// Event title at purchase time.
    pub event_title: String,

    /// Tier index within the event.
    pub tier_index: usize,

    /// Number of tickets.
    pub quantity: u32,

    /// Unit price in minor units.
    pub unit_price: u64,

    /// Total in minor units.
    pub amount: u64,

    /// Currency code.
    pub currency: String,

    /// Payment state.
    #[serde(default)]
    pub status: PaymentStatus,

    /// External payment reference supplied by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    /// Tickets issued by this purchase.
    #[serde(default)]
    pub ticket_ids: Vec<TicketId>,

    /// When the purchase completed.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true if `needle` matches the id, payment reference or event
    /// title, case-insensitively.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.id.as_str().to_lowercase().contains(&needle)
            || self.event_title.to_lowercase().contains(&needle)
            || self
                .payment_reference
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tx() -> Transaction {
        Transaction {
            id: TransactionId::from_string("txn-abc"),
            kind: TransactionKind::TicketPurchase,
            attendee_id: UserId::from_string("usr-a"),
            organizer_id: UserId::from_string("usr-o"),
            event_id: EventId::from_string("evt-1"),
            event_title: "Highlife Night".to_string(),
            tier_index: 0,
            quantity: 2,
            unit_price: 2500,
            amount: 5000,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Paid,
            payment_reference: Some("PAY-XYZ".to_string()),
            ticket_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_text() {
        let tx = make_tx();
        assert!(tx.matches_text("highlife"));
        assert!(tx.matches_text("pay-xyz"));
        assert!(tx.matches_text("TXN-ABC"));
        assert!(tx.matches_text(""));
        assert!(!tx.matches_text("jazz"));
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(make_tx()).unwrap();
        assert_eq!(json["kind"], "ticket_purchase");
        assert_eq!(json["status"], "paid");
        assert_eq!(json["currency"], "USDC");
    }
}
