//! Purchase transaction documents, grouped by attendee.

use std::path::PathBuf;

use akwaaba_models::{Transaction, UserId};

use crate::atomic::{atomic_write_json, read_json_dir, subdirs};
use crate::error::{PersistenceError, Result};

/// Stores transactions organized by buyer:
/// ```text
/// base_path/
/// └── transactions/
///     └── {attendee_id}/
///         └── txn-abc123.json
/// ```
#[derive(Debug, Clone)]
pub struct TransactionStore {
    base_path: PathBuf,
}

impl TransactionStore {
    /// Creates a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn root(&self) -> PathBuf {
        self.base_path.join("transactions")
    }

    fn attendee_dir(&self, attendee_id: &UserId) -> PathBuf {
        self.root().join(attendee_id.as_str())
    }

    /// Writes a transaction.
    pub fn save(&self, tx: &Transaction) -> Result<()> {
        if !tx.id.is_well_formed() || !tx.attendee_id.is_well_formed() {
            return Err(PersistenceError::InvalidData(format!(
                "malformed transaction {} for {}",
                tx.id, tx.attendee_id
            )));
        }
        let path = self
            .attendee_dir(&tx.attendee_id)
            .join(format!("{}.json", tx.id));
        atomic_write_json(&path, tx)
    }

    /// Lists one attendee's transactions, newest first.
    pub fn list_for_attendee(&self, attendee_id: &UserId) -> Result<Vec<Transaction>> {
        if !attendee_id.is_well_formed() {
            return Ok(Vec::new());
        }
        let mut txs: Vec<Transaction> =
            read_json_dir(&self.attendee_dir(attendee_id), "transaction")?;
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(txs)
    }

    /// Lists every transaction, newest first.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut txs = Vec::new();
        for dir in subdirs(&self.root())? {
            txs.extend(read_json_dir::<Transaction>(&dir, "transaction")?);
        }
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akwaaba_models::{
        EventId, PaymentStatus, TransactionId, TransactionKind, DEFAULT_CURRENCY,
    };
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn make_tx(attendee: &UserId, minutes_ago: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            kind: TransactionKind::TicketPurchase,
            attendee_id: attendee.clone(),
            organizer_id: UserId::from_string("usr-org"),
            event_id: EventId::from_string("evt-1"),
            event_title: "Jazz at the Dome".to_string(),
            tier_index: 0,
            quantity: 1,
            unit_price: 3000,
            amount: 3000,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Paid,
            payment_reference: None,
            ticket_ids: Vec::new(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_list_for_attendee_newest_first() {
        let dir = tempdir().unwrap();
        let store = TransactionStore::new(dir.path());
        let attendee = UserId::new();
        let old = make_tx(&attendee, 30);
        let new = make_tx(&attendee, 1);

        store.save(&old).unwrap();
        store.save(&new).unwrap();

        let txs = store.list_for_attendee(&attendee).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id, new.id);
    }

    #[test]
    fn test_list_all_across_attendees() {
        let dir = tempdir().unwrap();
        let store = TransactionStore::new(dir.path());
        store.save(&make_tx(&UserId::new(), 5)).unwrap();
        store.save(&make_tx(&UserId::new(), 2)).unwrap();

        assert_eq!(store.list_all().unwrap().len(), 2);
        assert!(store.list_for_attendee(&UserId::new()).unwrap().is_empty());
    }
}
