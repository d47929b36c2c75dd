//! The ticket ledger: every issued ticket and transaction, behind one mutex.
//!
//! Holding the ledger lock is what makes a purchase atomic. Code that needs
//! both the ledger and the catalog must take the ledger first.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use akwaaba_models::{EventId, Ticket, Transaction, UserId};
use akwaaba_persistence::{TicketStore, TransactionStore};
use tracing::debug;

use crate::error::{poisoned, Result};

/// In-memory indexes over tickets and transactions.
#[derive(Debug, Default)]
pub struct LedgerState {
    tickets_by_event: HashMap<EventId, Vec<Ticket>>,
    sold: HashMap<(EventId, usize), u32>,
    transactions_by_attendee: HashMap<UserId, Vec<Transaction>>,
}

impl LedgerState {
    fn index_ticket(&mut self, ticket: Ticket) {
        *self
            .sold
            .entry((ticket.event_id.clone(), ticket.tier_index))
            .or_insert(0) += 1;
        self.tickets_by_event
            .entry(ticket.event_id.clone())
            .or_default()
            .push(ticket);
    }

    fn index_transaction(&mut self, tx: Transaction) {
        self.transactions_by_attendee
            .entry(tx.attendee_id.clone())
            .or_default()
            .push(tx);
    }

    /// Tickets sold for one tier.
    pub fn sold(&self, event_id: &EventId, tier_index: usize) -> u32 {
        self.sold
            .get(&(event_id.clone(), tier_index))
            .copied()
            .unwrap_or(0)
    }

    /// Tickets sold across all tiers of an event.
    pub fn sold_for_event(&self, event_id: &EventId) -> u32 {
        self.tickets_by_event
            .get(event_id)
            .map(|t| u32::try_from(t.len()).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Tickets for an event in issue order.
    pub fn tickets_for_event(&self, event_id: &EventId) -> &[Ticket] {
        self.tickets_by_event
            .get(event_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tickets owned by an attendee, newest first.
    pub fn tickets_for_attendee(&self, attendee_id: &UserId) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .tickets_by_event
            .values()
            .flatten()
            .filter(|t| t.attendee_id == *attendee_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        tickets
    }

    /// An attendee's transactions, newest first.
    pub fn transactions_for_attendee(&self, attendee_id: &UserId) -> Vec<Transaction> {
        let mut txs = self
            .transactions_by_attendee
            .get(attendee_id)
            .cloned()
            .unwrap_or_default();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        txs
    }

    /// Transactions recorded against an event.
    pub fn transactions_for_event(&self, event_id: &EventId) -> Vec<&Transaction> {
        self.transactions_by_attendee
            .values()
            .flatten()
            .filter(|tx| tx.event_id == *event_id)
            .collect()
    }
}

/// Persistent ticket ledger.
#[derive(Debug)]
pub struct Ledger {
    tickets: TicketStore,
    transactions: TransactionStore,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Rebuilds the indexes from storage.
    pub fn load(tickets: TicketStore, transactions: TransactionStore) -> Result<Self> {
        let mut state = LedgerState::default();
        let all_tickets = tickets.list_all()?;
        let all_txs = transactions.list_all()?;
        debug!(
            tickets = all_tickets.len(),
            transactions = all_txs.len(),
            "Loaded ledger"
        );
        for ticket in all_tickets {
            state.index_ticket(ticket);
        }
        for tx in all_txs {
            state.index_transaction(tx);
        }
        Ok(Self {
            tickets,
            transactions,
            state: Mutex::new(state),
        })
    }

    /// Takes the ledger lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(poisoned)
    }

    /// Persists a purchase and adds it to the indexes.
    ///
    /// The caller must hold the guard passed as `state`. If the transaction
    /// cannot be written, its tickets are removed again so the purchase
    /// leaves nothing behind.
    pub fn commit(
        &self,
        state: &mut LedgerState,
        tickets: Vec<Ticket>,
        tx: Transaction,
    ) -> Result<()> {
        self.tickets.save_all(&tickets)?;
        if let Err(e) = self.transactions.save(&tx) {
            self.tickets.remove_all(&tickets);
            return Err(e.into());
        }
        for ticket in tickets {
            state.index_ticket(ticket);
        }
        state.index_transaction(tx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akwaaba_models::{PaymentStatus, TransactionId, TransactionKind};
    use chrono::Utc;
    use tempfile::tempdir;

    fn purchase(event_id: &EventId, attendee: &UserId, tier: usize, qty: u32) -> (Vec<Ticket>, Transaction) {
        let tx_id = TransactionId::new();
        let now = Utc::now();
        let tickets: Vec<Ticket> = (0..qty)
            .map(|_| Ticket::issue(event_id.clone(), tier, attendee.clone(), tx_id.clone(), 500, now))
            .collect();
        let tx = Transaction {
            id: tx_id,
            kind: TransactionKind::TicketPurchase,
            attendee_id: attendee.clone(),
            organizer_id: UserId::from_string("usr-org"),
            event_id: event_id.clone(),
            event_title: "Homowo".to_string(),
            tier_index: tier,
            quantity: qty,
            unit_price: 500,
            amount: 500 * u64::from(qty),
            currency: "USDC".to_string(),
            status: PaymentStatus::Paid,
            payment_reference: None,
            ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
            created_at: now,
        };
        (tickets, tx)
    }

    fn open(dir: &std::path::Path) -> Ledger {
        Ledger::load(TicketStore::new(dir), TransactionStore::new(dir)).unwrap()
    }

    #[test]
    fn test_commit_indexes_and_persists() {
        let dir = tempdir().unwrap();
        let ledger = open(dir.path());
        let event = EventId::new();
        let attendee = UserId::new();

        {
            let mut state = ledger.lock().unwrap();
            let (tickets, tx) = purchase(&event, &attendee, 1, 3);
            ledger.commit(&mut state, tickets, tx).unwrap();

            assert_eq!(state.sold(&event, 1), 3);
            assert_eq!(state.sold(&event, 0), 0);
            assert_eq!(state.sold_for_event(&event), 3);
            assert_eq!(state.tickets_for_attendee(&attendee).len(), 3);
            assert_eq!(state.transactions_for_attendee(&attendee).len(), 1);
            assert_eq!(state.transactions_for_event(&event).len(), 1);
        }

        // Indexes rebuild from disk
        let reopened = open(dir.path());
        let state = reopened.lock().unwrap();
        assert_eq!(state.sold(&event, 1), 3);
        assert_eq!(state.tickets_for_event(&event).len(), 3);
        assert_eq!(state.transactions_for_attendee(&attendee).len(), 1);
    }

    #[test]
    fn test_commit_rolls_back_tickets_on_bad_transaction() {
        let dir = tempdir().unwrap();
        let ledger = open(dir.path());
        let event = EventId::new();
        let attendee = UserId::new();

        let mut state = ledger.lock().unwrap();
        let (tickets, mut tx) = purchase(&event, &attendee, 0, 2);
        tx.id = TransactionId::from_string("bad/id");

        assert!(ledger.commit(&mut state, tickets, tx).is_err());
        assert_eq!(state.sold(&event, 0), 0);
        assert!(TicketStore::new(dir.path())
            .list_for_event(&event)
            .unwrap()
            .is_empty());
    }
}
