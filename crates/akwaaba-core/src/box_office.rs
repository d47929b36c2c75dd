//! Quotes, purchases and the attendee/organizer views of issued tickets.
//!
//! A purchase is one critical section under the ledger lock: read the
//! event, count what is sold, check every rule, persist tickets and the
//! transaction, update the indexes. Concurrent buyers of the last seats are
//! serialized there, so a tier can never sell more than its supply.

use std::sync::Arc;

use akwaaba_models::{
    format_minor, sum_minor, Availability, Event, EventId, PaymentStatus, Role, Ticket, TicketTier,
    Transaction, TransactionId, TransactionKind, User, DEFAULT_CURRENCY,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::require_role;
use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::filter::TransactionQuery;
use crate::ledger::Ledger;
use crate::pagination::Page;

/// Priced preview of a purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub event_id: EventId,
    pub event_title: String,
    pub tier_index: usize,
    pub tier_name: String,
    pub unit_price: u64,
    /// Quantity after clamping into `[1, max_allowed]`.
    pub quantity: u32,
    pub max_allowed: u32,
    pub amount: u64,
    pub currency: String,
    pub availability: Availability,
}

/// What the buyer asks for.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub tier_index: usize,
    pub quantity: u32,
    /// Total the client was shown; rejected if it differs.
    #[serde(default)]
    pub expected_amount: Option<u64>,
    /// Opaque reference from the payment step.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// A completed purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub transaction: Transaction,
    pub tickets: Vec<Ticket>,
}

/// A ticket in an attendee's wallet with the event details to show it.
#[derive(Debug, Clone, Serialize)]
pub struct WalletTicket {
    pub ticket: Ticket,
    pub event_title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub where_text: String,
    pub tier_name: String,
}

impl WalletTicket {
    fn new(ticket: Ticket, event: Option<&Event>) -> Self {
        Self {
            event_title: event
                .map(|e| e.title.clone())
                .unwrap_or_else(|| "Untitled Event".to_string()),
            starts_at: event.map(|e| e.starts_at),
            where_text: event.map(Event::where_text).unwrap_or_default(),
            tier_name: event
                .and_then(|e| e.tier(ticket.tier_index))
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("Tier {}", ticket.tier_index + 1)),
            ticket,
        }
    }
}

/// Most recent tickets the attendee dashboard looks at.
pub const DASHBOARD_TICKET_LIMIT: usize = 500;

/// A dashboard row: a wallet ticket and whether its event is still ahead.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardTicket {
    #[serde(flatten)]
    pub wallet: WalletTicket,
    pub is_upcoming: bool,
}

/// The attendee's landing summary.
#[derive(Debug, Clone, Serialize)]
pub struct AttendeeDashboard {
    /// Sum of paid transactions, in minor units.
    pub total_spent: u64,
    pub upcoming_tickets: usize,
    pub past_tickets: usize,
    /// Newest first, at most [`DASHBOARD_TICKET_LIMIT`].
    pub tickets: Vec<DashboardTicket>,
}

/// One page of transaction history.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionHistory {
    #[serde(flatten)]
    pub page: Page<Transaction>,
    /// Sum of amounts on this page.
    pub page_amount: u64,
}

/// Ticket sales service.
#[derive(Debug)]
pub struct BoxOffice {
    catalog: Arc<Catalog>,
    ledger: Arc<Ledger>,
}

impl BoxOffice {
    /// Creates the service over a shared catalog and ledger.
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<Ledger>) -> Self {
        Self { catalog, ledger }
    }

    /// Counts for one tier of a published event.
    pub fn availability(&self, event_id: &EventId, tier_index: usize) -> Result<Availability> {
        let ledger = self.ledger.lock()?;
        let event = self.catalog.get_published(event_id)?;
        let tier = event
            .tier(tier_index)
            .ok_or_else(|| CoreError::not_found("ticket tier"))?;
        Ok(tier.availability(ledger.sold(event_id, tier_index)))
    }

    /// Counts for every tier of `event`, in tier order.
    pub fn tier_availability(&self, event: &Event) -> Result<Vec<Availability>> {
        let ledger = self.ledger.lock()?;
        Ok(event
            .tiers
            .iter()
            .enumerate()
            .map(|(i, tier)| tier.availability(ledger.sold(&event.id, i)))
            .collect())
    }

    /// Tickets sold across all tiers of an event.
    pub fn sold_count(&self, event_id: &EventId) -> Result<u32> {
        Ok(self.ledger.lock()?.sold_for_event(event_id))
    }

    /// Prices `quantity` tickets, clamping the quantity into what one order
    /// may buy right now.
    pub fn quote(&self, event_id: &EventId, tier_index: usize, quantity: u32) -> Result<Quote> {
        let ledger = self.ledger.lock()?;
        let event = self.catalog.get_published(event_id)?;
        let tier = event
            .tier(tier_index)
            .ok_or_else(|| CoreError::not_found("ticket tier"))?;

        if !tier.sales_open(Utc::now()) {
            return Err(CoreError::SalesClosed);
        }
        let sold = ledger.sold(event_id, tier_index);
        let availability = tier.availability(sold);
        if availability.available == 0 {
            return Err(CoreError::SoldOut { available: 0 });
        }

        let max_allowed = tier.max_per_order(sold);
        let quantity = quantity.clamp(1, max_allowed);
        Ok(Quote {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            tier_index,
            tier_name: tier.name.clone(),
            unit_price: tier.price,
            quantity,
            max_allowed,
            amount: order_total(tier, quantity)?,
            currency: DEFAULT_CURRENCY.to_string(),
            availability,
        })
    }

    /// Buys tickets: all of them are issued or none.
    pub fn purchase(
        &self,
        attendee: &User,
        event_id: &EventId,
        request: PurchaseRequest,
    ) -> Result<Purchase> {
        require_role(attendee, Role::Attendee)?;

        let mut ledger = self.ledger.lock()?;
        let event = self.catalog.get_published(event_id)?;
        let tier = event
            .tier(request.tier_index)
            .ok_or_else(|| CoreError::not_found("ticket tier"))?;

        let now = Utc::now();
        if !tier.sales_open(now) {
            return Err(CoreError::SalesClosed);
        }

        let quantity = request.quantity;
        if quantity == 0 {
            return Err(CoreError::InvalidQuantity(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if tier.per_order_limit > 0 && quantity > tier.per_order_limit {
            return Err(CoreError::InvalidQuantity(format!(
                "At most {} ticket(s) per order",
                tier.per_order_limit
            )));
        }

        let available = tier
            .availability(ledger.sold(event_id, request.tier_index))
            .available;
        if quantity > available {
            return Err(CoreError::SoldOut { available });
        }

        let amount = order_total(tier, quantity)?;
        if let Some(expected) = request.expected_amount {
            if expected != amount {
                return Err(CoreError::AmountMismatch {
                    expected,
                    actual: amount,
                });
            }
        }

        let tx_id = TransactionId::new();
        let tickets: Vec<Ticket> = (0..quantity)
            .map(|_| {
                Ticket::issue(
                    event.id.clone(),
                    request.tier_index,
                    attendee.id.clone(),
                    tx_id.clone(),
                    tier.price,
                    now,
                )
            })
            .collect();
        let transaction = Transaction {
            id: tx_id,
            kind: TransactionKind::TicketPurchase,
            attendee_id: attendee.id.clone(),
            organizer_id: event.organizer_id.clone(),
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            tier_index: request.tier_index,
            quantity,
            unit_price: tier.price,
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Paid,
            payment_reference: request
                .payment_reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
            created_at: now,
        };

        self.ledger
            .commit(&mut ledger, tickets.clone(), transaction.clone())?;

        info!(
            transaction_id = %transaction.id,
            event_id = %event.id,
            tier = request.tier_index,
            quantity,
            amount,
            "Purchase completed"
        );
        Ok(Purchase {
            transaction,
            tickets,
        })
    }

    /// An attendee's tickets, newest first, with event details.
    pub fn tickets_for_attendee(&self, attendee: &User) -> Result<Vec<WalletTicket>> {
        require_role(attendee, Role::Attendee)?;
        let tickets = self.ledger.lock()?.tickets_for_attendee(&attendee.id);

        let mut wallet = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let event = self.catalog.find(&ticket.event_id)?;
            wallet.push(WalletTicket::new(ticket, event.as_ref()));
        }
        Ok(wallet)
    }

    /// Spending and upcoming/past counts over the attendee's most recent
    /// tickets. Tickets whose event is gone are left out.
    pub fn attendee_dashboard(
        &self,
        attendee: &User,
        now: DateTime<Utc>,
    ) -> Result<AttendeeDashboard> {
        require_role(attendee, Role::Attendee)?;
        let (tickets, total_spent) = {
            let ledger = self.ledger.lock()?;
            let mut tickets = ledger.tickets_for_attendee(&attendee.id);
            tickets.truncate(DASHBOARD_TICKET_LIMIT);
            let spent = sum_minor(
                ledger
                    .transactions_for_attendee(&attendee.id)
                    .iter()
                    .filter(|tx| tx.status == PaymentStatus::Paid)
                    .map(|tx| tx.amount),
            );
            (tickets, spent)
        };

        let mut dashboard = AttendeeDashboard {
            total_spent,
            upcoming_tickets: 0,
            past_tickets: 0,
            tickets: Vec::with_capacity(tickets.len()),
        };
        for ticket in tickets {
            let Some(event) = self.catalog.find(&ticket.event_id)? else {
                continue;
            };
            let is_upcoming = event.ends_at_or_default() >= now;
            if is_upcoming {
                dashboard.upcoming_tickets += 1;
            } else {
                dashboard.past_tickets += 1;
            }
            dashboard.tickets.push(DashboardTicket {
                wallet: WalletTicket::new(ticket, Some(&event)),
                is_upcoming,
            });
        }
        Ok(dashboard)
    }

    /// Tickets issued for one tier of an organizer's event, oldest first.
    pub fn tickets_for_tier(
        &self,
        organizer: &User,
        event_id: &EventId,
        tier_index: usize,
    ) -> Result<Vec<Ticket>> {
        let event = self.catalog.get_owned(organizer, event_id)?;
        if event.tier(tier_index).is_none() {
            return Err(CoreError::not_found("ticket tier"));
        }
        let ledger = self.ledger.lock()?;
        Ok(ledger
            .tickets_for_event(event_id)
            .iter()
            .filter(|t| t.tier_index == tier_index)
            .cloned()
            .collect())
    }

    fn matching_transactions(
        &self,
        attendee: &User,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>> {
        require_role(attendee, Role::Attendee)?;
        let all = self.ledger.lock()?.transactions_for_attendee(&attendee.id);
        Ok(all.into_iter().filter(|tx| query.matches(tx)).collect())
    }

    /// One page of an attendee's transactions, newest first.
    pub fn transactions_for_attendee(
        &self,
        attendee: &User,
        query: &TransactionQuery,
    ) -> Result<TransactionHistory> {
        let matching = self.matching_transactions(attendee, query)?;
        let page = Page::from_vec(matching, query.page, query.per, false);
        let page_amount = sum_minor(page.items.iter().map(|tx| tx.amount));
        Ok(TransactionHistory { page, page_amount })
    }

    /// Every transaction matching `query` as CSV.
    pub fn export_transactions_csv(
        &self,
        attendee: &User,
        query: &TransactionQuery,
    ) -> Result<String> {
        let matching = self.matching_transactions(attendee, query)?;
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "Date", "Kind", "Event", "Qty", "Amount", "Currency", "Reference", "Status",
        ])
        .map_err(export_err)?;
        for tx in &matching {
            wtr.write_record([
                tx.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                tx.kind.as_str().to_string(),
                tx.event_title.clone(),
                tx.quantity.to_string(),
                format_minor(tx.amount),
                tx.currency.clone(),
                tx.payment_reference.clone().unwrap_or_default(),
                tx.status.as_str().to_string(),
            ])
            .map_err(export_err)?;
        }
        finish_csv(wtr)
    }

    /// Tickets of one tier as CSV.
    pub fn export_tier_csv(
        &self,
        organizer: &User,
        event_id: &EventId,
        tier_index: usize,
    ) -> Result<String> {
        let tickets = self.tickets_for_tier(organizer, event_id, tier_index)?;
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "ticket_id",
            "attendee_id",
            "price",
            "purchased_at_utc",
            "status",
            "transaction_id",
        ])
        .map_err(export_err)?;
        for t in &tickets {
            wtr.write_record([
                t.id.to_string(),
                t.attendee_id.to_string(),
                format_minor(t.price),
                t.purchased_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                t.status.as_str().to_string(),
                t.transaction_id.to_string(),
            ])
            .map_err(export_err)?;
        }
        finish_csv(wtr)
    }
}

fn order_total(tier: &TicketTier, quantity: u32) -> Result<u64> {
    tier.total_for(quantity).ok_or_else(|| {
        CoreError::InvalidQuantity("Order total is too large; buy fewer tickets".to_string())
    })
}

fn export_err(e: csv::Error) -> CoreError {
    CoreError::Export(e.to_string())
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}
