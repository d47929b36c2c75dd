//! Organizer reporting: per-event attendee reports and the dashboard summary.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use akwaaba_models::{
    sum_minor, Event, EventId, EventStatus, Lifecycle, PaymentStatus, Role, User, UserId,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::accounts::{require_role, Accounts};
use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::ledger::Ledger;

/// Days covered by the sales series.
pub const TIMESERIES_DAYS: i64 = 14;

/// Most recent tickets listed in a report.
pub const RECENT_LIMIT: usize = 100;

/// Upcoming events shown on the dashboard.
pub const DASHBOARD_UPCOMING: usize = 5;

/// Headline numbers for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub tickets_sold: u32,
    pub unique_attendees: usize,
    pub revenue: u64,
}

/// Sales of one tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierSales {
    pub index: usize,
    pub name: String,
    pub price: u64,
    pub sold: u32,
    pub supply: u32,
}

/// Tickets sold on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sold: u32,
}

/// A recent ticket with its buyer's contact details.
#[derive(Debug, Clone, Serialize)]
pub struct RecentBuyer {
    pub attendee_id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub tier_index: usize,
    pub tier_name: String,
    pub price: u64,
    pub purchased_at: DateTime<Utc>,
}

/// Everything an organizer sees about an event's attendance.
#[derive(Debug, Clone, Serialize)]
pub struct AttendeeReport {
    pub event_id: EventId,
    pub event_title: String,
    pub status: EventStatus,
    pub totals: ReportTotals,
    pub by_tier: Vec<TierSales>,
    pub timeseries: Vec<DailySales>,
    pub recent: Vec<RecentBuyer>,
}

/// Event counts by lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub total: usize,
    pub drafts: usize,
    pub upcoming: usize,
    pub past: usize,
}

/// Organizer landing summary.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub counts: EventCounts,
    pub tickets_sold: u32,
    pub revenue: u64,
    pub upcoming: Vec<Event>,
}

/// Read-only reporting over the catalog, ledger and accounts.
#[derive(Debug)]
pub struct Reports {
    catalog: Arc<Catalog>,
    ledger: Arc<Ledger>,
    accounts: Arc<Accounts>,
}

impl Reports {
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<Ledger>, accounts: Arc<Accounts>) -> Self {
        Self {
            catalog,
            ledger,
            accounts,
        }
    }

    /// Builds the attendee report for one of the organizer's events.
    ///
    /// `today` is the last day of the sales series.
    pub fn attendee_report(
        &self,
        organizer: &User,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<AttendeeReport> {
        let event = self.catalog.get_owned(organizer, event_id)?;

        let (mut tickets, revenue) = {
            let ledger = self.ledger.lock()?;
            let revenue = sum_minor(
                ledger
                    .transactions_for_event(event_id)
                    .iter()
                    .filter(|tx| tx.status == PaymentStatus::Paid)
                    .map(|tx| tx.amount),
            );
            (ledger.tickets_for_event(event_id).to_vec(), revenue)
        };
        tickets.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));

        let mut per_tier: HashMap<usize, u32> = HashMap::new();
        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        let mut attendees: HashSet<&UserId> = HashSet::new();
        for ticket in &tickets {
            *per_tier.entry(ticket.tier_index).or_insert(0) += 1;
            *per_day.entry(ticket.purchased_at.date_naive()).or_insert(0) += 1;
            attendees.insert(&ticket.attendee_id);
        }

        let totals = ReportTotals {
            tickets_sold: u32::try_from(tickets.len()).unwrap_or(u32::MAX),
            unique_attendees: attendees.len(),
            revenue,
        };

        let by_tier = event
            .tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| TierSales {
                index,
                name: tier.name.clone(),
                price: tier.price,
                sold: per_tier.get(&index).copied().unwrap_or(0),
                supply: tier.supply,
            })
            .collect();

        let timeseries = daily_series(&per_day, today);

        let mut buyers: HashMap<UserId, Option<User>> = HashMap::new();
        let mut recent = Vec::new();
        for ticket in tickets.iter().take(RECENT_LIMIT) {
            if !buyers.contains_key(&ticket.attendee_id) {
                let user = match self.accounts.get(&ticket.attendee_id) {
                    Ok(user) => Some(user),
                    Err(CoreError::NotFound(_)) => None,
                    Err(e) => return Err(e),
                };
                buyers.insert(ticket.attendee_id.clone(), user);
            }
            let buyer = buyers.get(&ticket.attendee_id).and_then(Option::as_ref);
            recent.push(RecentBuyer {
                attendee_id: ticket.attendee_id.clone(),
                full_name: buyer
                    .map(|u| u.full_name.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Attendee".to_string()),
                email: buyer.map(|u| u.email.clone()).unwrap_or_default(),
                phone: buyer.map(|u| u.phone.clone()).unwrap_or_default(),
                tier_index: ticket.tier_index,
                tier_name: event
                    .tier(ticket.tier_index)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "Unknown Tier".to_string()),
                price: ticket.price,
                purchased_at: ticket.purchased_at,
            });
        }

        Ok(AttendeeReport {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            status: event.status,
            totals,
            by_tier,
            timeseries,
            recent,
        })
    }

    /// Summarizes all of an organizer's events.
    pub fn organizer_dashboard(&self, organizer: &User, now: DateTime<Utc>) -> Result<Dashboard> {
        require_role(organizer, Role::Organizer)?;
        let events = self.catalog.events_of(&organizer.id)?;

        let mut counts = EventCounts {
            total: events.len(),
            ..Default::default()
        };
        for event in &events {
            match event.lifecycle(now) {
                Lifecycle::Draft => counts.drafts += 1,
                Lifecycle::Upcoming => counts.upcoming += 1,
                Lifecycle::Past => counts.past += 1,
            }
        }

        let (tickets_sold, revenue) = {
            let ledger = self.ledger.lock()?;
            events.iter().fold((0u32, 0u64), |(sold, revenue), event| {
                let event_revenue = sum_minor(
                    ledger
                        .transactions_for_event(&event.id)
                        .iter()
                        .filter(|tx| tx.status == PaymentStatus::Paid)
                        .map(|tx| tx.amount),
                );
                (
                    sold.saturating_add(ledger.sold_for_event(&event.id)),
                    revenue.saturating_add(event_revenue),
                )
            })
        };

        let mut upcoming: Vec<Event> = events
            .into_iter()
            .filter(|e| e.lifecycle(now) == Lifecycle::Upcoming)
            .collect();
        upcoming.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        upcoming.truncate(DASHBOARD_UPCOMING);

        Ok(Dashboard {
            counts,
            tickets_sold,
            revenue,
            upcoming,
        })
    }
}

/// Zero-filled daily counts for the days ending at `today`, oldest first.
fn daily_series(per_day: &HashMap<NaiveDate, u32>, today: NaiveDate) -> Vec<DailySales> {
    (0..TIMESERIES_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailySales {
                date,
                sold: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}
