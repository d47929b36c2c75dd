//! Query filters for event and transaction listings.

use akwaaba_models::{Event, Lifecycle, Transaction};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::validation::parse_slugs;

/// Page sizes offered by the public catalog.
pub const PUBLIC_PAGE_SIZES: [u32; 4] = [10, 20, 30, 50];
/// Default page size for event listings.
pub const DEFAULT_EVENTS_PER_PAGE: u32 = 10;
/// Default page size for transaction history.
pub const DEFAULT_TRANSACTIONS_PER_PAGE: u32 = 20;

/// Filter for the public catalog.
#[derive(Debug, Clone)]
pub struct PublicEventQuery {
    /// Text matched against title and description.
    pub text: String,
    /// Category slugs; an event matches if it has any of them.
    pub categories: Vec<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for PublicEventQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            categories: Vec::new(),
            page: 1,
            per_page: DEFAULT_EVENTS_PER_PAGE,
        }
    }
}

impl PublicEventQuery {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text search.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into().trim().to_string();
        self
    }

    /// Sets categories from a comma list; invalid slugs are ignored.
    pub fn with_categories(mut self, raw: &str) -> Self {
        self.categories = parse_slugs(raw);
        self
    }

    /// Sets the requested page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size; anything not offered falls back to the default.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = if PUBLIC_PAGE_SIZES.contains(&per_page) {
            per_page
        } else {
            DEFAULT_EVENTS_PER_PAGE
        };
        self
    }

    /// Returns true if the event should be listed publicly.
    pub fn matches(&self, event: &Event) -> bool {
        if !event.is_published() {
            return false;
        }
        if !event.matches_text(&self.text) {
            return false;
        }
        if !self.categories.is_empty()
            && !event
                .categories
                .iter()
                .any(|c| self.categories.contains(c))
        {
            return false;
        }
        true
    }
}

/// Status tabs on the organizer's event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Published,
    Upcoming,
    Past,
}

impl StatusFilter {
    /// Parses a tab name; unknown names mean `All`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "draft" => Self::Draft,
            "published" => Self::Published,
            "upcoming" => Self::Upcoming,
            "past" => Self::Past,
            _ => Self::All,
        }
    }

    /// Returns true if `event` belongs in this tab at `now`.
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Draft => !event.is_published(),
            Self::Published => event.is_published(),
            Self::Upcoming => event.lifecycle(now) == Lifecycle::Upcoming,
            Self::Past => event.lifecycle(now) == Lifecycle::Past,
        }
    }
}

/// Filter for an organizer's own events.
#[derive(Debug, Clone)]
pub struct OrganizerEventQuery {
    pub status: StatusFilter,
    pub text: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for OrganizerEventQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            text: String::new(),
            page: 1,
            per_page: DEFAULT_EVENTS_PER_PAGE,
        }
    }
}

impl OrganizerEventQuery {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status tab.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Sets the text search.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into().trim().to_string();
        self
    }

    /// Sets the requested page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size, clamped to [5, 50].
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(5, 50);
        self
    }

    /// Returns true if the event matches status and text.
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        self.status.matches(event, now) && event.matches_text(&self.text)
    }
}

/// Filter for an attendee's transaction history.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    /// Matched against id, payment reference and event title.
    pub text: String,
    pub status: Option<String>,
    pub kind: Option<String>,
    /// Inclusive start date (UTC).
    pub from: Option<NaiveDate>,
    /// Inclusive end date (UTC).
    pub to: Option<NaiveDate>,
    pub page: u32,
    pub per: u32,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: None,
            kind: None,
            from: None,
            to: None,
            page: 1,
            per: DEFAULT_TRANSACTIONS_PER_PAGE,
        }
    }
}

/// Parses `YYYY-MM-DD`; anything else is treated as absent.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn non_empty(raw: &str) -> Option<String> {
    Some(raw.trim().to_lowercase()).filter(|s| !s.is_empty())
}

impl TransactionQuery {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text search.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into().trim().to_string();
        self
    }

    /// Sets the status filter; blank clears it.
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = non_empty(status);
        self
    }

    /// Sets the kind filter; blank clears it.
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = non_empty(kind);
        self
    }

    /// Sets the date range from raw `YYYY-MM-DD` strings.
    pub fn with_dates(mut self, from: &str, to: &str) -> Self {
        self.from = parse_day(from);
        self.to = parse_day(to);
        self
    }

    /// Sets the requested page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size, clamped to [5, 100].
    pub fn with_per(mut self, per: u32) -> Self {
        self.per = per.clamp(5, 100);
        self
    }

    /// Returns true if the transaction matches every set criterion.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(ref status) = self.status {
            if tx.status.as_str() != status {
                return false;
            }
        }

        if let Some(ref kind) = self.kind {
            if tx.kind.as_str() != kind {
                return false;
            }
        }

        if let Some(from) = self.from {
            if tx.created_at < from.and_time(NaiveTime::MIN).and_utc() {
                return false;
            }
        }

        if let Some(to) = self.to {
            let end = to
                .succ_opt()
                .map(|next| next.and_time(NaiveTime::MIN).and_utc());
            if let Some(end) = end {
                if tx.created_at >= end {
                    return false;
                }
            }
        }

        tx.matches_text(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akwaaba_models::{
        EventId, EventStatus, Location, PaymentStatus, TicketTier, TransactionId,
        TransactionKind, UserId,
    };
    use chrono::{Duration, TimeZone};

    fn make_event(title: &str, categories: &[&str], published: bool) -> Event {
        let mut builder = Event::builder(
            "usr-org",
            title,
            Utc::now() + Duration::days(2),
            Location::Online {
                url: "https://x.test".to_string(),
            },
        )
        .tier(TicketTier::new("General", 100, 10));
        for c in categories {
            builder = builder.category(*c);
        }
        if published {
            builder = builder.published();
        }
        builder.build()
    }

    fn make_tx(created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::from_string("txn-42"),
            kind: TransactionKind::TicketPurchase,
            attendee_id: UserId::from_string("usr-a"),
            organizer_id: UserId::from_string("usr-o"),
            event_id: EventId::from_string("evt-1"),
            event_title: "Panafest".to_string(),
            tier_index: 0,
            quantity: 1,
            unit_price: 100,
            amount: 100,
            currency: "USDC".to_string(),
            status: PaymentStatus::Paid,
            payment_reference: None,
            ticket_ids: Vec::new(),
            created_at,
        }
    }

    #[test]
    fn test_public_query_hides_drafts() {
        let query = PublicEventQuery::new();
        assert!(query.matches(&make_event("Open", &[], true)));
        assert!(!query.matches(&make_event("Hidden", &[], false)));
    }

    #[test]
    fn test_public_query_categories_any() {
        let query = PublicEventQuery::new().with_categories("music,Bad Slug,food");
        assert_eq!(query.categories, vec!["music", "food"]);
        assert!(query.matches(&make_event("Gig", &["music"], true)));
        assert!(query.matches(&make_event("Chop bar", &["food", "family"], true)));
        assert!(!query.matches(&make_event("Talk", &["tech"], true)));
    }

    #[test]
    fn test_public_per_page_fallback() {
        assert_eq!(PublicEventQuery::new().with_per_page(15).per_page, 10);
        assert_eq!(PublicEventQuery::new().with_per_page(30).per_page, 30);
    }

    #[test]
    fn test_status_filter() {
        let now = Utc::now();
        let draft = make_event("Draft", &[], false);
        let mut past = make_event("Past", &[], true);
        past.starts_at = now - Duration::days(1);
        let upcoming = make_event("Soon", &[], true);

        assert!(StatusFilter::parse("DRAFT").matches(&draft, now));
        assert!(StatusFilter::parse("past").matches(&past, now));
        assert!(!StatusFilter::parse("upcoming").matches(&past, now));
        assert!(StatusFilter::parse("upcoming").matches(&upcoming, now));
        assert!(StatusFilter::parse("whatever").matches(&draft, now));
        assert_eq!(upcoming.status, EventStatus::Published);
    }

    #[test]
    fn test_organizer_per_page_clamped() {
        assert_eq!(OrganizerEventQuery::new().with_per_page(1).per_page, 5);
        assert_eq!(OrganizerEventQuery::new().with_per_page(500).per_page, 50);
    }

    #[test]
    fn test_transaction_date_range_inclusive() {
        let at = Utc.with_ymd_and_hms(2025, 3, 6, 23, 59, 0).unwrap();
        let tx = make_tx(at);

        let same_day = TransactionQuery::new().with_dates("2025-03-06", "2025-03-06");
        assert!(same_day.matches(&tx));

        let before = TransactionQuery::new().with_dates("", "2025-03-05");
        assert!(!before.matches(&tx));

        let after = TransactionQuery::new().with_dates("2025-03-07", "");
        assert!(!after.matches(&tx));

        let garbage = TransactionQuery::new().with_dates("03/01/2025", "soon");
        assert!(garbage.from.is_none() && garbage.to.is_none());
        assert!(garbage.matches(&tx));
    }

    #[test]
    fn test_transaction_status_kind_text() {
        let tx = make_tx(Utc::now());
        assert!(TransactionQuery::new().with_status("PAID").matches(&tx));
        assert!(!TransactionQuery::new().with_status("refunded").matches(&tx));
        assert!(TransactionQuery::new()
            .with_kind("ticket_purchase")
            .matches(&tx));
        assert!(TransactionQuery::new().with_text("panafest").matches(&tx));
        assert!(!TransactionQuery::new().with_text("chale").matches(&tx));
    }

    #[test]
    fn test_transaction_per_clamped() {
        assert_eq!(TransactionQuery::new().with_per(1).per, 5);
        assert_eq!(TransactionQuery::new().with_per(1000).per, 100);
        assert_eq!(TransactionQuery::new().per, 20);
    }
}
