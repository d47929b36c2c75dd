//! Request DTOs for the API.

use akwaaba_core::{
    EventDraft, OrganizerEventQuery, PublicEventQuery, StatusFilter, TransactionQuery,
};
use serde::Deserialize;

/// Login request; `identifier` is an email or phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email", alias = "phone")]
    pub identifier: String,
    pub password: String,
}

/// Change password request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Newsletter subscribe request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
    pub source: Option<String>,
}

/// Checkout quote request.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub tier_index: usize,
    /// Defaults to one ticket.
    pub quantity: Option<u32>,
}

/// Create event request: the draft plus whether to publish straight away.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    #[serde(flatten)]
    pub draft: EventDraft,
    #[serde(default)]
    pub publish: bool,
}

/// Public catalog query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Text search.
    pub q: Option<String>,
    /// Comma-separated category slugs.
    pub category: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<BrowseQuery> for PublicEventQuery {
    fn from(query: BrowseQuery) -> Self {
        let mut filter = PublicEventQuery::new();
        if let Some(q) = query.q {
            filter = filter.with_text(q);
        }
        if let Some(category) = query.category {
            filter = filter.with_categories(&category);
        }
        if let Some(page) = query.page {
            filter = filter.with_page(page);
        }
        if let Some(per_page) = query.per_page {
            filter = filter.with_per_page(per_page);
        }
        filter
    }
}

/// Organizer event list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizerEventsQuery {
    /// all, draft, published, upcoming or past.
    pub status: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<OrganizerEventsQuery> for OrganizerEventQuery {
    fn from(query: OrganizerEventsQuery) -> Self {
        let mut filter = OrganizerEventQuery::new();
        if let Some(status) = query.status {
            filter = filter.with_status(StatusFilter::parse(&status));
        }
        if let Some(q) = query.q {
            filter = filter.with_text(q);
        }
        if let Some(page) = query.page {
            filter = filter.with_page(page);
        }
        if let Some(per_page) = query.per_page {
            filter = filter.with_per_page(per_page);
        }
        filter
    }
}

/// Transaction history query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub from: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub to: Option<String>,
    pub page: Option<u32>,
    pub per: Option<u32>,
}

impl From<TransactionsQuery> for TransactionQuery {
    fn from(query: TransactionsQuery) -> Self {
        let mut filter = TransactionQuery::new()
            .with_text(query.q.unwrap_or_default())
            .with_status(query.status.as_deref().unwrap_or(""))
            .with_kind(query.kind.as_deref().unwrap_or(""))
            .with_dates(
                query.from.as_deref().unwrap_or(""),
                query.to.as_deref().unwrap_or(""),
            );
        if let Some(page) = query.page {
            filter = filter.with_page(page);
        }
        if let Some(per) = query.per {
            filter = filter.with_per(per);
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_email_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "ama@example.com", "password": "x"}"#).unwrap();
        assert_eq!(req.identifier, "ama@example.com");
    }

    #[test]
    fn test_create_event_request_flattens_draft() {
        let json = r#"{
            "title": "Afrochella",
            "starts_at": "2025-12-28T16:00:00Z",
            "location": {"type": "venue", "venue_name": "El Wak Stadium"},
            "tiers": [{"name": "GA", "price": 4500, "supply": 200}],
            "publish": true
        }"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert!(req.publish);
        assert_eq!(req.draft.title, "Afrochella");
        assert_eq!(req.draft.tiers[0].supply, 200);
    }

    #[test]
    fn test_browse_query_conversion() {
        let query = BrowseQuery {
            q: Some(" jazz ".to_string()),
            category: Some("music,Bad Slug!".to_string()),
            page: Some(0),
            per_page: Some(15),
        };
        let filter: PublicEventQuery = query.into();
        assert_eq!(filter.text, "jazz");
        assert_eq!(filter.categories, vec!["music".to_string()]);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, 10);
    }

    #[test]
    fn test_transactions_query_conversion() {
        let query = TransactionsQuery {
            from: Some("2025-01-01".to_string()),
            to: Some("not-a-date".to_string()),
            per: Some(500),
            ..Default::default()
        };
        let filter: TransactionQuery = query.into();
        assert!(filter.from.is_some());
        assert!(filter.to.is_none());
        assert_eq!(filter.per, 100);
    }
}
