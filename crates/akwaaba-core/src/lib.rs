//! Akwaaba Core - the application layer of Akwaaba Tickets.
//!
//! Every operation is validated and authorized here before it reaches the
//! document store:
//!
//! - **accounts**: registration, login sessions, profiles, operator status changes
//! - **catalog**: organizer event management and public browsing
//! - **box_office**: quotes, atomic purchases, wallets, histories, CSV exports
//! - **reports**: per-event attendee reports and the organizer dashboard
//! - **calendar**: iCalendar export and Google Calendar links
//! - **newsletter**: idempotent newsletter subscriptions
//!
//! [`Services`] opens a data directory and wires them together.

pub mod accounts;
pub mod box_office;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod newsletter;
pub mod pagination;
pub mod password;
pub mod reports;
pub mod services;
pub mod session;
pub mod validation;

pub use accounts::{require_role, Accounts, NewAccount, ProfileUpdate};
pub use box_office::{
    AttendeeDashboard, BoxOffice, DashboardTicket, Purchase, PurchaseRequest, Quote,
    TransactionHistory, WalletTicket, DASHBOARD_TICKET_LIMIT,
};
pub use catalog::{Catalog, EventDraft, OrganizerEventRow, TierDraft};
pub use config::{AppConfig, DATA_DIR_ENV, SESSION_TTL_ENV};
pub use error::{CoreError, Result};
pub use filter::{OrganizerEventQuery, PublicEventQuery, StatusFilter, TransactionQuery};
pub use ledger::Ledger;
pub use newsletter::Newsletter;
pub use pagination::Page;
pub use password::PasswordHasher;
pub use reports::{AttendeeReport, Dashboard, Reports};
pub use services::Services;
pub use session::{Session, SessionManager};
