//! Core data models for Akwaaba Tickets.
//!
//! This crate provides the fundamental data types used throughout the
//! system: users, events with their ticket tiers, issued tickets, purchase
//! transactions and newsletter subscriptions.

pub mod builders;
pub mod event;
pub mod ids;
pub mod money;
pub mod subscription;
pub mod ticket;
pub mod transaction;
pub mod user;

// Re-export main types
pub use builders::EventBuilder;
pub use event::{
    Availability, Event, EventStatus, Lifecycle, Location, TicketTier, DEFAULT_EVENT_HOURS,
};
pub use ids::{EventId, TicketId, TransactionId, UserId};
pub use money::{format_minor, sum_minor};
pub use subscription::{Subscription, DEFAULT_SOURCE};
pub use ticket::{Ticket, TicketStatus};
pub use transaction::{PaymentStatus, Transaction, TransactionKind, DEFAULT_CURRENCY};
pub use user::{AccountStatus, Role, User, UserSettings};
