//! Persistence layer for Akwaaba Tickets.
//!
//! Every entity is a JSON document in the data directory, written with an
//! atomic temp-file-and-rename so a crash never leaves a torn document.
//!
//! # Example
//!
//! ```no_run
//! use akwaaba_persistence::Storage;
//! use akwaaba_models::{Role, User};
//!
//! let storage = Storage::open("/home/user/.akwaaba").unwrap();
//!
//! let user = User::new(Role::Attendee, "Ama Mensah", "ama@example.com", "233241234567", "$argon2id$...");
//! storage.users.save(&user).unwrap();
//!
//! let loaded = storage.users.load(&user.id).unwrap();
//! ```

use std::path::{Path, PathBuf};

pub mod atomic;
pub mod error;
pub mod event_store;
pub mod subscription_store;
pub mod ticket_store;
pub mod transaction_store;
pub mod user_store;

pub use error::{PersistenceError, Result};
pub use event_store::EventStore;
pub use subscription_store::SubscriptionStore;
pub use ticket_store::TicketStore;
pub use transaction_store::TransactionStore;
pub use user_store::UserStore;

/// All document stores rooted at one data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    pub users: UserStore,
    pub events: EventStore,
    pub tickets: TicketStore,
    pub transactions: TransactionStore,
    pub subscriptions: SubscriptionStore,
}

impl Storage {
    /// Opens (creating if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        atomic::ensure_dir(&root)?;
        tracing::debug!(root = %root.display(), "Opened data directory");
        Ok(Self {
            users: UserStore::new(&root),
            events: EventStore::new(&root),
            tickets: TicketStore::new(&root),
            transactions: TransactionStore::new(&root),
            subscriptions: SubscriptionStore::new(&root),
            root,
        })
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");

        let storage = Storage::open(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(storage.root(), root.as_path());
        assert!(storage.users.list().unwrap().is_empty());
    }
}
