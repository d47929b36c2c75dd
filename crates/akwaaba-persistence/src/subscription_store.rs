//! Newsletter subscriptions, kept in a single document keyed by email.

use std::collections::BTreeMap;
use std::path::PathBuf;

use akwaaba_models::Subscription;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// Stores all subscriptions in `base_path/subscriptions.json`.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    base_path: PathBuf,
}

impl SubscriptionStore {
    /// Creates a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path(&self) -> PathBuf {
        self.base_path.join("subscriptions.json")
    }

    /// Loads every subscription keyed by email. Missing file is empty.
    pub fn load_all(&self) -> Result<BTreeMap<String, Subscription>> {
        Ok(read_json_optional(&self.path())?.unwrap_or_default())
    }

    /// Replaces the subscription document.
    pub fn save_all(&self, subs: &BTreeMap<String, Subscription>) -> Result<()> {
        atomic_write_json(&self.path(), subs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let store = SubscriptionStore::new(dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = SubscriptionStore::new(dir.path());

        let mut subs = BTreeMap::new();
        subs.insert(
            "efua@example.com".to_string(),
            Subscription::new("efua@example.com", "homepage", "127.0.0.1", "curl/8"),
        );
        store.save_all(&subs).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["efua@example.com"].source, "homepage");
    }
}
