//! Newsletter subscriptions.

use std::collections::BTreeMap;
use std::sync::Mutex;

use akwaaba_models::{Subscription, DEFAULT_SOURCE};
use akwaaba_persistence::SubscriptionStore;
use tracing::{debug, info};

use crate::error::{poisoned, CoreError, Result};
use crate::validation::{is_valid_subscriber_email, normalize_email};

/// Subscription list backed by a single document.
#[derive(Debug)]
pub struct Newsletter {
    store: SubscriptionStore,
    subs: Mutex<BTreeMap<String, Subscription>>,
}

impl Newsletter {
    /// Loads existing subscriptions.
    pub fn load(store: SubscriptionStore) -> Result<Self> {
        let subs = store.load_all()?;
        debug!(count = subs.len(), "Loaded subscriptions");
        Ok(Self {
            store,
            subs: Mutex::new(subs),
        })
    }

    /// Subscribes `email`, or refreshes an existing subscription.
    ///
    /// Returns the stored record and whether it was newly created.
    pub fn subscribe(
        &self,
        email: &str,
        source: Option<&str>,
        ip: &str,
        user_agent: &str,
    ) -> Result<(Subscription, bool)> {
        let email = normalize_email(email);
        if !is_valid_subscriber_email(&email) {
            return Err(CoreError::invalid("Enter a valid email address."));
        }
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE)
            .to_string();

        let mut subs = self.subs.lock().map_err(poisoned)?;
        let mut next = subs.clone();
        let created = match next.get_mut(&email) {
            Some(existing) => {
                existing.refresh(source, ip.to_string(), user_agent.to_string());
                false
            }
            None => {
                next.insert(
                    email.clone(),
                    Subscription::new(email.clone(), source, ip, user_agent),
                );
                true
            }
        };

        self.store.save_all(&next)?;
        *subs = next;

        if created {
            info!(email = %email, "New newsletter subscriber");
        }
        let record = subs
            .get(&email)
            .cloned()
            .ok_or_else(|| CoreError::not_found("subscription"))?;
        Ok((record, created))
    }

    /// All subscriptions ordered by email.
    pub fn list(&self) -> Result<Vec<Subscription>> {
        let subs = self.subs.lock().map_err(poisoned)?;
        Ok(subs.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_subscribe_twice_keeps_created_at() {
        let dir = tempdir().unwrap();
        let news = Newsletter::load(SubscriptionStore::new(dir.path())).unwrap();

        let (first, created) = news
            .subscribe("  Esi@Example.com ", None, "10.0.0.1", "curl")
            .unwrap();
        assert!(created);
        assert_eq!(first.email, "esi@example.com");
        assert_eq!(first.source, "homepage");

        let (second, created) = news
            .subscribe("esi@example.com", Some("footer"), "10.0.0.2", "firefox")
            .unwrap();
        assert!(!created);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.source, "footer");
        assert_eq!(second.ip, "10.0.0.2");

        let reloaded = Newsletter::load(SubscriptionStore::new(dir.path())).unwrap();
        let all = reloaded.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_agent, "firefox");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let dir = tempdir().unwrap();
        let news = Newsletter::load(SubscriptionStore::new(dir.path())).unwrap();
        assert!(matches!(
            news.subscribe("not-an-email", None, "", ""),
            Err(CoreError::Validation(_))
        ));
        assert!(news.list().unwrap().is_empty());
    }
}
