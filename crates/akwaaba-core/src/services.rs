//! Wiring of every application service over one data directory.

use std::sync::Arc;

use akwaaba_persistence::Storage;
use tracing::info;

use crate::accounts::Accounts;
use crate::box_office::BoxOffice;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::newsletter::Newsletter;
use crate::password::PasswordHasher;
use crate::reports::Reports;
use crate::session::SessionManager;

/// The application layer, ready to share between request handlers.
#[derive(Debug, Clone)]
pub struct Services {
    pub config: AppConfig,
    pub accounts: Arc<Accounts>,
    pub catalog: Arc<Catalog>,
    pub box_office: Arc<BoxOffice>,
    pub reports: Arc<Reports>,
    pub newsletter: Arc<Newsletter>,
}

impl Services {
    /// Opens the data directory and loads every index.
    pub fn open(config: AppConfig) -> Result<Self> {
        Self::open_with_hasher(config, PasswordHasher::new())
    }

    /// Like [`Services::open`] with an explicit password hasher.
    pub fn open_with_hasher(config: AppConfig, hasher: PasswordHasher) -> Result<Self> {
        let storage = Storage::open(&config.data_dir)?;

        let accounts = Arc::new(Accounts::load(
            storage.users.clone(),
            SessionManager::new(config.session_ttl),
            hasher,
        )?);
        let ledger = Arc::new(Ledger::load(
            storage.tickets.clone(),
            storage.transactions.clone(),
        )?);
        let catalog = Arc::new(Catalog::load(storage.events.clone(), ledger.clone())?);
        let box_office = Arc::new(BoxOffice::new(catalog.clone(), ledger.clone()));
        let reports = Arc::new(Reports::new(catalog.clone(), ledger, accounts.clone()));
        let newsletter = Arc::new(Newsletter::load(storage.subscriptions.clone())?);

        info!(data_dir = %config.data_dir.display(), "Services ready");
        Ok(Self {
            config,
            accounts,
            catalog,
            box_office,
            reports,
            newsletter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::draft;
    use crate::{CoreError, NewAccount};
    use akwaaba_models::AccountStatus;
    use akwaaba_persistence::UserStore;
    use tempfile::tempdir;

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let config = AppConfig::new(dir.path());

        let event_id = {
            let s = Services::open_with_hasher(config.clone(), PasswordHasher::fast()).unwrap();
            let org = s
                .accounts
                .register(NewAccount {
                    role: "organizer".to_string(),
                    full_name: "Adjoa Badu".to_string(),
                    email: "adjoa@example.com".to_string(),
                    phone: "+233201234567".to_string(),
                    password: "waakye99".to_string(),
                    confirm_password: "waakye99".to_string(),
                })
                .unwrap();
            s.catalog.create(&org, draft("Reopen", 5), true).unwrap().id
        };

        let s = Services::open_with_hasher(config, PasswordHasher::fast()).unwrap();
        assert_eq!(s.accounts.list().unwrap().len(), 1);
        assert_eq!(s.catalog.get_published(&event_id).unwrap().title, "Reopen");
        let (_, user) = s.accounts.login("adjoa@example.com", "waakye99").unwrap();
        assert_eq!(user.full_name, "Adjoa Badu");
    }

    #[test]
    fn test_disable_from_another_process_reaches_running_server() {
        let dir = tempdir().unwrap();
        let config = AppConfig::new(dir.path());
        let server = Services::open_with_hasher(config.clone(), PasswordHasher::fast()).unwrap();
        server
            .accounts
            .register(NewAccount {
                role: "attendee".to_string(),
                full_name: "Kofi Mensah".to_string(),
                email: "kofi@example.com".to_string(),
                phone: "0244000111".to_string(),
                password: "jollof2024".to_string(),
                confirm_password: "jollof2024".to_string(),
            })
            .unwrap();
        let (first, _) = server.accounts.login("kofi@example.com", "jollof2024").unwrap();
        let (second, _) = server.accounts.login("kofi@example.com", "jollof2024").unwrap();

        // The operator tool opens its own Services on the same directory.
        let operator = Services::open_with_hasher(config.clone(), PasswordHasher::fast()).unwrap();
        operator
            .accounts
            .set_status("kofi@example.com", AccountStatus::Disabled)
            .unwrap();

        assert!(matches!(
            server.accounts.resolve(&first.token),
            Err(CoreError::Unauthorized(_))
        ));
        assert!(matches!(
            server.accounts.login("kofi@example.com", "jollof2024"),
            Err(CoreError::Forbidden(_))
        ));
        let on_disk = UserStore::new(dir.path()).list().unwrap();
        assert_eq!(on_disk[0].status, AccountStatus::Disabled);

        operator
            .accounts
            .set_status("kofi@example.com", AccountStatus::Active)
            .unwrap();
        let (fresh, _) = server.accounts.login("kofi@example.com", "jollof2024").unwrap();
        assert!(server.accounts.resolve(&fresh.token).is_ok());
        assert!(server.accounts.resolve(&second.token).is_err());
    }
}
