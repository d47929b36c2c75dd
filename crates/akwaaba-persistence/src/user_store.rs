//! User account documents.

use std::path::PathBuf;

use akwaaba_models::{User, UserId};

use crate::atomic::{atomic_write_json, read_json_dir, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Stores one JSON document per user:
/// ```text
/// base_path/
/// └── users/
///     ├── usr-abc123.json
///     └── usr-def456.json
/// ```
#[derive(Debug, Clone)]
pub struct UserStore {
    base_path: PathBuf,
}

impl UserStore {
    /// Creates a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn users_dir(&self) -> PathBuf {
        self.base_path.join("users")
    }

    fn user_path(&self, id: &UserId) -> PathBuf {
        self.users_dir().join(format!("{}.json", id))
    }

    /// Writes a user document, replacing any previous version.
    pub fn save(&self, user: &User) -> Result<()> {
        if !user.id.is_well_formed() {
            return Err(PersistenceError::InvalidData(format!(
                "malformed user id: {}",
                user.id
            )));
        }
        atomic_write_json(&self.user_path(&user.id), user)
    }

    /// Loads a user by id.
    pub fn load(&self, id: &UserId) -> Result<User> {
        if !id.is_well_formed() {
            return Err(PersistenceError::not_found("user", id));
        }
        read_json_optional(&self.user_path(id))?
            .ok_or_else(|| PersistenceError::not_found("user", id))
    }

    /// Loads every user, oldest account first.
    pub fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = read_json_dir(&self.users_dir(), "user")?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akwaaba_models::{AccountStatus, Role};
    use tempfile::tempdir;

    fn make_user(email: &str) -> User {
        User::new(
            Role::Organizer,
            "Kojo Asante",
            email,
            "233201112222",
            "$argon2id$v=19$stub",
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = UserStore::new(dir.path());
        let user = make_user("kojo@example.com");

        store.save(&user).unwrap();
        let loaded = store.load(&user.id).unwrap();

        assert_eq!(loaded.email, "kojo@example.com");
        assert_eq!(loaded.role, Role::Organizer);
        assert!(dir
            .path()
            .join("users")
            .join(format!("{}.json", user.id))
            .exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = UserStore::new(dir.path());
        let mut user = make_user("kojo@example.com");
        store.save(&user).unwrap();

        user.status = AccountStatus::Disabled;
        store.save(&user).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert!(!store.load(&user.id).unwrap().is_active());
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempdir().unwrap();
        let store = UserStore::new(dir.path());

        let missing = store.load(&UserId::new());
        assert!(matches!(missing, Err(PersistenceError::NotFound { .. })));

        let escaped = store.load(&UserId::from_string("usr-../../etc/passwd"));
        assert!(matches!(escaped, Err(PersistenceError::NotFound { .. })));
    }

    #[test]
    fn test_list_sorted_by_creation() {
        let dir = tempdir().unwrap();
        let store = UserStore::new(dir.path());
        let first = make_user("a@example.com");
        let mut second = make_user("b@example.com");
        second.created_at = first.created_at + chrono::Duration::seconds(5);

        store.save(&second).unwrap();
        store.save(&first).unwrap();

        let users = store.list().unwrap();
        assert_eq!(users[0].email, "a@example.com");
        assert_eq!(users[1].email, "b@example.com");
    }
}
