//! Account registration, login and profile management.
//!
//! Users are indexed in memory by id and persisted through [`UserStore`].
//! Every mutation follows the same order: validate, take the write lock,
//! re-check uniqueness, persist, then update the index.

use std::collections::HashMap;
use std::sync::RwLock;

use akwaaba_models::{AccountStatus, Role, User, UserId};
use akwaaba_persistence::{PersistenceError, UserStore};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{poisoned, CoreError, Result};
use crate::password::PasswordHasher;
use crate::session::{Session, SessionManager};
use crate::validation::{
    is_valid_email, is_valid_phone, normalize_email, normalize_phone, password_problems,
    MIN_NAME_LEN,
};

const BAD_CREDENTIALS: &str = "Invalid email/phone or password";

/// Registration input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Profile changes; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Empty string clears the wallet.
    pub wallet_address: Option<String>,
    pub marketing_opt_in: Option<bool>,
}

/// Returns `Forbidden` unless `user` has `role`.
pub fn require_role(user: &User, role: Role) -> Result<()> {
    if user.role == role {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{} access required",
            match role {
                Role::Organizer => "Organizer",
                Role::Attendee => "Attendee",
            }
        )))
    }
}

/// Account service.
#[derive(Debug)]
pub struct Accounts {
    store: UserStore,
    users: RwLock<HashMap<UserId, User>>,
    sessions: SessionManager,
    hasher: PasswordHasher,
}

impl Accounts {
    /// Loads every stored user into the index.
    pub fn load(store: UserStore, sessions: SessionManager, hasher: PasswordHasher) -> Result<Self> {
        let users: HashMap<UserId, User> = store
            .list()?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        tracing::debug!(count = users.len(), "Loaded users");
        Ok(Self {
            store,
            users: RwLock::new(users),
            sessions,
            hasher,
        })
    }

    /// Creates an account after validating every field.
    pub fn register(&self, input: NewAccount) -> Result<User> {
        let full_name = input.full_name.trim().to_string();
        let email = normalize_email(&input.email);
        let phone = normalize_phone(&input.phone);

        let mut problems = Vec::new();
        let role = match input.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                problems.push("Role must be organizer or attendee".to_string());
                None
            }
        };
        problems.extend(profile_problems(&full_name, &email, &phone));
        problems.extend(password_problems(&input.password, &input.confirm_password));

        let role = match role {
            Some(role) if problems.is_empty() => role,
            _ => return Err(CoreError::Validation(problems)),
        };

        let hash = self.hasher.hash(&input.password)?;
        let user = User::new(role, full_name, email, phone, hash);

        let mut users = self.users.write().map_err(poisoned)?;
        check_unique(&users, &user.email, &user.phone, None)?;
        self.store.save(&user)?;
        users.insert(user.id.clone(), user.clone());

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Verifies credentials and starts a session.
    ///
    /// `identifier` is an email when it contains `@`, otherwise a phone.
    /// The account is re-read from disk before and after the password check,
    /// and the session is issued under the index lock, so a concurrent or
    /// out-of-process disable is never overwritten.
    pub fn login(&self, identifier: &str, password: &str) -> Result<(Session, User)> {
        let Some(found) = self.find_by_identifier(identifier)? else {
            warn!("Rejected login for unknown identifier");
            return Err(CoreError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };
        let candidate = {
            let mut users = self.users.write().map_err(poisoned)?;
            match self.fresh(&mut users, &found.id) {
                Err(CoreError::NotFound(_)) => {
                    return Err(CoreError::Unauthorized(BAD_CREDENTIALS.to_string()))
                }
                other => other?,
            }
        };

        if !self.hasher.verify(password, &candidate.password_hash) {
            warn!(user_id = %candidate.id, "Rejected login with wrong password");
            return Err(CoreError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let mut users = self.users.write().map_err(poisoned)?;
        let mut user = self.fresh(&mut users, &candidate.id)?;
        if user.password_hash != candidate.password_hash {
            return Err(CoreError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
        if !user.is_active() {
            warn!(user_id = %user.id, "Rejected login for disabled account");
            return Err(CoreError::Forbidden(
                "This account has been disabled".to_string(),
            ));
        }

        user.record_login(Utc::now());
        self.save_locked(&mut users, &user)?;
        let session = self.sessions.create(&user.id, user.role)?;
        drop(users);

        info!(user_id = %user.id, "User logged in");
        Ok((session, user))
    }

    /// Ends a session.
    pub fn logout(&self, token: &str) -> Result<()> {
        self.sessions.revoke(token)?;
        Ok(())
    }

    /// Resolves a bearer token to its session and current user.
    ///
    /// The user document is re-read on every call so a disable made by
    /// another process takes effect on the next request.
    pub fn resolve(&self, token: &str) -> Result<(Session, User)> {
        let session = self
            .sessions
            .resolve(token)?
            .ok_or_else(|| CoreError::Unauthorized("Session expired or invalid".to_string()))?;

        let current = {
            let mut users = self.users.write().map_err(poisoned)?;
            self.fresh(&mut users, &session.user_id)
        };
        match current {
            Ok(user) if user.accepts_session(session.created_at) => Ok((session, user)),
            Ok(_) | Err(CoreError::NotFound(_)) => {
                self.sessions.revoke(token)?;
                Err(CoreError::Unauthorized(
                    "Session expired or invalid".to_string(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Applies profile changes for `user_id`.
    pub fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User> {
        let mut users = self.users.write().map_err(poisoned)?;
        let mut user = self.fresh(&mut users, user_id)?;

        let full_name = update
            .full_name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| user.full_name.clone());
        let email = update
            .email
            .map(|e| normalize_email(&e))
            .unwrap_or_else(|| user.email.clone());
        let phone = update
            .phone
            .map(|p| normalize_phone(&p))
            .unwrap_or_else(|| user.phone.clone());

        let problems = profile_problems(&full_name, &email, &phone);
        if !problems.is_empty() {
            return Err(CoreError::Validation(problems));
        }
        check_unique(&users, &email, &phone, Some(&user.id))?;

        if email != user.email {
            user.settings.email_verified = false;
        }
        if phone != user.phone {
            user.settings.phone_verified = false;
        }
        user.full_name = full_name;
        user.email = email;
        user.phone = phone;
        if let Some(wallet) = update.wallet_address {
            let wallet = Some(wallet.trim().to_string()).filter(|w| !w.is_empty());
            user.settings.payout_address = wallet.clone();
            user.wallet_address = wallet;
        }
        if let Some(opt_in) = update.marketing_opt_in {
            user.settings.marketing_opt_in = opt_in;
        }
        user.touch();
        self.save_locked(&mut users, &user)?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Replaces the password after checking the current one.
    pub fn change_password(
        &self,
        user_id: &UserId,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<()> {
        let snapshot = {
            let mut users = self.users.write().map_err(poisoned)?;
            self.fresh(&mut users, user_id)?
        };
        if !self.hasher.verify(current, &snapshot.password_hash) {
            return Err(CoreError::invalid("Current password is incorrect"));
        }

        let mut problems = password_problems(new, confirm);
        if new == current {
            problems.push("New password must be different from the current one".to_string());
        }
        if !problems.is_empty() {
            return Err(CoreError::Validation(problems));
        }
        let new_hash = self.hasher.hash(new)?;

        let mut users = self.users.write().map_err(poisoned)?;
        let mut user = self.fresh(&mut users, user_id)?;
        if user.password_hash != snapshot.password_hash {
            return Err(CoreError::Conflict(
                "The password was changed by another request; try again".to_string(),
            ));
        }
        user.password_hash = new_hash;
        user.touch();
        self.save_locked(&mut users, &user)?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Enables or disables an account. Disabling ends its sessions here and
    /// voids sessions held by any other process on the same data directory.
    pub fn set_status(&self, identifier: &str, status: AccountStatus) -> Result<User> {
        let found = self
            .find_by_identifier(identifier)?
            .ok_or_else(|| CoreError::not_found(format!("user {}", identifier.trim())))?;

        let mut users = self.users.write().map_err(poisoned)?;
        let mut user = self.fresh(&mut users, &found.id)?;
        user.status = status;
        if status == AccountStatus::Disabled {
            user.sessions_revoked_at = Some(Utc::now());
        }
        user.touch();
        self.save_locked(&mut users, &user)?;

        if status == AccountStatus::Disabled {
            let ended = self.sessions.revoke_user(&user.id)?;
            info!(user_id = %user.id, sessions_ended = ended, "User disabled");
        } else {
            info!(user_id = %user.id, "User enabled");
        }
        Ok(user)
    }

    /// All users, oldest first.
    pub fn list(&self) -> Result<Vec<User>> {
        let users = self.users.read().map_err(poisoned)?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    /// Looks up a user by id.
    pub fn get(&self, id: &UserId) -> Result<User> {
        let users = self.users.read().map_err(poisoned)?;
        users
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("user"))
    }

    /// Looks up a user by id, email or phone.
    pub fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let identifier = identifier.trim();
        let users = self.users.read().map_err(poisoned)?;

        if let Some(user) = users.get(&UserId::from_string(identifier)) {
            return Ok(Some(user.clone()));
        }
        let found = if identifier.contains('@') {
            let email = normalize_email(identifier);
            users.values().find(|u| u.email == email)
        } else {
            let phone = normalize_phone(identifier);
            if phone.is_empty() {
                None
            } else {
                users.values().find(|u| u.phone == phone)
            }
        };
        Ok(found.cloned())
    }

    /// Re-reads a user document into the index. Callers hold the write lock,
    /// so the copy they modify is the one on disk.
    fn fresh(&self, users: &mut HashMap<UserId, User>, id: &UserId) -> Result<User> {
        match self.store.load(id) {
            Ok(user) => {
                users.insert(id.clone(), user.clone());
                Ok(user)
            }
            Err(PersistenceError::NotFound { .. }) => {
                users.remove(id);
                Err(CoreError::not_found("user"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_locked(&self, users: &mut HashMap<UserId, User>, user: &User) -> Result<()> {
        self.store.save(user)?;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

fn profile_problems(full_name: &str, email: &str, phone: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if full_name.chars().count() < MIN_NAME_LEN {
        problems.push(format!(
            "Full name must be at least {} characters",
            MIN_NAME_LEN
        ));
    }
    if !is_valid_email(email) {
        problems.push("Enter a valid email address".to_string());
    }
    if !is_valid_phone(phone) {
        problems.push("Enter a valid phone number (7-15 digits)".to_string());
    }
    problems
}

fn check_unique(
    users: &HashMap<UserId, User>,
    email: &str,
    phone: &str,
    except: Option<&UserId>,
) -> Result<()> {
    let is_other = |u: &User| Some(&u.id) != except;
    let email_taken = users.values().any(|u| is_other(u) && u.email == email);
    let phone_taken = users.values().any(|u| is_other(u) && u.phone == phone);

    let taken = match (email_taken, phone_taken) {
        (true, true) => "email and phone number",
        (true, false) => "email",
        (false, true) => "phone number",
        (false, false) => return Ok(()),
    };
    Err(CoreError::Conflict(format!(
        "An account with this {} already exists",
        taken
    )))
}
