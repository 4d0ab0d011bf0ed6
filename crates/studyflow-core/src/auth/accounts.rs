//! Local accounts
//!
//! Registered users live as a JSON array under `users`; the signed-in user is
//! mirrored under `loggedInUser`. Passwords are kept as SHA-256 hex digests.

use super::types::{LOGGED_IN_USER_KEY, NewAccount, ProfileUpdate, USERS_KEY, User};
use chrono::Utc;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use studyflow_storage::LocalStorage;
use thiserror::Error;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Name is required")]
    MissingName,

    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type AccountResult<T> = std::result::Result<T, AccountError>;

/// Local register / sign-in / profile store.
#[derive(Debug, Clone)]
pub struct AccountStore {
    storage: LocalStorage,
}

impl AccountStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn list_users(&self) -> AccountResult<Vec<User>> {
        Ok(self.storage.get_json(USERS_KEY)?.unwrap_or_default())
    }

    pub fn current_user(&self) -> AccountResult<Option<User>> {
        Ok(self.storage.get_json(LOGGED_IN_USER_KEY)?)
    }

    pub fn register(&self, account: NewAccount) -> AccountResult<User> {
        let email = normalize_email(&account.email)?;
        check_password(&account.password, &account.confirm_password)?;

        let first_name = account.first_name.trim().to_string();
        let last_name = account.last_name.trim().to_string();
        let name = full_name(&first_name, &last_name);
        if name.is_empty() {
            return Err(AccountError::MissingName);
        }

        let mut users = self.list_users()?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(AccountError::EmailTaken(email));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: hash_password(&account.password),
            phone: non_empty(account.phone),
            first_name: Some(first_name).filter(|s| !s.is_empty()),
            last_name: Some(last_name).filter(|s| !s.is_empty()),
            created_at: Utc::now(),
            updated_at: None,
        };

        users.push(user.clone());
        self.storage.set_json(USERS_KEY, &users)?;

        info!(user_id = %user.id, "Registered local account");
        Ok(user)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> AccountResult<User> {
        let email = email.trim();
        let hash = hash_password(password);

        let user = self
            .list_users()?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.password_hash == hash)
            .ok_or(AccountError::InvalidCredentials)?;

        self.storage.set_json(LOGGED_IN_USER_KEY, &user)?;
        info!(user_id = %user.id, "Local sign-in");
        Ok(user)
    }

    pub fn sign_out(&self) -> AccountResult<()> {
        self.storage.remove_item(LOGGED_IN_USER_KEY)?;
        Ok(())
    }

    /// Apply `update` to the signed-in user, in both `users` and `loggedInUser`.
    pub fn update_profile(&self, update: ProfileUpdate) -> AccountResult<User> {
        let current = self.current_user()?.ok_or(AccountError::NotSignedIn)?;
        let mut users = self.list_users()?;
        let index = users
            .iter()
            .position(|u| u.id == current.id)
            .ok_or(AccountError::NotSignedIn)?;

        let mut user = users[index].clone();

        if let Some(email) = update.email {
            let email = normalize_email(&email)?;
            let taken = users
                .iter()
                .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&email));
            if taken {
                return Err(AccountError::EmailTaken(email));
            }
            user.email = email;
        }

        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            check_password(&password, update.confirm_password.as_deref().unwrap_or_default())?;
            user.password_hash = hash_password(&password);
        }

        if let Some(first_name) = update.first_name {
            user.first_name = Some(first_name.trim().to_string()).filter(|s| !s.is_empty());
        }
        if let Some(last_name) = update.last_name {
            user.last_name = Some(last_name.trim().to_string()).filter(|s| !s.is_empty());
        }
        if update.phone.is_some() {
            user.phone = non_empty(update.phone);
        }

        let name = full_name(
            user.first_name.as_deref().unwrap_or_default(),
            user.last_name.as_deref().unwrap_or_default(),
        );
        if !name.is_empty() {
            user.name = name;
        }
        user.updated_at = Some(Utc::now());

        users[index] = user.clone();
        self.storage.set_json(USERS_KEY, &users)?;
        self.storage.set_json(LOGGED_IN_USER_KEY, &user)?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

fn normalize_email(email: &str) -> AccountResult<String> {
    let email = email.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(AccountError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

fn check_password(password: &str, confirm: &str) -> AccountResult<()> {
    if password != confirm {
        return Err(AccountError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort);
    }
    Ok(())
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
