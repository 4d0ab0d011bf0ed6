//! Authentication and session management
//!
//! - Credential pair storage in local storage
//! - Single-flight access token renewal
//! - Session expiry notifications
//! - Local accounts for the signed-in user

pub mod accounts;
pub mod credentials;
pub mod refresh;
pub mod session;
pub mod types;

pub use accounts::{AccountError, AccountStore};
pub use credentials::CredentialStore;
pub use refresh::{HttpTokenRenewer, TokenRenewer};
pub use session::{SessionManager, SessionPhase};
pub use types::{CredentialPair, NewAccount, ProfileUpdate, SessionEvent, User};
