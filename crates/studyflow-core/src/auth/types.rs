//! Shared types for credentials, accounts and the auth wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage key of the access credential
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the refresh credential
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key of the signed-in user
pub const LOGGED_IN_USER_KEY: &str = "loggedInUser";
/// Storage key of the registered user list
pub const USERS_KEY: &str = "users";

/// The active access/refresh credential pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Standard API response envelope: `{message?, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenData {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub type SignInData = CredentialPair;

/// Events the host application subscribes to instead of being navigated away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were dropped because they could not be renewed
    Expired { redirect_to: String, reason: String },
    /// The user signed out explicitly
    SignedOut,
}

/// A registered local account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registration form input
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Profile edit input. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_wire_format() {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: "r1".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "refreshToken": "r1" }));

        let envelope: ApiEnvelope<RefreshTokenData> =
            serde_json::from_str(r#"{"message":"ok","data":{"accessToken":"tok2"}}"#).unwrap();
        assert_eq!(envelope.data.access_token, "tok2");
        assert_eq!(envelope.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_credential_pair_debug_is_redacted() {
        let pair = CredentialPair::new("secret-access", "secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
