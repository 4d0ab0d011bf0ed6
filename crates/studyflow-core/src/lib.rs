pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod paths;

pub use config::ClientConfig;
pub use error::{GatewayError, RenewalError};

use auth::{AccountStore, CredentialStore, HttpTokenRenewer, SessionManager};
use http::ApiClient;
use std::path::Path;
use std::sync::Arc;
use studyflow_storage::Storage;
use tracing::info;

/// Core application state shared by every entry point
///
/// Owns the one [`SessionManager`] of the process; every API call goes
/// through `api`, which holds a handle to it.
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub session: Arc<SessionManager>,
    pub api: ApiClient,
    pub accounts: AccountStore,
}

impl AppCore {
    pub fn new(db_path: impl AsRef<Path>, config: ClientConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let storage = Arc::new(Storage::new(db_path)?);
        let renewer = Arc::new(HttpTokenRenewer::new(&config)?);
        let session = Arc::new(
            SessionManager::new(
                CredentialStore::new(storage.local.clone()),
                renewer,
                config.login_route.clone(),
            )
            .with_renewal_timeout(config.timeout()),
        );
        let api = ApiClient::new(config, session.clone())?;
        let accounts = AccountStore::new(storage.local.clone());

        info!(base_url = %api.config().base_url, "Initialized StudyFlow core");

        Ok(Self {
            storage,
            session,
            api,
            accounts,
        })
    }

    /// Sign out of both the API session and the local account.
    pub fn sign_out(&self) -> anyhow::Result<()> {
        self.session.sign_out()?;
        self.accounts.sign_out()?;
        Ok(())
    }
}
