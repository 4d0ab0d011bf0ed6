//! API client with bearer auth and transparent token renewal.

use std::sync::Arc;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, warn};

use super::build_http_client;
use super::request::{ApiRequest, ApiResponse};
use crate::auth::SessionManager;
use crate::auth::types::{ApiEnvelope, SignInData, SignInRequest};
use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};

/// Gateway for all outbound API calls.
///
/// Attaches `Authorization: Bearer <accessToken>` when a token is stored.
/// A 401 on any call other than the renewal call hands off to the
/// [`SessionManager`], and the call is replayed once with the renewed token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let client = build_http_client(config.timeout())?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request, renewing the access token on 401 if possible.
    ///
    /// The configured timeout bounds the whole call: the first attempt, any
    /// wait behind a renewal, and the replay.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        tokio::time::timeout(self.config.timeout(), self.send_with_recovery(request))
            .await
            .map_err(|_| {
                warn!(method = %request.method, path = %request.path, "API call timed out");
                GatewayError::Timeout
            })?
    }

    async fn send_with_recovery(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let token = self.session.access_token()?;
        let response = self.dispatch(request, token.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED || self.is_renewal_call(request) {
            return finish(response);
        }

        debug!(method = %request.method, path = %request.path, "Unauthorized, recovering session");
        let renewed = self.session.recover(token.as_deref()).await?;

        let replay = self.dispatch(request, Some(&renewed)).await?;
        if replay.status == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "Replayed request still unauthorized");
        }
        finish(replay)
    }

    /// Send a request and return the `data` field of the response envelope.
    pub async fn send_data<T: serde::de::DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        self.send(request).await?.data()
    }

    /// Exchange email and password for a credential pair and store it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let request = ApiRequest::post(self.config.sign_in_path.clone()).with_json(&SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let response = finish(self.dispatch(&request, None).await?)?;
        let envelope: ApiEnvelope<SignInData> = response.json()?;
        self.session.store_credentials(&envelope.data)?;

        info!(email, "Signed in");
        Ok(())
    }

    /// Unauthenticated health check against the root URL.
    pub async fn health(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(self.config.root_url_for("/health"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        finish(ApiResponse { status, body })?.json()
    }

    fn is_renewal_call(&self, request: &ApiRequest) -> bool {
        let normalize = |path: &str| path.trim_matches('/').to_string();
        normalize(&request.path) == normalize(&self.config.refresh_path)
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse> {
        let mut url = Url::parse(&self.config.api_url(&request.path))
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(method = %request.method, path = %request.path, %status, "API response");
        Ok(ApiResponse { status, body })
    }
}

fn finish(response: ApiResponse) -> Result<ApiResponse> {
    match response.status {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
        status => Err(GatewayError::Status {
            status,
            body: response.body,
        }),
    }
}
