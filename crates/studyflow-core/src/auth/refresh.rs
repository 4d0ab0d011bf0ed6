//! Access token renewal.

use super::types::{ApiEnvelope, RefreshTokenData, RefreshTokenRequest};
use crate::config::ClientConfig;
use crate::error::RenewalError;
use crate::http::build_http_client;
use async_trait::async_trait;
use reqwest::Client;

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRenewer: Send + Sync {
    async fn renew(&self, refresh_token: &str) -> Result<String, RenewalError>;
}

/// Renews against `POST {base_url}{refresh_path}`.
///
/// Uses its own client so renewal calls never pass through the gateway's
/// unauthorized handling.
#[derive(Debug, Clone)]
pub struct HttpTokenRenewer {
    client: Client,
    url: String,
}

impl HttpTokenRenewer {
    pub fn new(config: &ClientConfig) -> Result<Self, RenewalError> {
        let client = build_http_client(config.timeout())
            .map_err(|e| RenewalError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.api_url(&config.refresh_path),
        })
    }
}

#[async_trait]
impl TokenRenewer for HttpTokenRenewer {
    async fn renew(&self, refresh_token: &str) -> Result<String, RenewalError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| RenewalError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenewalError::Rejected(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RenewalError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<RefreshTokenData> = serde_json::from_str(&body)
            .map_err(|e| RenewalError::MalformedResponse(e.to_string()))?;

        let access_token = envelope.data.access_token;
        if access_token.trim().is_empty() {
            return Err(RenewalError::MalformedResponse(
                "empty access token".to_string(),
            ));
        }

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn renewer_for(server: &MockServer) -> HttpTokenRenewer {
        HttpTokenRenewer::new(&ClientConfig::for_server(&server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_renew_returns_new_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(serde_json::json!({ "refreshToken": "r1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "data": { "accessToken": "tok2" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = renewer_for(&server).await.renew("r1").await.unwrap();
        assert_eq!(token, "tok2");
    }

    #[tokio::test]
    async fn test_renew_rejected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = renewer_for(&server).await.renew("r1").await.unwrap_err();
        assert_eq!(err, RenewalError::Rejected(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_renew_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok2" })),
            )
            .mount(&server)
            .await;

        let err = renewer_for(&server).await.renew("r1").await.unwrap_err();
        assert!(matches!(err, RenewalError::MalformedResponse(_)));
    }
}
