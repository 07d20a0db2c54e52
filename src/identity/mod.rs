//! Workload identity token minting.
//!
//! The acquire phase needs a fresh OIDC jwt scoped to the Vault audience
//! immediately before login — the tokens live for minutes, so there is
//! nothing to cache. Production mints through the Actions runner's identity
//! endpoint (`ACTIONS_ID_TOKEN_REQUEST_URL`); tests inject a canned provider.

use crate::error::{ApiFailure, FlowError};
use crate::secret::SecretString;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Mints a fresh workload identity token for a given audience.
#[async_trait]
pub trait IdentityTokenProvider: Send + Sync {
    async fn id_token(&self, audience: &str) -> Result<SecretString, FlowError>;
}

/// Mints OIDC tokens through the GitHub Actions runner.
pub struct ActionsIdentityProvider {
    http: Client,
    request_url: String,
    request_token: String,
}

#[derive(Deserialize)]
struct IdTokenResponse {
    value: Option<String>,
}

impl ActionsIdentityProvider {
    /// Build from the runner-provided environment. Both variables are only
    /// present when the workflow grants `id-token: write`.
    pub fn from_env() -> Result<Self, FlowError> {
        let request_url = std::env::var("ACTIONS_ID_TOKEN_REQUEST_URL").map_err(|_| {
            FlowError::Configuration(
                "ACTIONS_ID_TOKEN_REQUEST_URL is not set; does the workflow grant id-token: write?"
                    .into(),
            )
        })?;
        let request_token = std::env::var("ACTIONS_ID_TOKEN_REQUEST_TOKEN").map_err(|_| {
            FlowError::Configuration("ACTIONS_ID_TOKEN_REQUEST_TOKEN is not set".into())
        })?;
        Ok(Self::new(request_url, request_token))
    }

    pub fn new(request_url: impl Into<String>, request_token: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            request_url: request_url.into(),
            request_token: request_token.into(),
        }
    }
}

#[async_trait]
impl IdentityTokenProvider for ActionsIdentityProvider {
    async fn id_token(&self, audience: &str) -> Result<SecretString, FlowError> {
        let separator = if self.request_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{separator}audience={audience}", self.request_url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.request_token)
            .send()
            .await
            .map_err(|e| FlowError::AuthExchange(e.into()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FlowError::AuthExchange(ApiFailure::Status { status, body }));
        }

        let decoded: IdTokenResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::AuthExchange(e.into()))?;

        decoded
            .value
            .filter(|v| !v.is_empty())
            .map(SecretString::new)
            .ok_or(FlowError::AuthExchange(ApiFailure::MissingField(
                "identity endpoint returned no token value",
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn mints_token_with_audience_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/idtoken"))
            .and(query_param("audience", "vault"))
            .and(header("Authorization", "Bearer runner-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": "header.payload.sig"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            ActionsIdentityProvider::new(format!("{}/idtoken", server.uri()), "runner-token");
        let jwt = provider.id_token("vault").await.unwrap();
        assert_eq!(jwt.reveal(), "header.payload.sig");
    }

    #[tokio::test]
    async fn appends_audience_to_existing_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/idtoken"))
            .and(query_param("api-version", "2"))
            .and(query_param("audience", "vault"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": "jwt"
            })))
            .mount(&server)
            .await;

        let provider = ActionsIdentityProvider::new(
            format!("{}/idtoken?api-version=2", server.uri()),
            "runner-token",
        );
        assert!(provider.id_token("vault").await.is_ok());
    }

    #[tokio::test]
    async fn empty_value_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/idtoken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": ""
            })))
            .mount(&server)
            .await;

        let provider =
            ActionsIdentityProvider::new(format!("{}/idtoken", server.uri()), "runner-token");
        let err = provider.id_token("vault").await.unwrap_err();
        assert!(err.to_string().contains("no token value"));
    }
}
