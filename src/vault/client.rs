//! HTTP client for the Vault OIDC exchange.
//!
//! Two calls, each attempted exactly once:
//! 1. `POST /v1/auth/github-oidc/login` — trade the workflow's OIDC jwt for
//!    a Vault session token. Not retried: the jwt is short-lived and a retry
//!    with the same jwt fails identically.
//! 2. `GET /v1/github/token/<role>` — read the ephemeral GitHub token, with
//!    the session in the `X-Vault-Token` header (a header, never a query
//!    parameter, so it stays out of access logs).

use crate::error::{ApiFailure, FlowError};
use crate::secret::SecretString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// The audience claim the OIDC jwt must carry for Vault to accept it.
pub const VAULT_AUDIENCE: &str = "vault";

/// Bounded per-request timeout; a stuck call should fail the job loudly
/// rather than hang CI.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A Vault session token, scoped to one role, used for exactly one read.
#[derive(Debug)]
pub struct VaultSession(SecretString);

impl VaultSession {
    fn header_value(&self) -> &str {
        self.0.reveal()
    }
}

pub struct VaultClient {
    http: Client,
    addr: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    role: &'a str,
    jwt: &'a str,
    jwt_github_audience: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: Option<String>,
}

#[derive(Deserialize)]
struct SecretResponse {
    data: Option<SecretData>,
}

#[derive(Deserialize)]
struct SecretData {
    token: Option<String>,
}

impl VaultClient {
    pub fn new(addr: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            addr: addr.into(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Exchange the OIDC jwt for a Vault session scoped to `role`.
    pub async fn login(&self, role: &str, jwt: &SecretString) -> Result<VaultSession, FlowError> {
        let url = format!("{}/v1/auth/github-oidc/login", self.addr);
        let body = LoginRequest {
            role,
            jwt: jwt.reveal(),
            jwt_github_audience: VAULT_AUDIENCE,
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FlowError::AuthExchange(e.into()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FlowError::AuthExchange(ApiFailure::Status { status, body }));
        }

        let decoded: LoginResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::AuthExchange(e.into()))?;

        let client_token = decoded
            .auth
            .and_then(|a| a.client_token)
            .filter(|t| !t.is_empty())
            .ok_or(FlowError::AuthExchange(ApiFailure::MissingField(
                "no client token returned from Vault",
            )))?;

        info!("Successfully logged into Vault via OIDC");
        Ok(VaultSession(SecretString::new(client_token)))
    }

    /// Read the ephemeral GitHub token for `role` using the session.
    pub async fn fetch_github_token(
        &self,
        role: &str,
        session: &VaultSession,
    ) -> Result<SecretString, FlowError> {
        let url = format!("{}/v1/github/token/{role}", self.addr);

        let resp = self
            .http
            .get(&url)
            .header("X-Vault-Token", session.header_value())
            .send()
            .await
            .map_err(|e| FlowError::SecretFetch(e.into()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FlowError::SecretFetch(ApiFailure::Status { status, body }));
        }

        let decoded: SecretResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::SecretFetch(e.into()))?;

        let token = decoded
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or(FlowError::SecretFetch(ApiFailure::MissingField(
                "no token found in Vault secret response",
            )))?;

        Ok(SecretString::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_sends_expected_body_and_extracts_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/github-oidc/login"))
            .and(body_json(serde_json::json!({
                "role": "token-policy-abc",
                "jwt": "header.payload.sig",
                "jwt_github_audience": "vault",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "auth": { "client_token": "hvs.session" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(server.uri());
        let session = client
            .login("token-policy-abc", &SecretString::new("header.payload.sig"))
            .await
            .unwrap();
        assert_eq!(session.header_value(), "hvs.session");
    }

    #[tokio::test]
    async fn login_non_2xx_includes_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/github-oidc/login"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"errors": ["permission denied"]})),
            )
            .mount(&server)
            .await;

        let client = VaultClient::new(server.uri());
        let err = client
            .login("r", &SecretString::new("jwt"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("login failed"));
        assert!(msg.contains("permission denied"));
    }

    #[tokio::test]
    async fn login_without_client_token_is_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/github-oidc/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "auth": {}
            })))
            .mount(&server)
            .await;

        let client = VaultClient::new(server.uri());
        let err = client
            .login("r", &SecretString::new("jwt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no client token returned from Vault"));
    }

    #[tokio::test]
    async fn fetch_uses_session_header_and_role_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/github/token/token-policy-abc"))
            .and(header("X-Vault-Token", "hvs.session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "token": "ghs_ephemeral" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(server.uri());
        let session = VaultSession(SecretString::new("hvs.session"));
        let token = client
            .fetch_github_token("token-policy-abc", &session)
            .await
            .unwrap();
        assert_eq!(token.reveal(), "ghs_ephemeral");
    }

    #[tokio::test]
    async fn fetch_without_token_field_is_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/github/token/r"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {}
            })))
            .mount(&server)
            .await;

        let client = VaultClient::new(server.uri());
        let session = VaultSession(SecretString::new("hvs.session"));
        let err = client.fetch_github_token("r", &session).await.unwrap_err();
        assert!(err.to_string().contains("no token found"));
    }
}
