//! GitHub API client: verify the fetched token works, and revoke it during
//! job teardown.

use crate::error::{ApiFailure, FlowError};
use crate::secret::SecretString;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_JSON: &str = "application/vnd.github+json";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cardinality-only result of token verification; safe to log.
#[derive(Debug, Clone, Copy)]
pub struct VerificationSummary {
    pub repository_count: u64,
}

pub struct GithubClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InstallationRepositories {
    total_count: u64,
}

impl GithubClient {
    /// `base_url` is normally [`DEFAULT_API_BASE`]; the runner's
    /// `GITHUB_API_URL` (or a test server) can override it.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        Self::new(base)
    }

    /// One read-only call to prove the token is usable before the job's
    /// remaining steps depend on it.
    pub async fn verify_token(
        &self,
        token: &SecretString,
    ) -> Result<VerificationSummary, FlowError> {
        let url = format!("{}/installation/repositories", self.base_url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token.reveal())
            .header("Accept", ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| FlowError::Verification(e.into()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FlowError::Verification(ApiFailure::Status { status, body }));
        }

        let decoded: InstallationRepositories = resp
            .json()
            .await
            .map_err(|e| FlowError::Verification(e.into()))?;

        info!(
            "GitHub token has access to {} repositories",
            decoded.total_count
        );
        Ok(VerificationSummary {
            repository_count: decoded.total_count,
        })
    }

    /// Invalidate the token. Errors are returned, not logged; the release
    /// flow downgrades them to warnings rather than failing teardown.
    pub async fn revoke_token(&self, token: &SecretString) -> Result<(), ApiFailure> {
        let url = format!("{}/installation/token", self.base_url);

        let resp = self
            .http
            .delete(&url)
            .bearer_auth(token.reveal())
            .header("Accept", ACCEPT_JSON)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiFailure::Status { status, body });
        }

        Ok(())
    }
}
