//! Error taxonomy for the token lifecycle.
//!
//! Four failure classes, matching what an operator needs to triage:
//! configuration mistakes (fix the workflow), Vault login failures, Vault
//! secret-fetch failures, and verification failures ("we have a token but it
//! doesn't work"). Error bodies from Vault/GitHub are included verbatim for
//! diagnosis; token values never are.

use thiserror::Error;

/// Why a single HTTP exchange failed.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    MissingField(&'static str),
}

/// Terminal failure of the acquire phase.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Bad input or missing ambient environment; never involves the network.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The OIDC-for-session exchange with Vault failed.
    #[error("vault login failed: {0}")]
    AuthExchange(ApiFailure),

    /// The session was valid but the secret read failed or was malformed.
    #[error("vault secret fetch failed: {0}")]
    SecretFetch(ApiFailure),

    /// Vault handed us a token GitHub rejects.
    #[error("token verification failed: {0}")]
    Verification(ApiFailure),
}

impl FlowError {
    /// Operator-facing name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            FlowError::Configuration(_) => "configuration",
            FlowError::AuthExchange(_) => "vault-login",
            FlowError::SecretFetch(_) => "vault-secret-fetch",
            FlowError::Verification(_) => "token-verification",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failure_message_names_login() {
        let err = FlowError::AuthExchange(ApiFailure::Status {
            status: 403,
            body: "permission denied".into(),
        });
        let msg = err.to_string();
        assert!(msg.contains("login failed"));
        assert!(msg.contains("permission denied"));
        assert_eq!(err.stage(), "vault-login");
    }

    #[test]
    fn missing_token_field_message() {
        let err = FlowError::SecretFetch(ApiFailure::MissingField(
            "no token found in Vault secret response",
        ));
        assert!(err.to_string().contains("no token found"));
    }

    #[test]
    fn configuration_is_verbatim() {
        let err = FlowError::Configuration("invalid vault instance: 'staging'".into());
        assert!(err.to_string().contains("invalid vault instance: 'staging'"));
        assert_eq!(err.stage(), "configuration");
    }
}
