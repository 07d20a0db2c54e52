//! Lifecycle orchestration.
//!
//! The acquire phase walks a straight line: resolve instance → resolve role
//! → mint OIDC jwt → Vault login → token fetch → mask → verify → publish.
//! Every step is attempted once and the first failure aborts the rest, so a
//! partial or unverified token is never written to state or outputs.
//!
//! The release phase runs in a separate process during job teardown and is
//! infallible by signature: revocation problems become warnings, because a
//! hard failure here would mask the job's actual outcome.

use crate::actions::{OutputSink, StateChannel, TOKEN_STATE_KEY};
use crate::error::FlowError;
use crate::github::GithubClient;
use crate::identity::IdentityTokenProvider;
use crate::secret::SecretString;
use crate::vault::client::VAULT_AUDIENCE;
use crate::vault::{role, VaultClient, VaultInstance};
use tracing::{info, warn};

/// Caller-supplied inputs for the acquire phase.
pub struct AcquireRequest<'a> {
    /// Explicit Vault role; wins over derivation when non-empty.
    pub vault_role: Option<&'a str>,
    /// `GITHUB_WORKFLOW_REF`, required only when no explicit role is given.
    pub workflow_ref: Option<&'a str>,
}

/// Full acquire phase: resolves the Vault instance to an address, then runs
/// the exchange. An unknown instance fails here, before any network call.
pub async fn acquire(
    vault_instance: &str,
    request: AcquireRequest<'_>,
    identity: &dyn IdentityTokenProvider,
    github: &GithubClient,
    state: &StateChannel,
    outputs: &OutputSink,
) -> Result<(), FlowError> {
    let instance = VaultInstance::parse(vault_instance)?;
    let vault = VaultClient::new(instance.address());
    acquire_with(&vault, request, identity, github, state, outputs).await
}

/// Acquire against an already-constructed Vault client. Split out so tests
/// can point the client at a mock server.
pub async fn acquire_with(
    vault: &VaultClient,
    request: AcquireRequest<'_>,
    identity: &dyn IdentityTokenProvider,
    github: &GithubClient,
    state: &StateChannel,
    outputs: &OutputSink,
) -> Result<(), FlowError> {
    let role = role::resolve(request.vault_role, request.workflow_ref)?;

    info!("--- Vault input parameters ---");
    info!("VAULT_ADDR: {}", vault.addr());
    info!("VAULT_ROLE: {role}");
    info!("Vault secrets path expected: github/token/{role}");
    info!("------------------------------");

    // Minted immediately before use; OIDC jwts live for minutes.
    let jwt = identity.id_token(VAULT_AUDIENCE).await?;
    let session = vault.login(&role, &jwt).await?;
    let token = vault.fetch_github_token(&role, &session).await?;

    // Register with the runner's log masker before the token goes anywhere.
    outputs.mask(&token);

    github.verify_token(&token).await?;

    // Publish only after verification: the post step must never see an
    // unverified token, and a failed acquire must leave no state behind.
    state
        .write(TOKEN_STATE_KEY, &token)
        .map_err(|e| FlowError::Configuration(e.to_string()))?;
    outputs
        .set_output("token", &token)
        .map_err(|e| FlowError::Configuration(e.to_string()))?;

    Ok(())
}

/// Release phase: revoke the token saved by the acquire phase, best-effort.
pub async fn release(
    skip_revoke: bool,
    explicit_token: Option<SecretString>,
    state: &StateChannel,
    github: &GithubClient,
) {
    if skip_revoke {
        info!("skip-revoke is set, skipping token revocation");
        return;
    }

    let token = explicit_token
        .filter(|t| !t.is_empty())
        .or_else(|| state.read(TOKEN_STATE_KEY));
    let Some(token) = token else {
        // Normal when acquire failed before issuing a token.
        info!("No GitHub ephemeral token found, skipping revoke");
        return;
    };

    match github.revoke_token(&token).await {
        Ok(()) => info!("Successfully revoked GitHub ephemeral token"),
        Err(e) => warn!("Failed to revoke GitHub token: {e}"),
    }
}
