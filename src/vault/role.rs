//! Vault role derivation.
//!
//! When the workflow does not name a role explicitly, one is derived from
//! `GITHUB_WORKFLOW_REF` so that each workflow file maps to a stable,
//! distinct token policy. The git ref after `@` is stripped first: the same
//! workflow must resolve to the same role whether it runs from `main`, a
//! tag, or a PR branch.

use crate::error::FlowError;
use sha2::{Digest, Sha256};
use tracing::info;

/// Hash prefix length for derived role names; short enough to read, long
/// enough that collisions across an org's workflows are negligible.
const ROLE_HASH_LENGTH: usize = 12;

/// Resolve the Vault role: an explicit role wins verbatim, otherwise derive
/// one from the workflow ref.
pub fn resolve(explicit: Option<&str>, workflow_ref: Option<&str>) -> Result<String, FlowError> {
    if let Some(role) = explicit {
        if !role.is_empty() {
            return Ok(role.to_string());
        }
    }

    let workflow_ref = workflow_ref.filter(|r| !r.is_empty()).ok_or_else(|| {
        FlowError::Configuration("GITHUB_WORKFLOW_REF environment variable is not set".into())
    })?;

    let base = workflow_ref
        .split('@')
        .next()
        .unwrap_or(workflow_ref);
    let digest = Sha256::digest(base.as_bytes());
    let prefix = &hex::encode(digest)[..ROLE_HASH_LENGTH];
    let role = format!("token-policy-{prefix}");

    info!("Generated role name: {role}");
    Ok(role)
}
