//! Vault integration: instance selection, role derivation, and the two-step
//! OIDC-login / secret-fetch exchange.

pub mod client;
pub mod role;

pub use client::{VaultClient, VaultSession};

use crate::error::FlowError;
use tracing::info;

/// The closed set of Vault deployments this tool may talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultInstance {
    CiDev,
    CiProd,
}

impl VaultInstance {
    /// Map an action input to an instance. Anything outside the closed set
    /// is a configuration error, caught before any network call.
    pub fn parse(value: &str) -> Result<Self, FlowError> {
        match value {
            "ci-dev" => {
                info!("Vault address set to CI-DEV");
                Ok(VaultInstance::CiDev)
            }
            "ci-prod" => {
                info!("Vault address set to CI-PROD");
                Ok(VaultInstance::CiProd)
            }
            other => Err(FlowError::Configuration(format!(
                "invalid vault instance: '{other}'. Must be 'ci-dev' or 'ci-prod'"
            ))),
        }
    }

    pub fn address(&self) -> &'static str {
        match self {
            VaultInstance::CiDev => "https://vault-ci.dev.elastic.dev",
            VaultInstance::CiProd => "https://vault-ci-prod.elastic.dev",
        }
    }
}
