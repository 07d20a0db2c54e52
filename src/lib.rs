//! Ephemeral GitHub token lifecycle for CI jobs.
//!
//! A job's main step (`acquire`) trades its OIDC workload identity for a
//! Vault session, reads a narrowly-scoped GitHub token from Vault, verifies
//! it against the GitHub API, and publishes it as a masked action output.
//! The post step (`revoke`) — a separate process — reads the token back out
//! of the runner's saved state and invalidates it, best-effort, even when
//! the job itself failed.

pub mod actions;
pub mod cli;
pub mod error;
pub mod flow;
pub mod github;
pub mod identity;
pub mod logging;
pub mod secret;
pub mod vault;

pub use error::FlowError;
pub use secret::SecretString;
