use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ghtoken", version, about = "Ephemeral GitHub token lifecycle for CI jobs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Main step: exchange workflow identity for an ephemeral GitHub token.
    Acquire(AcquireOpts),
    /// Post step: revoke the token saved by the acquire step.
    Revoke(RevokeOpts),
    Version,
}

#[derive(clap::Args)]
pub struct AcquireOpts {
    /// Vault deployment to talk to: 'ci-dev' or 'ci-prod'.
    #[arg(long, env = "INPUT_VAULT_INSTANCE")]
    pub vault_instance: String,

    /// Explicit Vault role; derived from the workflow ref when omitted.
    #[arg(long, env = "INPUT_VAULT_ROLE")]
    pub vault_role: Option<String>,

    /// Workflow reference used for role derivation; set by the runner.
    #[arg(long, env = "GITHUB_WORKFLOW_REF", hide = true)]
    pub workflow_ref: Option<String>,
}

#[derive(clap::Args)]
pub struct RevokeOpts {
    /// Leave the token alive (for debugging a job's teardown).
    #[arg(long, env = "INPUT_SKIP_REVOKE")]
    pub skip_revoke: bool,

    /// Explicit token to revoke; normally read from saved state instead.
    #[arg(long, env = "INPUT_EPHEMERAL_TOKEN", hide = true)]
    pub token: Option<String>,
}
