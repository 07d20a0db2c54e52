use clap::Parser;
use ghtoken::actions::{output, OutputSink, StateChannel};
use ghtoken::cli::{Cli, Commands};
use ghtoken::flow::{self, AcquireRequest};
use ghtoken::github::GithubClient;
use ghtoken::identity::ActionsIdentityProvider;
use ghtoken::logging;
use ghtoken::SecretString;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Acquire(opts) => {
            info!("Acquiring ephemeral GitHub token");
            let github = GithubClient::from_env();
            let state = StateChannel::from_env();
            let outputs = OutputSink::from_env();

            let result = match ActionsIdentityProvider::from_env() {
                Ok(identity) => {
                    flow::acquire(
                        &opts.vault_instance,
                        AcquireRequest {
                            vault_role: opts.vault_role.as_deref(),
                            workflow_ref: opts.workflow_ref.as_deref(),
                        },
                        &identity,
                        &github,
                        &state,
                        &outputs,
                    )
                    .await
                }
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                error!("acquire failed at stage '{}': {e}", e.stage());
                output::issue_error(&e.to_string());
                std::process::exit(1);
            }
        }
        Commands::Revoke(opts) => {
            info!("Releasing ephemeral GitHub token");
            let github = GithubClient::from_env();
            let state = StateChannel::from_env();
            // Never fails the job: teardown must not mask its outcome.
            flow::release(
                opts.skip_revoke,
                opts.token.map(SecretString::new),
                &state,
                &github,
            )
            .await;
        }
        Commands::Version => {
            println!("ghtoken {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
