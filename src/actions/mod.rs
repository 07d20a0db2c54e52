//! GitHub Actions host integration.
//!
//! The runner's plumbing the lifecycle depends on: the cross-invocation
//! state channel between the main and post steps, and the output/masking
//! surface for handing the token to later workflow steps.

pub mod output;
pub mod state;

pub use output::OutputSink;
pub use state::{StateChannel, TOKEN_STATE_KEY};
