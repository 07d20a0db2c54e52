//! Cross-invocation state channel.
//!
//! The acquire and release phases run as two separate processes with no
//! shared memory; the only relay between them is the runner's saved state.
//! Writing appends a heredoc record to the file named by `GITHUB_STATE`;
//! the runner then exposes it to the post step as a `STATE_<key>` env var.
//! A missing key on the read side is the normal outcome when acquire failed
//! before issuing a token, so `read` returns an `Option`, never an error.

use crate::secret::SecretString;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// State slot carrying the token from the acquire to the release phase.
pub const TOKEN_STATE_KEY: &str = "github-ephemeral-token";

pub struct StateChannel {
    state_file: Option<PathBuf>,
}

impl StateChannel {
    /// Wire to the runner-provided `GITHUB_STATE` file, if present.
    pub fn from_env() -> Self {
        Self {
            state_file: std::env::var_os("GITHUB_STATE").map(PathBuf::from),
        }
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            state_file: Some(path.into()),
        }
    }

    /// Persist a value for the release phase. Called exactly once, and only
    /// after the token has been fetched and verified.
    pub fn write(&self, key: &str, value: &SecretString) -> Result<()> {
        let Some(path) = &self.state_file else {
            bail!("GITHUB_STATE is not set; cannot persist state for the post step");
        };

        let record = heredoc_record(key, value.reveal())?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open state file '{}'", path.display()))?;
        file.write_all(record.as_bytes())
            .with_context(|| format!("cannot write state file '{}'", path.display()))?;
        Ok(())
    }

    /// Read a value saved by the acquire phase. Absence means acquire never
    /// published a token; callers treat it as a silent no-op.
    pub fn read(&self, key: &str) -> Option<SecretString> {
        let var = format!("STATE_{key}");
        std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(SecretString::new)
    }
}

/// Format one `key<<delimiter` record the way the runner parses them. The
/// delimiter is random so a value containing a literal delimiter line cannot
/// smuggle extra records in.
fn heredoc_record(key: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if key.contains(&delimiter) || value.contains(&delimiter) {
        bail!("state value collides with generated delimiter");
    }
    Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"))
}
