//! Action outputs and workflow commands.
//!
//! Outputs go through the `GITHUB_OUTPUT` file with the same heredoc framing
//! as saved state. Masking and failure reporting are stdout workflow
//! commands the runner intercepts (`::add-mask::`, `::error::`); masking is
//! the reason this crate logs through stderr — the command channel must stay
//! clean.

use crate::secret::SecretString;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;

pub struct OutputSink {
    output_file: Option<PathBuf>,
}

impl OutputSink {
    pub fn from_env() -> Self {
        Self {
            output_file: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            output_file: Some(path.into()),
        }
    }

    /// Register the value with the runner's log masker. Must happen before
    /// the value can appear anywhere else.
    pub fn mask(&self, value: &SecretString) {
        println!("::add-mask::{}", escape_command_data(value.reveal()));
    }

    /// Publish an output for later workflow steps.
    pub fn set_output(&self, key: &str, value: &SecretString) -> Result<()> {
        let Some(path) = &self.output_file else {
            bail!("GITHUB_OUTPUT is not set; cannot publish action outputs");
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        if value.reveal().contains(&delimiter) {
            bail!("output value collides with generated delimiter");
        }
        let record = format!("{key}<<{delimiter}\n{}\n{delimiter}\n", value.reveal());

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open output file '{}'", path.display()))?;
        file.write_all(record.as_bytes())
            .with_context(|| format!("cannot write output file '{}'", path.display()))?;
        Ok(())
    }
}

/// Report a terminal failure to the runner annotations.
pub fn issue_error(message: &str) {
    println!("::error::{}", escape_command_data(message));
}

/// Escape the data portion of a workflow command. A command ends at the
/// first newline, so unescaped `\n`/`\r` would split the data across lines —
/// for `::add-mask::` that means the tail of a multi-line secret reaches
/// stdout unmasked. `%` is escaped first so the runner can decode the rest.
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
