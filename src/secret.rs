//! Redacting wrapper for secret values.
//!
//! Anything that must never reach a log line (the Vault session token, the
//! ephemeral GitHub token) is carried as a [`SecretString`]. Its `Display`
//! and `Debug` render `[REDACTED]`, so a stray `info!("{token}")` cannot
//! leak the value; call sites that genuinely need the cleartext (auth
//! headers, the state file, the masked output) must go through
//! [`SecretString::reveal`].

use std::fmt;

/// A secret value whose textual representations are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the cleartext. Keep the result out of format strings.
    pub fn reveal(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_redacted() {
        let secret = SecretString::new("ghs_very_secret_value");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn debug_is_redacted() {
        let secret = SecretString::new("ghs_very_secret_value");
        let dump = format!("{secret:?}");
        assert!(!dump.contains("ghs_very_secret_value"));
        assert!(dump.contains("REDACTED"));
    }

    #[test]
    fn reveal_returns_cleartext() {
        let secret = SecretString::new("hvs.abc123");
        assert_eq!(secret.reveal(), "hvs.abc123");
    }

    #[test]
    fn empty_check() {
        assert!(SecretString::new("").is_empty());
        assert!(!SecretString::new("x").is_empty());
    }
}
