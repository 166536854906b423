//! In-memory credential handling.
//!
//! The API key lives in process memory for the lifetime of the run and is
//! never written to disk. It arrives either through `OPENAI_API_KEY` or
//! through the masked entry field shown at startup.

use std::env;
use std::fmt;

pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// A user-supplied API key. The wrapper exists so the secret cannot leak
/// through `Debug` formatting and so empty input is rejected at the edge.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, rejecting empty or whitespace-only input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Read the key from the environment, if present.
    pub fn from_env() -> Option<Self> {
        env::var(API_KEY_ENV_VAR).ok().and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}
