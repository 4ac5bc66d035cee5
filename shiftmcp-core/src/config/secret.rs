//! Credential handles.
//!
//! Configuration never stores secret values. It stores a reference: either
//! the name of an environment variable (`GEMINI_API_KEY`) or an expression
//! such as `${OPENSHIFT_TOKEN}`. The reference is resolved when a client is
//! built and the resolved value lives only inside a [`Credential`].

use std::env;
use std::fmt;
use tracing::warn;

/// A resolved secret. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Resolve a credential reference for `owner` (used only in log fields).
pub fn resolve_secret(owner: &str, reference: Option<&str>) -> Option<Credential> {
    let raw = reference.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }

    let resolved = if raw.contains('$') {
        match shellexpand::env(raw) {
            Ok(value) => Some(value.into_owned()),
            Err(err) => {
                warn!(
                    owner,
                    env_var = err.var_name.as_str(),
                    "Credential expression references an unset variable"
                );
                None
            }
        }
    } else {
        match env::var(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    owner,
                    env_var = raw,
                    %err,
                    "Credential environment variable is not set"
                );
                None
            }
        }
    };

    resolved
        .filter(|value| !value.trim().is_empty())
        .map(Credential)
}
