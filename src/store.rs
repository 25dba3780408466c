use std::collections::HashMap;

use crate::signer::Verify;

/// Outcome of verifying one inbound cookie, memoized per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verification {
    /// The name was never present in the request.
    Unset,
    /// The name was present but its token failed verification.
    Invalid,
    /// The token verified; holds the recovered plaintext value.
    Valid(String),
}

/// Lazily-verified view over the raw inbound cookie map.
///
/// Verification runs at most once per distinct name, on first access. Names
/// absent from the inbound map resolve to [`Verification::Unset`] without
/// touching the signer at all. Invalid tokens fold into the same "no value"
/// read as absent ones, so callers cannot tell tampered from unset.
#[derive(Debug)]
pub(crate) struct LazyStore {
    raw: HashMap<String, String>,
    prefix: Option<String>,
    resolved: HashMap<String, Verification>,
}

impl LazyStore {
    pub(crate) fn new(raw: HashMap<String, String>, prefix: Option<String>) -> Self {
        Self {
            raw,
            prefix,
            resolved: HashMap::new(),
        }
    }

    fn prefixed(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_owned(),
        }
    }

    fn resolve(&mut self, name: &str, signer: &dyn Verify) -> &Verification {
        let key = self.prefixed(name);
        if !self.resolved.contains_key(&key) {
            let state = match self.raw.get(&key) {
                None => Verification::Unset,
                Some(token) => match signer.verify_token(token) {
                    Ok(value) => Verification::Valid(value),
                    Err(_) => {
                        tracing::warn!(name = %key, "inbound cookie failed signature verification");
                        Verification::Invalid
                    }
                },
            };
            self.resolved.insert(key.clone(), state);
        }
        &self.resolved[&key]
    }

    pub(crate) fn has(&mut self, name: &str, signer: &dyn Verify) -> bool {
        matches!(self.resolve(name, signer), Verification::Valid(_))
    }

    pub(crate) fn get(&mut self, name: &str, signer: &dyn Verify) -> Option<String> {
        match self.resolve(name, signer) {
            Verification::Valid(value) => Some(value.clone()),
            Verification::Unset | Verification::Invalid => None,
        }
    }
}
