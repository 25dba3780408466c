use sha1::{Digest as _, Sha1};

use crate::error::InvalidSignature;

/// Verification seam between the store and the signer.
///
/// The store only ever needs to check tokens, so it takes this narrow trait
/// instead of the whole [`Signer`]; tests substitute a counting verifier to
/// observe how often verification actually runs.
pub(crate) trait Verify {
    fn verify_token(&self, token: &str) -> Result<String, InvalidSignature>;
}

/// Integrity stamp for cookie values.
///
/// Wire token: `hex(sha1(salt || value)) + "-" + value`. This is tamper
/// evidence, not confidentiality: the value travels in the clear and only the
/// digest binds it to the salt.
#[derive(Debug, Clone)]
pub struct Signer {
    salt: String,
}

impl Signer {
    /// Create a signer over `salt`. An empty salt is accepted here;
    /// [`CookieSession`](crate::CookieSession) construction is where a
    /// missing salt is rejected.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    fn digest(&self, value: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(value.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Produce the signed wire token for `value`.
    pub fn sign(&self, value: &str) -> String {
        format!("{}-{}", self.digest(value), value)
    }

    /// Recover the value from a wire token, checking the digest.
    ///
    /// Splits on the first `-`, so values may themselves contain `-`.
    pub fn verify(&self, token: &str) -> Result<String, InvalidSignature> {
        let (hash, value) = token.split_once('-').ok_or(InvalidSignature)?;
        if self.digest(value) != hash {
            return Err(InvalidSignature);
        }
        Ok(value.to_owned())
    }
}

impl Verify for Signer {
    fn verify_token(&self, token: &str) -> Result<String, InvalidSignature> {
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let signer = Signer::new("salt");
        let token = signer.sign("value");
        assert_eq!(signer.verify(&token).expect("token verifies"), "value");
    }

    #[test]
    fn known_digest() {
        let signer = Signer::new("s3cret");
        assert_eq!(
            signer.sign("abc"),
            "51314c11a048e18aceda210ee2689e1eec0c3daf-abc"
        );
    }

    #[test]
    fn value_may_contain_separator() {
        let signer = Signer::new("salt");
        let token = signer.sign("a-b-c");
        assert_eq!(signer.verify(&token).expect("token verifies"), "a-b-c");
    }

    #[test]
    fn empty_value_round_trips() {
        let signer = Signer::new("salt");
        let token = signer.sign("");
        assert_eq!(signer.verify(&token).expect("token verifies"), "");
    }

    #[test]
    fn tampered_value_rejected() {
        let signer = Signer::new("salt");
        let token = signer.sign("value");
        let tampered = token.replace("value", "Value");
        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn tampered_hash_rejected() {
        let signer = Signer::new("salt");
        let mut token = signer.sign("value");
        let replacement = if token.starts_with('0') { "1" } else { "0" };
        token.replace_range(0..1, replacement);
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn missing_separator_rejected() {
        let signer = Signer::new("salt");
        assert!(signer.verify("deadbeef").is_err());
    }

    #[test]
    fn foreign_salt_rejected() {
        let token = Signer::new("salt_a").sign("value");
        assert!(Signer::new("salt_b").verify(&token).is_err());
    }
}
