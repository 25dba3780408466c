use thiserror::Error;

/// Errors surfaced by the public cookie session API.
#[derive(Debug, Error)]
pub enum Error {
    /// The signing salt was absent or empty at construction time.
    #[error("cookie signing salt must be a non-empty string")]
    MissingSalt,

    /// A cookie name contained characters outside `[A-Za-z0-9_]`.
    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),
}

/// A token failed integrity verification.
///
/// Never escapes the store: a cookie with a bad signature reads exactly like
/// one that was never set.
#[derive(Debug, Error)]
#[error("cookie token failed signature verification")]
pub struct InvalidSignature;
