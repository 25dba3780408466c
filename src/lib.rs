//! Signed, lazily-verified cookies for `tower` services, with deferred
//! write-back.
//!
//! Each request gets a [`CookieSession`]: reads are verified against the
//! signing salt on first access (unused cookies cost nothing), writes are
//! staged and only serialized into `Set-Cookie` headers once, after the
//! handler has returned. The wire token is `hex(sha1(salt || value))-value`.
//!
//! # Security
//! Signing is tamper evidence, not confidentiality: values travel in the
//! clear. A cookie that fails verification reads exactly like one that was
//! never set, so handlers cannot become an oracle for forged tokens.

mod config;
mod error;
mod format;
pub mod layer;
mod queue;
mod session;
mod signer;
mod store;

pub use crate::config::{CookieAttributes, CookieSessionConfig, Expiry};
pub use crate::error::{Error, InvalidSignature};
pub use crate::layer::CookieSessionLayer;
pub use crate::session::CookieSession;
pub use crate::signer::Signer;
