use time::OffsetDateTime;

use crate::format;
use crate::signer::Signer;

/// One staged cookie write: the value plus every attribute emitted at flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive {
    pub(crate) name: String,
    pub(crate) value: String,
    /// `None` means session-only (no `expires` attribute).
    pub(crate) expires: Option<OffsetDateTime>,
    pub(crate) path: String,
    pub(crate) domain: Option<String>,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
}

/// Pending writes keyed by name, flushed once at the end of the request.
///
/// Staging the same name again replaces the directive in place: the newest
/// value and attributes win, but the entry keeps its first-staged position.
#[derive(Debug, Default)]
pub(crate) struct OutboundQueue {
    staged: Vec<Directive>,
}

impl OutboundQueue {
    pub(crate) fn stage(&mut self, directive: Directive) {
        match self.staged.iter_mut().find(|d| d.name == directive.name) {
            Some(existing) => *existing = directive,
            None => self.staged.push(directive),
        }
    }

    /// Drain every staged directive into `Set-Cookie` header values.
    ///
    /// The queue is empty afterwards, so a second flush yields nothing.
    pub(crate) fn flush(&mut self, signer: &Signer) -> Vec<String> {
        self.staged
            .drain(..)
            .map(|directive| format::build_header_value(signer, &directive))
            .collect()
    }
}
