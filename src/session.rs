use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;

use crate::config::{CookieAttributes, CookieSessionConfig, Expiry};
use crate::error::Error;
use crate::queue::{Directive, OutboundQueue};
use crate::signer::Signer;
use crate::store::LazyStore;

/// The value staged when a cookie is removed; clients only ever see deletion
/// as a replacement cookie that has already expired.
const REMOVED_VALUE: &str = "removed";

/// Per-request cookie facade: verified reads, staged writes, one flush.
///
/// Reads verify lazily, on first access per name, and absorb bad signatures
/// into "no value". Writes stage directives that are only signed and
/// serialized when the transport layer calls [`flush`](Self::flush) after the
/// handler returns.
///
/// Cloning is cheap and every clone shares the same request-scoped state, so
/// the handle travels through request extensions.
#[derive(Debug, Clone)]
pub struct CookieSession {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    signer: Signer,
    prefix: Option<String>,
    server_name: String,
    host_header: Option<String>,
    store: Mutex<LazyStore>,
    queue: Mutex<OutboundQueue>,
}

impl CookieSession {
    /// Bind a session to one request's inbound cookies.
    ///
    /// `host_header` is the request's `Host` value, consulted only for domain
    /// defaulting. Fails with [`Error::MissingSalt`] if the configured salt
    /// is empty.
    pub fn new(
        config: &CookieSessionConfig,
        raw_inbound: HashMap<String, String>,
        host_header: Option<String>,
    ) -> Result<Self, Error> {
        if config.salt.is_empty() {
            return Err(Error::MissingSalt);
        }
        let prefix = config.prefix.as_ref().map(|prefix| prefix.to_string());
        Ok(Self {
            inner: Arc::new(Inner {
                signer: Signer::new(config.salt.to_string()),
                prefix: prefix.clone(),
                server_name: config.server_name.to_string(),
                host_header,
                store: Mutex::new(LazyStore::new(raw_inbound, prefix)),
                queue: Mutex::new(OutboundQueue::default()),
            }),
        })
    }

    /// True only when every given name carries a validly signed value.
    ///
    /// An empty name list returns `false`: asserting "all of nothing" almost
    /// always indicates a caller bug, so it does not vacuously succeed.
    pub fn is_set<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut store = lock(&self.inner.store);
        let mut any = false;
        for name in names {
            any = true;
            if !store.has(name, &self.inner.signer) {
                return false;
            }
        }
        any
    }

    /// Read a cookie's verified value.
    ///
    /// Absent, unsigned and tampered cookies all read as `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        lock(&self.inner.store).get(name, &self.inner.signer)
    }

    /// Stage a cookie write with default attributes (one-day expiry, path
    /// `/`).
    pub fn set(&self, name: &str, value: impl Into<String>) -> Result<(), Error> {
        self.set_with(name, value, CookieAttributes::default())
    }

    /// Stage a cookie write. Nothing is signed or emitted until
    /// [`flush`](Self::flush).
    ///
    /// Staging the same name again replaces the earlier directive. Fails with
    /// [`Error::InvalidName`] unless the name matches `[A-Za-z0-9_]+`.
    pub fn set_with(
        &self,
        name: &str,
        value: impl Into<String>,
        attributes: CookieAttributes,
    ) -> Result<(), Error> {
        if !valid_name(name) {
            return Err(Error::InvalidName(name.to_owned()));
        }
        let directive = Directive {
            name: self.prefixed(name),
            value: value.into(),
            expires: attributes.expiry.resolve(OffsetDateTime::now_utc()),
            path: attributes.path.into_owned(),
            domain: self.resolve_domain(attributes.domain),
            secure: attributes.secure,
            http_only: attributes.http_only,
        };
        lock(&self.inner.queue).stage(directive);
        Ok(())
    }

    /// Stage removal of a cookie by replacing it with one that has already
    /// expired.
    pub fn remove(&self, name: &str) -> Result<(), Error> {
        self.remove_with(name, CookieAttributes::default().with_expiry(Expiry::REMOVE))
    }

    /// Stage removal with explicit attributes; the expiry should normally
    /// stay in the past.
    pub fn remove_with(&self, name: &str, attributes: CookieAttributes) -> Result<(), Error> {
        self.set_with(name, REMOVED_VALUE, attributes)
    }

    /// Drain staged writes into `Set-Cookie` header values, signing each one.
    ///
    /// The transport layer calls this exactly once after the handler returns.
    /// Calling it again without staging in between yields an empty vec.
    pub fn flush(&self) -> Vec<String> {
        lock(&self.inner.queue).flush(&self.inner.signer)
    }

    fn prefixed(&self, name: &str) -> String {
        match &self.inner.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_owned(),
        }
    }

    /// Domain defaulting: an explicit domain wins; a `localhost` server name
    /// omits the attribute; otherwise the request's `Host` header, then the
    /// configured server name.
    fn resolve_domain(&self, explicit: Option<Cow<'static, str>>) -> Option<String> {
        if let Some(domain) = explicit {
            return Some(domain.into_owned());
        }
        if self.inner.server_name == "localhost" {
            return None;
        }
        if let Some(host) = &self.inner.host_header {
            return Some(host.clone());
        }
        Some(self.inner.server_name.clone())
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
