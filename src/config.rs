use std::borrow::Cow;

use time::{Duration, OffsetDateTime};

/// Cookie lifetime policy, resolved to an absolute instant when staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// No `expires` attribute: the cookie lives until the browser session ends.
    Session,
    /// Relative offset from the moment the cookie is staged. Negative offsets
    /// land in the past, which is how removal is communicated to the client.
    After(Duration),
    /// Absolute instant.
    At(OffsetDateTime),
}

impl Expiry {
    /// One hour in the past; expires the cookie immediately.
    pub const REMOVE: Self = Self::After(Duration::seconds(-3600));
    pub const SESSION_ONLY: Self = Self::Session;
    pub const ONE_HOUR: Self = Self::After(Duration::seconds(3600));
    pub const SIX_HOURS: Self = Self::After(Duration::seconds(21_600));
    pub const ONE_DAY: Self = Self::After(Duration::seconds(86_400));
    pub const ONE_MONTH: Self = Self::After(Duration::seconds(2_592_000));
    pub const SIX_MONTHS: Self = Self::After(Duration::seconds(15_552_000));
    pub const ONE_YEAR: Self = Self::After(Duration::seconds(31_104_000));

    /// Resolve to the absolute `expires` timestamp, or `None` for
    /// session-only cookies.
    pub(crate) fn resolve(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            Self::Session => None,
            Self::After(offset) => Some(now + offset),
            Self::At(instant) => Some(instant),
        }
    }
}

/// Resolved configuration for a request's cookie session.
///
/// The salt is required and must be non-empty; an empty salt fails session
/// construction with [`Error::MissingSalt`](crate::Error::MissingSalt).
#[derive(Debug, Clone)]
pub struct CookieSessionConfig {
    pub(crate) salt: Cow<'static, str>,
    pub(crate) prefix: Option<Cow<'static, str>>,
    pub(crate) server_name: Cow<'static, str>,
}

impl CookieSessionConfig {
    pub fn new<S: Into<Cow<'static, str>>>(salt: S) -> Self {
        Self {
            salt: salt.into(),
            prefix: None,
            server_name: "localhost".into(),
        }
    }

    /// Prepend `prefix` to every cookie name, on both the read and write
    /// paths.
    #[must_use]
    pub fn with_prefix<P: Into<Cow<'static, str>>>(mut self, prefix: P) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Server name consulted for domain defaulting. `localhost` (the default)
    /// omits the `domain` attribute entirely.
    #[must_use]
    pub fn with_server_name<N: Into<Cow<'static, str>>>(mut self, server_name: N) -> Self {
        self.server_name = server_name.into();
        self
    }
}

/// Per-cookie attributes for [`CookieSession::set_with`] and
/// [`CookieSession::remove_with`].
///
/// Defaults: one-day expiry, path `/`, no explicit domain, `secure` and
/// `httponly` off.
///
/// [`CookieSession::set_with`]: crate::CookieSession::set_with
/// [`CookieSession::remove_with`]: crate::CookieSession::remove_with
#[derive(Debug, Clone)]
pub struct CookieAttributes {
    pub(crate) expiry: Expiry,
    pub(crate) path: Cow<'static, str>,
    pub(crate) domain: Option<Cow<'static, str>>,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            expiry: Expiry::ONE_DAY,
            path: "/".into(),
            domain: None,
            secure: false,
            http_only: false,
        }
    }
}

impl CookieAttributes {
    #[must_use]
    pub fn with_expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// An empty path omits the `path` attribute at flush time.
    #[must_use]
    pub fn with_path<P: Into<Cow<'static, str>>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// An explicit domain bypasses domain defaulting entirely.
    #[must_use]
    pub fn with_domain<D: Into<Cow<'static, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
}
