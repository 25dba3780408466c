//! `tower` middleware that binds a [`CookieSession`] to each request and
//! writes the staged cookies into the response.
//!
//! The service owns the request lifecycle boundary: it parses the inbound
//! `Cookie` header(s) into the raw map, inserts the session into request
//! extensions, and flushes exactly once after the inner service resolves,
//! appending one `Set-Cookie` header per staged directive. If the request is
//! dropped before the inner service resolves, nothing is flushed and no
//! headers leak.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use http::{header, HeaderValue, Request, Response};
use tower_layer::Layer;
use tower_service::Service;

use crate::{config::CookieSessionConfig, format, session::CookieSession};

/// Layer that equips each request with a [`CookieSession`].
#[derive(Debug, Clone)]
pub struct CookieSessionLayer {
    config: CookieSessionConfig,
}

impl CookieSessionLayer {
    #[must_use]
    pub fn new(config: CookieSessionConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for CookieSessionLayer {
    type Service = CookieSessionManager<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieSessionManager {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Middleware produced by [`CookieSessionLayer`].
#[derive(Debug, Clone)]
pub struct CookieSessionManager<S> {
    inner: S,
    config: CookieSessionConfig,
}

impl<ReqBody, ResBody, S> Service<Request<ReqBody>> for CookieSessionManager<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let config = self.config.clone();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let raw_inbound = parse_inbound(req.headers());
            let host_header = req
                .headers()
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let session = match CookieSession::new(&config, raw_inbound, host_header) {
                Ok(session) => session,
                Err(err) => {
                    tracing::error!(err = %err, "cookie session construction failed");
                    let mut res = Response::default();
                    *res.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                    return Ok(res);
                }
            };
            req.extensions_mut().insert(session.clone());

            let mut res = inner.call(req).await?;

            for line in session.flush() {
                match HeaderValue::from_str(&line) {
                    Ok(value) => {
                        res.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(err) => {
                        tracing::error!(err = %err, "staged cookie produced an invalid header value");
                    }
                }
            }

            Ok(res)
        })
    }
}

/// Merge every `Cookie` request header into one raw name/value map.
///
/// The first occurrence of a name wins.
fn parse_inbound(headers: &http::HeaderMap) -> HashMap<String, String> {
    let mut raw = HashMap::new();
    for header_value in headers.get_all(header::COOKIE) {
        let Ok(header_str) = header_value.to_str() else {
            continue;
        };
        for (name, value) in format::parse_cookie_header(header_str) {
            raw.entry(name).or_insert(value);
        }
    }
    raw
}
