#![allow(dead_code)]

// Shared helpers for integration tests.
//
// These helpers split `Set-Cookie` header values the same way a browser does:
// the first `name=value` pair goes back in a `Cookie` request header and the
// remaining segments are the attributes.
use std::convert::Infallible;

use axum::body::Body;
use http::{header, HeaderMap, Request, Response};
use http_body_util::BodyExt as _;
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};
use tower_signed_cookies::{CookieSession, CookieSessionConfig, CookieSessionLayer};

pub async fn body_string(body: Body) -> String {
    // Collect an Axum body into a UTF-8 string for assertions.
    let bytes = body
        .collect()
        .await
        .expect("body collects successfully")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn session_from(req: &Request<Body>) -> CookieSession {
    req.extensions()
        .get::<CookieSession>()
        .cloned()
        .expect("request includes CookieSession extension")
}

pub async fn set_handler(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    // Basic handler used by many tests: stage a single cookie write.
    let session = session_from(&req);
    session.set("token", "abc").expect("cookie set succeeds");
    Ok(Response::new(Body::empty()))
}

pub async fn noop_handler(_: Request<Body>) -> Result<Response<Body>, Infallible> {
    // Handler that does not touch the cookie session at all.
    Ok(Response::new(Body::empty()))
}

pub fn make_layer() -> CookieSessionLayer {
    CookieSessionLayer::new(CookieSessionConfig::new("s3cret"))
}

pub fn make_layer_with(config: CookieSessionConfig) -> CookieSessionLayer {
    CookieSessionLayer::new(config)
}

pub fn set_cookie_header(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .expect("response includes set-cookie header")
        .to_str()
        .expect("set-cookie header is valid utf-8")
        .to_owned()
}

pub fn set_cookie_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            value
                .to_str()
                .expect("set-cookie header is valid utf-8")
                .to_owned()
        })
        .collect()
}

/// First `name=token` pair of a `Set-Cookie` value, usable in a `Cookie`
/// request header.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("set-cookie has a name=value pair")
        .trim()
        .to_owned()
}

/// Attribute segments after the `name=token` pair, trimmed.
pub fn attributes(set_cookie: &str) -> Vec<String> {
    set_cookie
        .split(';')
        .skip(1)
        .map(|segment| segment.trim().to_owned())
        .collect()
}

/// Parse an `expires=Day, DD-Mon-YYYY HH:MM:SS GMT` attribute back into a
/// timestamp.
pub fn parse_expires(attribute: &str) -> OffsetDateTime {
    let value = attribute
        .strip_prefix("expires=")
        .expect("attribute is an expires attribute");
    let format = format_description!(
        "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
    );
    PrimitiveDateTime::parse(value, &format)
        .expect("expires timestamp parses")
        .assume_utc()
}

/// The `expires` attribute of a `Set-Cookie` value, if present.
pub fn expires_of(set_cookie: &str) -> Option<OffsetDateTime> {
    attributes(set_cookie)
        .iter()
        .find(|attribute| attribute.starts_with("expires="))
        .map(|attribute| parse_expires(attribute))
}
