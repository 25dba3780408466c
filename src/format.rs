//! Wire-format helpers: percent escaping, `Cookie` header parsing and the
//! `Set-Cookie` header value layout.
//!
//! Percent-encoding of the cookie name and the signed token is the wire
//! contract; the inbound path decodes symmetrically before anything reaches
//! the store.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use time::{macros::format_description, OffsetDateTime, UtcOffset};

use crate::queue::Directive;
use crate::signer::Signer;

/// Everything outside the RFC 3986 unreserved set gets escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

pub(crate) fn decode_component(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Split a `Cookie` request header into decoded name/value pairs.
///
/// Malformed pairs (no `=`, invalid percent escapes) are skipped rather than
/// failing the whole header.
pub(crate) fn parse_cookie_header(header: &str) -> impl Iterator<Item = (String, String)> + '_ {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        Some((decode_component(name)?, decode_component(value)?))
    })
}

/// Cookie `expires` timestamp: `Day, DD-Mon-YYYY HH:MM:SS GMT`.
pub(crate) fn format_expires(instant: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
    );
    instant
        .to_offset(UtcOffset::UTC)
        .format(&format)
        .expect("expires format only uses date-time components")
}

/// Serialize one directive into a `Set-Cookie` header value, signing the
/// cookie value on the way out.
pub(crate) fn build_header_value(signer: &Signer, directive: &Directive) -> String {
    let token = signer.sign(&directive.value);
    let mut line = format!(
        "{}={}",
        encode_component(&directive.name),
        encode_component(&token)
    );
    if let Some(expires) = directive.expires {
        line.push_str("; expires=");
        line.push_str(&format_expires(expires));
    }
    if !directive.path.is_empty() {
        line.push_str("; path=");
        line.push_str(&directive.path);
    }
    if let Some(domain) = &directive.domain {
        line.push_str("; domain=");
        line.push_str(domain);
    }
    if directive.secure {
        line.push_str("; secure");
    }
    if directive.http_only {
        line.push_str("; httponly");
    }
    line
}
