//! Per-request language resolution.
//!
//! Pure computation over one request's signals, strict precedence, first
//! match wins:
//!
//! 1. the URL query parameter (when configured), even with an empty value —
//!    an explicit override always beats the stored preference;
//! 2. the `lang` cookie;
//! 3. nothing — `requested` stays empty and the catalog decides from the
//!    `Accept-Language` header and the configured default.
//!
//! The header is captured raw, unparsed. Tag-list parsing belongs to the
//! catalog, which receives all three inputs in order.

use crate::request::Request;

/// Name of the cookie that remembers the last explicit language choice.
pub(crate) const LANG_COOKIE: &str = "lang";

/// The language signals extracted from one request. Freshly computed per
/// request, never shared.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Preference {
    /// The tag the client asked for. Possibly empty.
    pub requested: String,
    /// Raw `Accept-Language` value, pass-through. Possibly empty.
    pub header_fallback: String,
    /// Whether `requested` came from the cookie. Gates the cookie
    /// write-back: a preference that is already stored is never rewritten.
    pub from_cookie: bool,
}

pub(crate) fn resolve(req: &Request, url_param: &str) -> Preference {
    let header_fallback = req.header("accept-language").unwrap_or_default().to_owned();

    if !url_param.is_empty() {
        if let Some(value) = req.query_param(url_param) {
            return Preference { requested: value, header_fallback, from_cookie: false };
        }
    }

    match req.cookie(LANG_COOKIE) {
        Some(value) => Preference { requested: value, header_fallback, from_cookie: true },
        None => Preference { requested: String::new(), header_fallback, from_cookie: false },
    }
}
