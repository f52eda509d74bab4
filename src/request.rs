//! Incoming HTTP request type.

use bytes::Bytes;
use http::Extensions;

/// An incoming HTTP request with its body already collected.
///
/// Wraps an [`http::Request`] and adds the lookups middleware needs: query
/// parameters, cookies, and the per-request extension map used to hand
/// resolved values to the next handler in the chain.
pub struct Request {
    inner: http::Request<Bytes>,
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self { inner }
    }
}

impl Request {
    pub fn method(&self) -> &http::Method {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn body(&self) -> &[u8] {
        self.inner.body()
    }

    /// Case-insensitive header lookup. Returns the first value, or `None`
    /// when the header is absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the percent-decoded value of a query parameter.
    ///
    /// Presence-aware: `?lang=` and bare `?lang` both yield `Some("")`,
    /// distinct from an absent parameter. An explicitly empty value is a
    /// real value to the language resolver, so the distinction matters.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.inner.uri().query()?;
        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };
            if percent_decode(key) == name {
                return Some(percent_decode(value));
            }
        }
        None
    }

    /// Returns the value of a request cookie, scanning every `Cookie` header.
    ///
    /// An unreadable header is skipped, not an error: a request without a
    /// usable cookie simply has no stored preference.
    pub fn cookie(&self, name: &str) -> Option<String> {
        for header in self.inner.headers().get_all(http::header::COOKIE) {
            let Ok(header) = header.to_str() else { continue };
            for pair in header.split(';') {
                if let Some((key, value)) = pair.trim().split_once('=') {
                    if key == name {
                        return Some(value.to_owned());
                    }
                }
            }
        }
        None
    }

    /// Request-scoped typed values, inserted by middleware for downstream
    /// handlers. Each request owns its own map — nothing here is shared
    /// across requests.
    pub fn extensions(&self) -> &Extensions {
        self.inner.extensions()
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.inner.extensions_mut()
    }
}

/// Decodes `%XX` escapes and `+` in a query component. Invalid escapes pass
/// through literally rather than failing the whole parameter.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Request::from(builder.body(Bytes::new()).expect("valid request"))
    }

    #[test]
    fn query_param_decodes_value() {
        let req = request("/?lang=pt%2DBR&x=1", &[]);
        assert_eq!(req.query_param("lang").as_deref(), Some("pt-BR"));
    }

    #[test]
    fn query_param_distinguishes_empty_from_absent() {
        let req = request("/?lang=", &[]);
        assert_eq!(req.query_param("lang").as_deref(), Some(""));
        assert_eq!(req.query_param("locale"), None);

        let req = request("/?lang", &[]);
        assert_eq!(req.query_param("lang").as_deref(), Some(""));

        let req = request("/", &[]);
        assert_eq!(req.query_param("lang"), None);
    }

    #[test]
    fn cookie_found_among_others() {
        let req = request("/", &[("cookie", "session=abc; lang=fr; theme=dark")]);
        assert_eq!(req.cookie("lang").as_deref(), Some("fr"));
        assert_eq!(req.cookie("absent"), None);
    }

    #[test]
    fn cookie_across_multiple_headers() {
        let req = request("/", &[("cookie", "a=1"), ("cookie", "lang=de")]);
        assert_eq!(req.cookie("lang").as_deref(), Some("de"));
    }
}
