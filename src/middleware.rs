//! Language-negotiation middleware.
//!
//! One pass per request, synchronous, no cross-request state:
//!
//! 1. resolve the requested language — query parameter, else cookie;
//! 2. bind a translator — requested, else `Accept-Language`, else default;
//! 3. attach the resolved values to the request for downstream handlers;
//! 4. invoke the next handler;
//! 5. write the `lang` cookie back on the response, unless the preference
//!    already came from that cookie.
//!
//! Step 5 makes the preference sticky: one `?lang=fr` visit and every later
//! request from that client resolves to `fr` without the parameter.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::catalog::Catalog;
use crate::context::I18nContext;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::resolve::{self, LANG_COOKIE};
use crate::response::Response;

/// Middleware configuration, consumed once by [`I18n::new`].
#[derive(Default)]
pub struct Config {
    /// Language used when no other signal matches the catalog. Required,
    /// non-empty, and must resolve against the loaded sources.
    pub default_language: String,
    /// Translation files to load. Tag comes from the file name.
    pub files: Vec<PathBuf>,
    /// Embedded `(tag, bytes)` translation sources.
    pub sources: Vec<(String, Vec<u8>)>,
    /// Query parameter to read an explicit language override from. Empty
    /// means the query string is never consulted.
    pub url_param: String,
    /// Log the loaded languages after startup.
    pub debug: bool,
}

/// The language-negotiation middleware.
///
/// Built once at startup; cheap to clone — all state is Arc-shared and
/// read-only, so one instance serves any number of concurrent requests.
///
/// ```rust,no_run
/// use tolk::{Config, I18n, I18nContext, Request, Response, Server};
///
/// #[tokio::main]
/// async fn main() {
///     let i18n = I18n::new(Config {
///         default_language: "en".into(),
///         files: vec!["locales/en.json".into(), "locales/fr.json".into()],
///         url_param: "lang".into(),
///         ..Config::default()
///     })
///     .expect("translation catalog must load");
///
///     Server::bind("0.0.0.0:3000")
///         .serve(i18n.wrap(greet))
///         .await
///         .expect("server error");
/// }
///
/// async fn greet(req: Request) -> Response {
///     let ctx = I18nContext::of(&req).expect("i18n middleware ran");
///     Response::text(ctx.t("greeting"))
/// }
/// ```
#[derive(Clone)]
pub struct I18n {
    inner: Arc<Inner>,
}

struct Inner {
    default_language: String,
    url_param: String,
    catalog: Catalog,
}

impl I18n {
    /// Builds the middleware, loading and parsing every translation source.
    ///
    /// Errors when the default language is empty, when no sources are
    /// supplied, when any source fails to read or parse, or when the default
    /// language matches nothing in the loaded catalog. Callers should treat
    /// any of these as fatal at startup — a middleware that cannot
    /// translate must not serve requests.
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.default_language.is_empty() {
            return Err(Error::NoDefaultLanguage);
        }
        if config.files.is_empty() && config.sources.is_empty() {
            return Err(Error::NoSources);
        }

        let mut catalog = Catalog::new();
        for path in &config.files {
            catalog.load_file(path)?;
        }
        for (tag, bytes) in &config.sources {
            catalog.parse_bytes(tag, bytes)?;
        }

        if !catalog.contains(&config.default_language) {
            return Err(Error::UnknownDefaultLanguage(config.default_language));
        }

        if config.debug {
            let mut tags: Vec<&str> = catalog.tags().collect();
            tags.sort_unstable();
            info!(languages = ?tags, "translation catalog loaded");
        }

        Ok(Self {
            inner: Arc::new(Inner {
                default_language: config.default_language,
                url_param: config.url_param,
                catalog,
            }),
        })
    }

    /// The loaded translation catalog. Read-only once built; callers may
    /// bind ad-hoc translators outside the request path, e.g. for emails
    /// or background jobs rendered in a stored preference.
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Wraps `next` so every request passes through language negotiation
    /// before reaching it. The returned handler composes like any other —
    /// wrap the innermost handler first and layer outwards.
    pub fn wrap(&self, next: impl Handler) -> impl Handler {
        let i18n = self.clone();
        let next: BoxedHandler = next.into_boxed_handler();
        move |req: Request| {
            let i18n = i18n.clone();
            let next = Arc::clone(&next);
            async move { i18n.handle(req, next).await }
        }
    }

    async fn handle(&self, mut req: Request, next: BoxedHandler) -> Response {
        let pref = resolve::resolve(&req, &self.inner.url_param);
        let persist = !pref.from_cookie;
        let requested = pref.requested.clone();

        let translator = self.inner.catalog.translator(
            &pref.requested,
            &pref.header_fallback,
            &self.inner.default_language,
        );

        req.extensions_mut().insert(I18nContext::new(
            pref.requested,
            pref.header_fallback,
            self.inner.default_language.clone(),
            translator,
        ));

        let mut resp = next.call(req).await;
        if persist {
            resp.set_cookie(LANG_COOKIE, &requested);
        }
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn middleware() -> I18n {
        I18n::new(Config {
            default_language: "en".into(),
            sources: vec![
                ("en".into(), br#"{"greeting":"Hello"}"#.to_vec()),
                ("fr".into(), br#"{"greeting":"Bonjour"}"#.to_vec()),
            ],
            url_param: "lang".into(),
            ..Config::default()
        })
        .expect("middleware builds")
    }

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Request::from(builder.body(Bytes::new()).expect("valid request"))
    }

    /// Downstream probe: echoes the four propagated values.
    async fn echo(req: Request) -> Response {
        let ctx = I18nContext::of(&req).expect("context attached");
        Response::text(format!(
            "{}|{}|{}|{}",
            ctx.requested(),
            ctx.header_fallback(),
            ctx.default_language(),
            ctx.t("greeting"),
        ))
    }

    async fn run(i18n: &I18n, req: Request) -> Response {
        i18n.wrap(echo).into_boxed_handler().call(req).await
    }

    #[tokio::test]
    async fn query_override_reaches_downstream_and_sets_cookie() {
        let resp = run(&middleware(), request("/?lang=fr", &[("cookie", "lang=de")])).await;
        assert_eq!(resp.body(), b"fr||en|Bonjour".as_slice());
        assert_eq!(resp.header("set-cookie"), Some("lang=fr; HttpOnly"));
    }

    #[tokio::test]
    async fn cookie_preference_is_not_rewritten() {
        let resp = run(&middleware(), request("/", &[("cookie", "lang=fr")])).await;
        assert_eq!(resp.body(), b"fr||en|Bonjour".as_slice());
        assert_eq!(resp.header("set-cookie"), None);
    }

    #[tokio::test]
    async fn empty_query_override_beats_cookie() {
        let resp = run(&middleware(), request("/?lang=", &[("cookie", "lang=fr")])).await;
        // Requested is explicitly empty, so the default language renders —
        // and the override is persisted, clearing the stored preference.
        assert_eq!(resp.body(), b"||en|Hello".as_slice());
        assert_eq!(resp.header("set-cookie"), Some("lang=; HttpOnly"));
    }

    #[tokio::test]
    async fn header_fallback_binds_translator() {
        let resp = run(
            &middleware(),
            request("/", &[("accept-language", "fr-CH, fr;q=0.9, en;q=0.8")]),
        )
        .await;
        assert_eq!(resp.body(), b"|fr-CH, fr;q=0.9, en;q=0.8|en|Bonjour".as_slice());
    }

    #[tokio::test]
    async fn no_signals_renders_default() {
        let resp = run(&middleware(), request("/", &[])).await;
        assert_eq!(resp.body(), b"||en|Hello".as_slice());
        // Nothing came from the cookie, so the (empty) preference persists.
        assert_eq!(resp.header("set-cookie"), Some("lang=; HttpOnly"));
    }

    #[tokio::test]
    async fn unknown_requested_language_falls_back_to_default() {
        let resp = run(&middleware(), request("/?lang=zz", &[])).await;
        assert_eq!(resp.body(), b"zz||en|Hello".as_slice());
        assert_eq!(resp.header("set-cookie"), Some("lang=zz; HttpOnly"));
    }

    #[tokio::test]
    async fn control_characters_in_override_are_kept_out_of_the_cookie() {
        let resp = run(&middleware(), request("/?lang=%0D%0Ax", &[])).await;
        // Downstream still sees the requested value verbatim; only the
        // cookie write-back is sanitized.
        assert_eq!(resp.body(), b"\r\nx||en|Hello".as_slice());
        assert_eq!(resp.header("set-cookie"), Some("lang=x; HttpOnly"));
    }

    #[test]
    fn empty_default_language_is_fatal() {
        let err = I18n::new(Config {
            sources: vec![("en".into(), b"{}".to_vec())],
            ..Config::default()
        })
        .err().unwrap();
        assert!(matches!(err, Error::NoDefaultLanguage));
    }

    #[test]
    fn zero_sources_is_fatal() {
        let err = I18n::new(Config {
            default_language: "en".into(),
            ..Config::default()
        })
        .err().unwrap();
        assert!(matches!(err, Error::NoSources));
    }

    #[test]
    fn unparseable_source_is_fatal() {
        let err = I18n::new(Config {
            default_language: "en".into(),
            sources: vec![("en".into(), b"not json".to_vec())],
            ..Config::default()
        })
        .err().unwrap();
        assert!(matches!(err, Error::Source { .. }));
    }

    #[test]
    fn default_language_must_be_in_catalog() {
        let err = I18n::new(Config {
            default_language: "en".into(),
            sources: vec![("fr".into(), b"{}".to_vec())],
            ..Config::default()
        })
        .err().unwrap();
        assert!(matches!(err, Error::UnknownDefaultLanguage(tag) if tag == "en"));
    }
}
