//! Request-scoped language context.

use crate::catalog::Translator;
use crate::request::Request;

/// The resolved language values for one request.
///
/// The middleware inserts one instance into the request's extensions before
/// invoking the next handler; downstream handlers read it back with
/// [`I18nContext::of`]. Every request gets its own instance — the bundle is
/// immutable and never shared across requests.
#[derive(Clone)]
pub struct I18nContext {
    requested: String,
    header_fallback: String,
    default_language: String,
    translator: Translator,
}

impl I18nContext {
    pub(crate) fn new(
        requested: String,
        header_fallback: String,
        default_language: String,
        translator: Translator,
    ) -> Self {
        Self { requested, header_fallback, default_language, translator }
    }

    /// The context attached to `req`, if a language middleware ran.
    pub fn of(req: &Request) -> Option<&Self> {
        req.extensions().get()
    }

    /// The tag the client asked for — query parameter or cookie. Possibly
    /// empty when the request carried neither.
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// Raw `Accept-Language` value of the request, unparsed.
    pub fn header_fallback(&self) -> &str {
        &self.header_fallback
    }

    /// The configured default language, identical for every request.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// The translate function bound to this request's resolved language.
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Shorthand for `self.translator().t(key)`.
    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }
}
