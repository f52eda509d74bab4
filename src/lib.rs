//! # tolk
//!
//! Per-request language negotiation for HTTP services. Resolve, remember,
//! translate. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Translation catalogs are parsed once, at startup, or the process does
//! not serve at all. After that, every request is a single synchronous
//! pass with no shared mutable state:
//!
//! 1. **Resolve** — strict precedence, first match wins: the configured
//!    URL query parameter (an explicit override, even when empty), then
//!    the `lang` cookie, then nothing — leaving the `Accept-Language`
//!    header and the configured default to decide inside the catalog.
//! 2. **Remember** — when the choice did *not* come from the cookie, the
//!    response gets `Set-Cookie: lang=<choice>; HttpOnly`, making one
//!    `?lang=fr` visit sticky for the whole session.
//! 3. **Translate** — the request's extensions carry an [`I18nContext`]:
//!    requested tag, raw header fallback, default tag, and a
//!    [`Translator`] already bound to the best catalog match. Downstream
//!    handlers call `ctx.t("key")` and get localized text, always — the
//!    default language guarantees a final fallback, so per-request
//!    resolution cannot fail.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tolk::{Config, I18n, I18nContext, Request, Response, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let i18n = I18n::new(Config {
//!         default_language: "en".into(),
//!         files: vec!["locales/en.json".into(), "locales/fr.json".into()],
//!         url_param: "lang".into(),
//!         ..Config::default()
//!     })
//!     .expect("translation catalog must load");
//!
//!     Server::bind("0.0.0.0:3000")
//!         .serve(i18n.wrap(greet))
//!         .await
//!         .expect("server error");
//! }
//!
//! async fn greet(req: Request) -> Response {
//!     let ctx = I18nContext::of(&req).expect("i18n middleware ran");
//!     Response::text(ctx.t("greeting"))
//! }
//! ```

mod catalog;
mod context;
mod error;
mod handler;
mod middleware;
mod request;
mod resolve;
mod response;
mod server;

pub use catalog::{Catalog, Translator};
pub use context::I18nContext;
pub use error::Error;
pub use handler::Handler;
pub use middleware::{Config, I18n};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use server::Server;
