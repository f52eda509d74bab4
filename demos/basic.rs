//! Minimal tolk example — a localized greeting page.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/                        # default: English
//!   curl -i http://localhost:3000/?lang=fr                # explicit override
//!   curl -i -H 'cookie: lang=fr' http://localhost:3000/   # sticky preference
//!   curl -i -H 'accept-language: es, fr;q=0.8' http://localhost:3000/

use tolk::{Config, ContentType, I18n, I18nContext, Request, Response, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let i18n = I18n::new(Config {
        default_language: "en".into(),
        // Embedded sources keep the demo self-contained; real services
        // usually point Config::files at a locales/ directory instead.
        sources: vec![
            (
                "en".into(),
                br#"{"greeting":"Hello","visits":"You are visitor {n}"}"#.to_vec(),
            ),
            (
                "fr".into(),
                br#"{"greeting":"Bonjour","visits":"Vous etes le visiteur {n}"}"#.to_vec(),
            ),
            (
                "es".into(),
                br#"{"greeting":"Hola","visits":"Eres el visitante {n}"}"#.to_vec(),
            ),
        ],
        url_param: "lang".into(),
        debug: true,
        ..Config::default()
    })
    .expect("translation catalog must load");

    Server::bind("0.0.0.0:3000")
        .serve(i18n.wrap(greet))
        .await
        .expect("server error");
}

async fn greet(req: Request) -> Response {
    let ctx = I18nContext::of(&req).expect("i18n middleware ran");
    let page = format!(
        "<h1>{}</h1><p>{}</p><p>lang={} default={}</p>",
        ctx.t("greeting"),
        ctx.translator().t_with("visits", &[("n", "42")]),
        ctx.translator().tag(),
        ctx.default_language(),
    );
    Response::builder().bytes(ContentType::Html, page.into_bytes())
}
