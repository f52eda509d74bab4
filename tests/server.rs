//! End-to-end tests: the middleware behind a real server, observed over a
//! raw TCP client, cookies and all.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tolk::{Config, I18n, I18nContext, Request, Response, Server};

async fn echo(req: Request) -> Response {
    let ctx = I18nContext::of(&req).expect("context attached");
    Response::text(format!("{}|{}|{}", ctx.requested(), ctx.default_language(), ctx.t("greeting")))
}

/// Starts a server with the i18n chain on an ephemeral port.
async fn start_server() -> SocketAddr {
    let i18n = I18n::new(Config {
        default_language: "en".into(),
        sources: vec![
            ("en".into(), br#"{"greeting":"Hello"}"#.to_vec()),
            ("fr".into(), br#"{"greeting":"Bonjour"}"#.to_vec()),
        ],
        url_param: "lang".into(),
        ..Config::default()
    })
    .expect("middleware builds");

    // The OS picks the port; the server takes over the bound listener, so
    // the address is valid the moment serve() is spawned.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server = Server::from_listener(listener);
    tokio::spawn(async move {
        server.serve(i18n.wrap(echo)).await.expect("serve");
    });

    addr
}

async fn get(addr: SocketAddr, path: &str, headers: &[(&str, &str)]) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let mut req = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("\r\n");
    stream.write_all(req.as_bytes()).await.expect("write");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read");
    String::from_utf8_lossy(&raw).into_owned()
}

#[tokio::test]
async fn query_override_sets_cookie_over_the_wire() {
    let addr = start_server().await;
    let resp = get(addr, "/?lang=fr", &[("cookie", "lang=de")]).await;
    assert!(resp.starts_with("HTTP/1.1 200"), "got: {resp}");
    assert!(resp.contains("set-cookie: lang=fr; HttpOnly"), "got: {resp}");
    assert!(resp.ends_with("fr|en|Bonjour"), "got: {resp}");
}

#[tokio::test]
async fn cookie_preference_is_not_rewritten_over_the_wire() {
    let addr = start_server().await;
    let resp = get(addr, "/", &[("cookie", "lang=fr")]).await;
    assert!(!resp.contains("set-cookie"), "got: {resp}");
    assert!(resp.ends_with("fr|en|Bonjour"), "got: {resp}");
}

#[tokio::test]
async fn default_language_renders_without_any_signal() {
    let addr = start_server().await;
    let resp = get(addr, "/", &[]).await;
    assert!(resp.starts_with("HTTP/1.1 200"), "got: {resp}");
    assert!(resp.ends_with("|en|Hello"), "got: {resp}");
}

#[tokio::test]
async fn control_characters_in_override_still_serve_the_page() {
    let addr = start_server().await;
    let resp = get(addr, "/?lang=%0d%0ax", &[]).await;
    assert!(resp.starts_with("HTTP/1.1 200"), "got: {resp}");
    assert!(resp.contains("set-cookie: lang=x; HttpOnly"), "got: {resp}");
    assert!(resp.ends_with("|en|Hello"), "got: {resp}");
}

#[tokio::test]
async fn concurrent_requests_see_only_their_own_context() {
    let addr = start_server().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        handles.push(tokio::spawn(async move {
            let lang = format!("l{i}");
            let resp = get(addr, &format!("/?lang={lang}"), &[]).await;
            (lang, resp)
        }));
    }

    for handle in handles {
        let (lang, resp) = handle.await.expect("client task");
        // Unknown tags fall back to the default translator, but the
        // propagated requested tag must be exactly this request's own.
        assert!(resp.ends_with(&format!("{lang}|en|Hello")), "lang {lang} got: {resp}");
        assert!(resp.contains(&format!("set-cookie: lang={lang}; HttpOnly")), "got: {resp}");
    }
}
