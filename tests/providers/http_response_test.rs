//! Upstream error body handling.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mindful::providers::{check_http_response, ProviderError};

/// Serve a single canned response and return its URL.
async fn serve_once(status_line: &str, body: &str) -> String {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut read_buf = [0_u8; 1024];
            let _ = socket.read(&mut read_buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}/")
}

async fn fetch(url: String) -> reqwest::Response {
    match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    }
}

#[tokio::test]
async fn success_returns_body_text() {
    let url = serve_once("200 OK", r#"{"ok":true}"#).await;
    let checked = check_http_response(fetch(url).await).await;
    assert!(matches!(checked.as_deref(), Ok(r#"{"ok":true}"#)));
}

#[tokio::test]
async fn error_status_redacts_api_keys() {
    let raw_key = "sk-proj-abcdefghijklmnop0123456789";
    let body = format!(r#"{{"error":{{"message":"Incorrect API key provided: {raw_key}"}}}}"#);
    let url = serve_once("401 Unauthorized", &body).await;

    match check_http_response(fetch(url).await).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn error_status_truncates_long_bodies() {
    let body = "e".repeat(1000);
    let url = serve_once("500 Internal Server Error", &body).await;

    match check_http_response(fetch(url).await).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.ends_with("...[truncated]"));
            assert!(body.len() < 300);
        }
        other => panic!("expected http status error, got: {other:?}"),
    }
}
