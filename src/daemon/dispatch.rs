//! Webhook dispatch: one best-effort HTTP POST per fire decision.
//!
//! Runs on a spawned task so a slow or hanging endpoint never delays the
//! event loop. No retries; every outcome is terminal for that fire.

use crate::common::debug::debug_log;
use crate::daemon::events::FireDecision;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Terminal outcome of a single dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Endpoint answered 2xx
    Triggered,
    /// Endpoint answered a non-2xx status
    HttpFailure(u16),
    /// DNS/connect/timeout/IO failure before any status was received
    TransportError(String),
    /// No endpoint URL configured; no network call was made
    MissingConfig,
}

/// Shared HTTP client with bounded timeouts.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Minimal webhook payload: `{}`, or `{"secret":"..."}` when configured.
/// serde_json handles escaping of quotes and backslashes in the secret.
pub fn build_payload(secret: Option<&str>) -> String {
    match secret {
        Some(s) => serde_json::json!({ "secret": s }).to_string(),
        None => "{}".to_string(),
    }
}

/// Perform the single outbound call for a fire decision.
pub async fn dispatch(client: &reqwest::Client, decision: &FireDecision) -> DispatchOutcome {
    if decision.url.trim().is_empty() {
        return DispatchOutcome::MissingConfig;
    }

    let payload = build_payload(decision.secret.as_deref());
    debug_log(&format!("HTTP POST -> {}", decision.url));

    match client
        .post(&decision.url)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(payload)
        .send()
        .await
    {
        Ok(response) => {
            let status = response.status();
            debug_log(&format!("HTTP <- {}", status.as_u16()));
            if status.is_success() {
                DispatchOutcome::Triggered
            } else {
                DispatchOutcome::HttpFailure(status.as_u16())
            }
        }
        Err(err) => {
            debug_log(&format!("HTTP error: {}", err));
            DispatchOutcome::TransportError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    mod payloads {
        use super::*;

        #[test]
        fn test_empty_payload_without_secret() {
            assert_eq!(build_payload(None), "{}");
        }

        #[test]
        fn test_secret_payload() {
            assert_eq!(build_payload(Some("hunter2")), r#"{"secret":"hunter2"}"#);
        }

        #[test]
        fn test_secret_escaping() {
            assert_eq!(
                build_payload(Some(r#"a"b\c"#)),
                r#"{"secret":"a\"b\\c"}"#
            );
        }
    }

    /// One-shot HTTP server: accepts a single connection, captures the
    /// request up to its body, answers with the given status line.
    async fn one_shot_server(listener: TcpListener, status_line: &'static str) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let mut request = Vec::new();
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(headers_end) = text.find("\r\n\r\n") {
                let content_length = text
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(str::trim).map(str::to_string))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= headers_end + 4 + content_length {
                    break;
                }
            }
        }
        let response = format!("{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    }

    fn decision(url: String, secret: Option<&str>) -> FireDecision {
        FireDecision {
            url,
            secret: secret.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_blank_url_skips_network() {
        let client = build_client().unwrap();
        let outcome = dispatch(&client, &decision("  ".to_string(), None)).await;
        assert_eq!(outcome, DispatchOutcome::MissingConfig);
    }

    #[tokio::test]
    async fn test_success_status_triggers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(one_shot_server(listener, "HTTP/1.1 200 OK"));

        let client = build_client().unwrap();
        let url = format!("http://127.0.0.1:{}/exec", port);
        let outcome = dispatch(&client, &decision(url, None)).await;
        assert_eq!(outcome, DispatchOutcome::Triggered);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /exec"));
        assert!(request.contains("application/json; charset=utf-8"));
        assert!(request.ends_with("{}"));
    }

    #[tokio::test]
    async fn test_non_2xx_reports_status_code() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(one_shot_server(listener, "HTTP/1.1 500 Internal Server Error"));

        let client = build_client().unwrap();
        let url = format!("http://127.0.0.1:{}/exec", port);
        let outcome = dispatch(&client, &decision(url, None)).await;
        assert_eq!(outcome, DispatchOutcome::HttpFailure(500));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_secret_is_sent_in_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(one_shot_server(listener, "HTTP/1.1 200 OK"));

        let client = build_client().unwrap();
        let url = format!("http://127.0.0.1:{}/exec", port);
        let outcome = dispatch(&client, &decision(url, Some("hunter2"))).await;
        assert_eq!(outcome, DispatchOutcome::Triggered);

        let request = server.await.unwrap();
        assert!(request.ends_with(r#"{"secret":"hunter2"}"#));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = build_client().unwrap();
        let url = format!("http://127.0.0.1:{}/exec", port);
        match dispatch(&client, &decision(url, None)).await {
            DispatchOutcome::TransportError(_) => {}
            other => panic!("Expected TransportError, got {:?}", other),
        }
    }
}
