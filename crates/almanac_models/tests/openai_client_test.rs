//! Exercises the client against a one-shot local HTTP responder.

use almanac_core::GenerationRequest;
use almanac_error::GenerationErrorKind;
use almanac_interface::GenerationService;
use almanac_models::{OpenAiClient, ServiceCredentials};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request it received.
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/v1", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
            if request_complete(&received) {
                break;
            }
        }
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&received).into_owned()
    });

    (base, handle)
}

fn request_complete(received: &[u8]) -> bool {
    let text = String::from_utf8_lossy(received);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    received.len() >= header_end + 4 + length
}

fn client(base: &str, organization: Option<&str>) -> OpenAiClient {
    let credentials = ServiceCredentials::new("sk-test", organization.map(str::to_string));
    OpenAiClient::new(credentials, "o1", base, Duration::from_secs(5)).unwrap()
}

fn request() -> GenerationRequest {
    GenerationRequest::new("You are a marketplace data scientist.", "Analyze the market.")
}

#[tokio::test]
async fn test_successful_completion() {
    let (base, server) = respond_once(
        "200 OK",
        r###"{"id":"c1","choices":[{"message":{"role":"assistant","content":"## Structure"},"finish_reason":"stop"}]}"###,
    )
    .await;

    let text = client(&base, Some("org-7")).generate(&request()).await.unwrap();
    assert_eq!(text, "## Structure");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /v1/chat/completions"));
    let lowered = raw.to_lowercase();
    assert!(lowered.contains("authorization: bearer sk-test"));
    assert!(lowered.contains("openai-organization: org-7"));
    assert!(raw.contains(r#""role":"system""#));
    assert!(raw.contains("Analyze the market."));
}

#[tokio::test]
async fn test_empty_completion_is_empty_response() {
    let (base, _server) =
        respond_once("200 OK", r#"{"choices":[{"message":{"content":""}}]}"#).await;
    let err = client(&base, None).generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::EmptyResponse);
}

#[tokio::test]
async fn test_context_length_error_is_overflow() {
    let (base, _server) = respond_once(
        "400 Bad Request",
        r#"{"error":{"message":"This model's maximum context length is 200000 tokens","code":"context_length_exceeded"}}"#,
    )
    .await;
    let err = client(&base, None).generate(&request()).await.unwrap_err();
    assert!(err.is_overflow());
}

#[tokio::test]
async fn test_throttling_is_rate_limited() {
    let (base, _server) = respond_once("429 Too Many Requests", r#"{"error":{}}"#).await;
    let err = client(&base, None).generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::RateLimited(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_connection_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/v1", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base, None).generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::ConnectionFailed(_)));
}
