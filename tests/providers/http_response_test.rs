//! HTTP response sanitization tests and provider round trips against a local server.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use mailtriage::providers::anthropic::AnthropicProvider;
use mailtriage::providers::extraction::ModelAnalyzer;
use mailtriage::providers::openai::OpenAiProvider;
use mailtriage::providers::{
    check_http_response, CompletionRequest, EmailAnalyzer, LlmProvider, Message, ProviderError,
};

/// Serve a single response and hand back the raw request text.
async fn serve_once(
    status_line: &str,
    content_type: &str,
    body: &str,
) -> (String, oneshot::Receiver<String>) {
    let listener_result = TcpListener::bind("127.0.0.1:0").await;
    assert!(listener_result.is_ok());
    let listener = match listener_result {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };

    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let (tx, rx) = oneshot::channel();
    let status_line_owned = status_line.to_owned();
    let content_type_owned = content_type.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        let accepted = listener.accept().await;
        if let Ok((mut socket, _)) = accepted {
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: {content_type_owned}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        }
    });

    (format!("http://{addr}/"), rx)
}

/// Read headers and the full `Content-Length` body so the socket is drained
/// before the response is written.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        raw.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

fn extraction_reply_json() -> String {
    json!({
        "summary_lines": ["Server down", "Reply asap"],
        "category": "IT",
        "urgency": "Critical",
        "action_required": "yes"
    })
    .to_string()
}

#[tokio::test]
async fn check_http_response_redacts_api_keys() {
    let raw_key = "sk-ant-REDACTED";
    let body = format!("invalid x-api-key {raw_key}");
    let (url, _rx) = serve_once("401 Unauthorized", "text/plain", &body).await;

    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    match check_http_response(response).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        Err(other) => panic!("expected http status error, got: {other}"),
        Ok(_) => panic!("response should fail on non-success status"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let body = "x".repeat(400);
    let (url, _rx) = serve_once("500 Internal Server Error", "text/plain", &body).await;

    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    match check_http_response(response).await {
        Err(ProviderError::HttpStatus { body, .. }) => {
            assert!(body.ends_with("...[truncated]"));
        }
        Err(other) => panic!("expected http status error, got: {other}"),
        Ok(_) => panic!("response should fail on non-success status"),
    }
}

#[tokio::test]
async fn check_http_response_returns_success_body() {
    let (url, _rx) = serve_once("200 OK", "text/plain", "fine").await;
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    match check_http_response(response).await {
        Ok(body) => assert_eq!(body, "fine"),
        Err(err) => panic!("success status should pass: {err}"),
    }
}

#[tokio::test]
async fn openai_provider_round_trip() {
    let reply = json!({
        "choices": [{"message": {"role": "assistant", "content": extraction_reply_json()}}],
        "model": "gpt-4o-mini",
        "usage": {"prompt_tokens": 3, "completion_tokens": 4}
    });
    let (url, rx) = serve_once("200 OK", "application/json", &reply.to_string()).await;

    let provider = OpenAiProvider::new(
        "openai/gpt-4o-mini".to_owned(),
        "gpt-4o-mini".to_owned(),
        "test-openai-key".to_owned(),
    )
    .with_endpoint(url);

    let request = CompletionRequest {
        messages: vec![Message::user("ping")],
        system: Some("sys".to_owned()),
        max_tokens: Some(10),
        temperature: Some(0.2),
    };
    let response = match provider.complete(request).await {
        Ok(response) => response,
        Err(err) => panic!("completion should succeed: {err}"),
    };
    assert_eq!(response.model, "gpt-4o-mini");
    assert_eq!(response.usage.output_tokens, 4);

    let seen = rx.await.unwrap_or_default().to_lowercase();
    assert!(seen.starts_with("post "));
    assert!(seen.contains("authorization: bearer test-openai-key"));
    assert!(seen.contains("\"model\":\"gpt-4o-mini\""));
}

#[tokio::test]
async fn anthropic_analyzer_round_trip() {
    let reply = json!({
        "content": [{"type": "text", "text": format!("```json\n{}\n```", extraction_reply_json())}],
        "model": "claude-3-5-sonnet-20240620",
        "usage": {"input_tokens": 3, "output_tokens": 4}
    });
    let (url, rx) = serve_once("200 OK", "application/json", &reply.to_string()).await;

    let provider = AnthropicProvider::new(
        "anthropic/claude-3-5-sonnet-20240620".to_owned(),
        "claude-3-5-sonnet-20240620".to_owned(),
        "test-anthropic-key".to_owned(),
    )
    .with_endpoint(url);
    let analyzer = ModelAnalyzer::new(std::sync::Arc::new(provider));

    let raw = match analyzer.analyze("Server is down, reply asap").await {
        Ok(raw) => raw,
        Err(err) => panic!("analysis should succeed: {err}"),
    };
    assert_eq!(raw.category.as_deref(), Some("IT"));
    assert_eq!(raw.urgency.as_deref(), Some("Critical"));
    assert_eq!(raw.action_required.as_deref(), Some("yes"));
    assert_eq!(raw.summary_lines, Some(json!(["Server down", "Reply asap"])));

    let seen = rx.await.unwrap_or_default().to_lowercase();
    assert!(seen.contains("x-api-key: test-anthropic-key"));
    assert!(seen.contains("anthropic-version:"));
}

#[tokio::test]
async fn provider_error_status_surfaces_as_http_status() {
    let (url, _rx) = serve_once("429 Too Many Requests", "application/json", "{\"error\":\"rate\"}").await;
    let provider = OpenAiProvider::new("openai/m".to_owned(), "m".to_owned(), "k".to_owned())
        .with_endpoint(url);
    let result = provider
        .complete(CompletionRequest {
            messages: vec![Message::user("x")],
            system: None,
            max_tokens: None,
            temperature: None,
        })
        .await;
    assert!(matches!(result, Err(ProviderError::HttpStatus { status: 429, .. })));
}
