//! Integration tests for the streaming accumulator against a mock backend.
//!
//! Covers the behavioral contracts of the NDJSON fold: ordered concatenation,
//! thinking prefixing, malformed-line tolerance, forced stream flag, failure
//! before and during the stream, and the status-fold sibling.

use std::time::Duration;

use ollama_mcp::client::{chat_fragment, generate_fragment, OllamaClient};
use ollama_mcp::config::OllamaConfig;
use ollama_mcp::error::OllamaError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(uri: &str) -> OllamaClient {
    let config = OllamaConfig::new(uri, Duration::from_secs(5)).unwrap();
    OllamaClient::new(config).unwrap()
}

fn ndjson(lines: &[&str]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

#[tokio::test]
async fn test_chat_stream_concatenates_fragments_in_arrival_order() {
    let mock_server = MockServer::start().await;

    let body = ndjson(&[
        r#"{"message":{"content":"Hi"},"done":false}"#,
        r#"{"message":{"content":" there"},"done":true}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"model": "llama3.2", "messages": [{"role": "user", "content": "hi"}]});

    let result = client
        .request_stream("chat", &payload, chat_fragment)
        .await
        .unwrap();
    assert_eq!(result, "Hi there");
}

#[tokio::test]
async fn test_generate_stream_prefixes_thinking_block() {
    let mock_server = MockServer::start().await;

    let body = ndjson(&[
        r#"{"thinking":"Hmm","response":"","done":false}"#,
        r#"{"response":"Yes.","done":true}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"model": "llama3.2", "prompt": "question"});

    let result = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap();
    assert_eq!(result, "[Thinking] Hmm\n\nYes.");
}

#[tokio::test]
async fn test_stream_flag_is_forced_on() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(ndjson(&[r#"{"response":"ok"}"#]), "application/x-ndjson"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    // Caller said non-streaming; the accumulator must override it.
    let payload = json!({"model": "llama3.2", "prompt": "hi", "stream": false});

    let result = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap();
    assert_eq!(result, "ok");
}

#[tokio::test]
async fn test_malformed_and_blank_lines_are_skipped() {
    let mock_server = MockServer::start().await;

    let body = ndjson(&[
        r#"{"response":"a","done":false}"#,
        "",
        ": keepalive",
        "{not json at all",
        r#"{"response":"b","done":true}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"model": "llama3.2", "prompt": "hi"});

    let result = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap();
    assert_eq!(result, "ab");
}

#[tokio::test]
async fn test_final_line_without_trailing_newline_is_folded() {
    let mock_server = MockServer::start().await;

    let body = format!(
        "{}\n{}",
        r#"{"response":"first ","done":false}"#, r#"{"response":"last","done":true}"#
    );
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"model": "llama3.2", "prompt": "hi"});

    let result = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap();
    assert_eq!(result, "first last");
}

#[tokio::test]
async fn test_error_status_before_stream_fails_with_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"model": "missing", "messages": []});

    let error = client
        .request_stream("chat", &payload, chat_fragment)
        .await
        .unwrap_err();
    match error {
        OllamaError::Http { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "model not found");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_fails_with_unreachable_error() {
    // Bind and immediately drop a listener so the port is closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let payload = json!({"model": "llama3.2", "prompt": "hi"});

    let error = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap_err();
    assert!(matches!(error, OllamaError::Unreachable(_)));
}

#[tokio::test]
async fn test_mid_stream_drop_discards_partial_accumulation() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // A chunked response that delivers one valid fragment and then closes the
    // connection without the terminating chunk.
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;

        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/x-ndjson\r\ntransfer-encoding: chunked\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();

        let line = "{\"response\":\"partial\",\"done\":false}\n";
        let chunk = format!("{:x}\r\n{line}\r\n", line.len());
        socket.write_all(chunk.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
    });

    let client = client_for(&format!("http://{addr}"));
    let payload = json!({"model": "llama3.2", "prompt": "hi"});

    let error = client
        .request_stream("generate", &payload, generate_fragment)
        .await
        .unwrap_err();
    assert!(matches!(error, OllamaError::Unreachable(_)));
}

#[tokio::test]
async fn test_status_stream_folds_to_last_status() {
    let mock_server = MockServer::start().await;

    let body = ndjson(&[
        r#"{"status":"pulling manifest"}"#,
        r#"{"status":"downloading","completed":512,"total":1024}"#,
        r#"{"status":"success"}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"name": "llama3.2"});

    let status = client.request_status_stream("pull", &payload).await.unwrap();
    assert_eq!(status, "success");
}

#[tokio::test]
async fn test_status_stream_without_status_fields_reports_unknown() {
    let mock_server = MockServer::start().await;

    let body = ndjson(&[r#"{"done":true}"#]);
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let payload = json!({"name": "llama3.2"});

    let status = client.request_status_stream("pull", &payload).await.unwrap();
    assert_eq!(status, "unknown");
}
