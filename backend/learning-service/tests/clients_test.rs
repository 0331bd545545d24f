//! Outbound client tests against a mock HTTP server.
//!
//! Coverage:
//! - OpenAI-compatible completions: request shape, answer extraction, API errors
//! - Chroma: heartbeat, document lookup through get-or-create, query parsing

use learning_service::clients::{
    ChromaClient, LlmError, LlmProvider, OpenAiCompatibleProvider, VectorStore, VectorStoreError,
};
use learning_service::config::LlmConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: format!("{}/openai/v1", server.uri()),
        api_key: Some("gsk_test".into()),
        model: "mixtral-8x7b-32768".into(),
        temperature: 0.5,
        max_tokens: 1024,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_completion_request_and_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "mixtral-8x7b-32768",
            "max_tokens": 1024,
            "stream": false,
            "messages": [{ "role": "user", "content": "Explain recursion" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "A function calling itself." },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(&llm_config(&server)).unwrap();
    let answer = provider.complete("Explain recursion").await.unwrap();

    assert_eq!(answer, "A function calling itself.");
}

#[tokio::test]
async fn test_completion_without_choices_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(&llm_config(&server)).unwrap();
    assert_eq!(provider.complete("q").await.unwrap(), "");
}

#[tokio::test]
async fn test_completion_api_error_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(&llm_config(&server)).unwrap();
    let err = provider.complete("q").await.unwrap_err();

    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_garbage_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(&llm_config(&server)).unwrap();
    assert!(matches!(
        provider.complete("q").await,
        Err(LlmError::Decode(_))
    ));
}

// ============================================
// Chroma
// ============================================

async fn chroma(server: &MockServer) -> ChromaClient {
    ChromaClient::new(&server.uri(), Duration::from_secs(2)).unwrap()
}

async fn mount_collection(server: &MockServer, name: &str, id: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/collections"))
        .and(body_partial_json(json!({ "name": name, "get_or_create": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": name,
            "metadata": null
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_chroma_heartbeat() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/heartbeat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "nanosecond heartbeat": 1 })),
        )
        .mount(&server)
        .await;

    assert!(chroma(&server).await.heartbeat().await.is_ok());
}

#[tokio::test]
async fn test_chroma_heartbeat_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/heartbeat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(matches!(
        chroma(&server).await.heartbeat().await,
        Err(VectorStoreError::Api { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_chroma_has_document() {
    let server = MockServer::start().await;
    mount_collection(&server, "user_t1_transcripts", "c-1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/c-1/get"))
        .and(body_partial_json(json!({ "ids": ["video-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": ["video-1"],
            "documents": null,
            "metadatas": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/c-1/get"))
        .and(body_partial_json(json!({ "ids": ["video-2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": [] })))
        .mount(&server)
        .await;

    let client = chroma(&server).await;
    assert!(client
        .has_document("user_t1_transcripts", "video-1")
        .await
        .unwrap());
    assert!(!client
        .has_document("user_t1_transcripts", "video-2")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_chroma_query_returns_sorted_snippets() {
    let server = MockServer::start().await;
    mount_collection(&server, "user_t1_transcripts", "c-1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/c-1/query"))
        .and(body_partial_json(json!({
            "query_texts": ["what is a closure"],
            "n_results": 2,
            "include": ["documents", "distances", "metadatas"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["a", "b"]],
            "documents": [["closures capture scope", "loops repeat"]],
            "distances": [[0.8, 0.2]],
            "metadatas": [[null, null]]
        })))
        .mount(&server)
        .await;

    let snippets = chroma(&server)
        .await
        .query("user_t1_transcripts", "what is a closure", 2)
        .await
        .unwrap();

    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0].document, "loops repeat");
    assert_eq!(snippets[0].distance, 0.2);
    assert_eq!(snippets[1].document, "closures capture scope");
}
