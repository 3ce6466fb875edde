//! HTTP backend client tests against wiremock servers.
//!
//! Cover request shape, response parsing and error mapping for the graph
//! store, the search index and the completion service.

use crate::completion::{CompletionService, OpenAiCompletionService};
use crate::config::{CompletionConfig, GraphConfig, SearchConfig};
use crate::error::AppError;
use crate::knowledge::graph::Neo4jHttpStore;
use crate::knowledge::search::AzureSearchIndex;
use crate::knowledge::{GraphStore, SearchIndex};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn graph_config(server: &MockServer) -> GraphConfig {
    GraphConfig {
        uri: server.uri(),
        user: "neo4j".to_string(),
        password: "secret".to_string(),
        database: "neo4j".to_string(),
    }
}

fn search_config(server: &MockServer) -> SearchConfig {
    SearchConfig {
        endpoint: server.uri(),
        api_key: "search-key".to_string(),
        index: "slices".to_string(),
    }
}

fn completion_config(server: &MockServer) -> CompletionConfig {
    CompletionConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        model: "gpt-4o".to_string(),
        temperature: 0.3,
    }
}

#[tokio::test]
async fn test_graph_store_parses_rows_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "columns": ["text", "page_url", "img_url", "score"],
                "data": [
                    { "row": ["first slice", "https://example.com/a", "https://example.com/a.png", 0.9] },
                    { "row": ["second slice", "https://example.com/b", null, 0.5] }
                ]
            }],
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Neo4jHttpStore::new(graph_config(&server));
    let fragments = store
        .query_by_brand("kit-kat", "calories", 5)
        .await
        .unwrap();

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].text, "first slice");
    assert_eq!(fragments[0].source_url, "https://example.com/a");
    assert_eq!(
        fragments[0].image_url.as_deref(),
        Some("https://example.com/a.png")
    );
    assert_eq!(fragments[1].text, "second slice");
    assert_eq!(fragments[1].image_url, None);
}

#[tokio::test]
async fn test_graph_store_sends_slug_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "columns": [], "data": [] }],
            "errors": []
        })))
        .mount(&server)
        .await;

    let store = Neo4jHttpStore::new(graph_config(&server));
    store.query_by_brand("kit-kat", "calories", 1).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let params = &body["statements"][0]["parameters"];
    assert_eq!(params["brandSlug"], "kit-kat");
    assert_eq!(params["kw"], "calories");
    assert_eq!(params["k"], 1);
}

#[tokio::test]
async fn test_graph_store_capitalizes_category_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "columns": [], "data": [] }],
            "errors": []
        })))
        .mount(&server)
        .await;

    let store = Neo4jHttpStore::new(graph_config(&server));
    store.query_by_category("recipe", "cake", 5).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["statements"][0]["parameters"]["cat"], "Recipe");
}

#[tokio::test]
async fn test_graph_store_surfaces_cypher_errors() {
    // The transaction API reports statement errors in-band with HTTP 200.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "errors": [{ "code": "Neo.ClientError.Statement.SyntaxError", "message": "bad cypher" }]
        })))
        .mount(&server)
        .await;

    let store = Neo4jHttpStore::new(graph_config(&server));
    let result = store.query_by_brand("kit-kat", "calories", 5).await;

    match result {
        Err(AppError::Store(msg)) => assert!(msg.contains("bad cypher")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_graph_store_maps_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Neo4jHttpStore::new(graph_config(&server));
    let result = store.query_by_category("recipe", "cake", 5).await;
    assert!(matches!(result, Err(AppError::Store(_))));
}

#[tokio::test]
async fn test_search_index_parses_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/slices/docs/search"))
        .and(query_param("api-version", "2023-11-01"))
        .and(header("api-key", "search-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "content": "doc one", "url": "https://example.com/1" },
                { "content": "doc two", "url": "https://example.com/2" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let index = AzureSearchIndex::new(search_config(&server));
    let fragments = index.query("chocolate", 5).await.unwrap();

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].text, "doc one");
    assert_eq!(fragments[0].source_url, "https://example.com/1");
    assert_eq!(fragments[0].image_url, None);
}

#[tokio::test]
async fn test_search_index_sends_top_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let index = AzureSearchIndex::new(search_config(&server));
    index.query("chocolate", 3).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["search"], "chocolate");
    assert_eq!(body["top"], 3);
}

#[tokio::test]
async fn test_search_index_maps_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let index = AzureSearchIndex::new(search_config(&server));
    let result = index.query("chocolate", 5).await;

    match result {
        Err(AppError::Store(msg)) => assert!(msg.contains("403")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_returns_trimmed_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  An answer.  " } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service =
        OpenAiCompletionService::new(completion_config(&server), Duration::from_secs(5));
    let answer = service.complete("a prompt").await.unwrap();
    assert_eq!(answer, "An answer.");
}

#[tokio::test]
async fn test_completion_sends_model_and_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "ok" } }]
        })))
        .mount(&server)
        .await;

    let service =
        OpenAiCompletionService::new(completion_config(&server), Duration::from_secs(5));
    service.complete("a prompt").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "a prompt");
}

#[tokio::test]
async fn test_completion_http_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let service =
        OpenAiCompletionService::new(completion_config(&server), Duration::from_secs(5));
    let result = service.complete("a prompt").await;

    match result {
        Err(AppError::Completion(msg)) => assert!(msg.contains("500")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] })),
        )
        .mount(&server)
        .await;

    let service =
        OpenAiCompletionService::new(completion_config(&server), Duration::from_millis(50));
    let result = service.complete("a prompt").await;
    assert!(matches!(result, Err(AppError::Timeout(_))));
}

#[tokio::test]
async fn test_malformed_completion_body_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let service =
        OpenAiCompletionService::new(completion_config(&server), Duration::from_secs(5));
    let result = service.complete("a prompt").await;
    assert!(matches!(result, Err(AppError::Completion(_))));
}
