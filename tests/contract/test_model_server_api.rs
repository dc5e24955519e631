use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wcag_reporter::analyzer::{ModelServerClient, OllamaClient, PromptBuilder};
use wcag_reporter::{AnalysisConfig, ClientError, ElementContext, ReportLanguage};

fn prompt() -> wcag_reporter::analyzer::Prompt {
    PromptBuilder::build_for_language(
        &ElementContext::new("button", "Submit"),
        &AnalysisConfig::default(),
        ReportLanguage::English,
    )
}

#[tokio::test]
async fn test_generate_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "llama3.2",
                "response": "Summary: A button.\nIssues: none",
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let response = client
        .complete(&prompt(), "llama3.2", Duration::from_secs(10), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.text, "Summary: A button.\nIssues: none");
    assert_eq!(response.model, "llama3.2");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_prompt_is_sent_in_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex("WCAG 2.2 accessibility auditor".to_string()))
        .with_status(200)
        .with_body(json!({"response": "Summary: ok", "done": true}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    client
        .complete(&prompt(), "llama3.2", Duration::from_secs(10), &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_models() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "models": [
                    {"name": "llama3.2:latest", "size": 2019393189u64},
                    {"name": "mistral:7b"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let models = client.list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert!(models.contains("llama3.2:latest"));
    assert!(models.contains("mistral:7b"));
    assert!(client.check_connectivity().await);
}

#[tokio::test]
async fn test_missing_model_maps_to_model_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body(json!({"error": "model 'phi9' not found, try pulling it first"}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let result = client
        .complete(&prompt(), "phi9", Duration::from_secs(10), &CancellationToken::new())
        .await;

    assert_eq!(result, Err(ClientError::ModelNotFound { model: "phi9".to_string() }));
}

#[tokio::test]
async fn test_plain_not_found_is_a_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body("404 page not found")
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let result = client
        .complete(&prompt(), "llama3.2", Duration::from_secs(10), &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        Err(ClientError::Server {
            status: Some(404),
            detail: "404 page not found".to_string(),
        })
    );
}

#[tokio::test]
async fn test_answering_model_is_taken_from_response() {
    let mut server = Server::new_async().await;

    let _tagged = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"model": "llama3.2"})))
        .with_status(200)
        .with_body(
            json!({
                "model": "llama3.2:latest",
                "response": "Summary: ok",
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _untagged = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"model": "mistral:7b"})))
        .with_status(200)
        .with_body(json!({"model": "", "response": "Summary: ok", "done": true}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let cancel = CancellationToken::new();

    let response = client
        .complete(&prompt(), "llama3.2", Duration::from_secs(10), &cancel)
        .await
        .unwrap();
    assert_eq!(response.model, "llama3.2:latest");

    let response = client
        .complete(&prompt(), "mistral:7b", Duration::from_secs(10), &cancel)
        .await
        .unwrap();
    assert_eq!(response.model, "mistral:7b");
}

#[tokio::test]
async fn test_server_error_status() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body(json!({"error": "llama runner process has terminated"}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let result = client
        .complete(&prompt(), "llama3.2", Duration::from_secs(10), &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        Err(ClientError::Server {
            status: Some(500),
            detail: "llama runner process has terminated".to_string(),
        })
    );
}

#[tokio::test]
async fn test_undecodable_body_and_missing_field() {
    let mut server = Server::new_async().await;

    let _garbage = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"model": "garbage"})))
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;
    let _missing = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"model": "missing"})))
        .with_status(200)
        .with_body(json!({"done": true}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    let cancel = CancellationToken::new();

    let garbage = client.complete(&prompt(), "garbage", Duration::from_secs(10), &cancel).await;
    assert!(matches!(garbage, Err(ClientError::Server { status: None, .. })));

    let missing = client.complete(&prompt(), "missing", Duration::from_secs(10), &cancel).await;
    assert_eq!(
        missing,
        Err(ClientError::Server {
            status: None,
            detail: "response field missing".to_string(),
        })
    );
}

#[tokio::test]
async fn test_tags_failure_is_not_connectivity() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tags")
        .with_status(503)
        .with_body("starting up")
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url()).unwrap();
    assert!(!client.check_connectivity().await);
    assert_eq!(
        client.list_models().await,
        Err(ClientError::Server {
            status: Some(503),
            detail: "starting up".to_string(),
        })
    );
}
