use mockito::Server;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wcag_reporter::analyzer::{ModelServerClient, PromptBuilder, RetryPolicy};
use wcag_reporter::{
    fetch_available_models, run_analysis, run_analysis_with_cancel, test_connection,
    AnalysisConfig, AnalysisFailure, AnalysisOrchestrator, ClientError, ElementContext,
    OllamaClient, OutputLanguage, ReportLanguage,
};

fn element() -> ElementContext {
    ElementContext::new("button", "Submit")
}

fn config(url: &str) -> AnalysisConfig {
    AnalysisConfig::default()
        .with_server_url(url)
        .with_output_language(OutputLanguage::English)
}

/// Accepts connections and holds them open without ever answering.
async fn silent_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(stream);
        }
    });

    (url, accepted)
}

/// A local address nothing listens on.
async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 1,
        backoff: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_complete_with_tiny_timeout_returns_promptly() {
    let (url, _accepted) = silent_server().await;
    let client = OllamaClient::new(&url).unwrap();
    let prompt = PromptBuilder::build_for_language(
        &element(),
        &AnalysisConfig::default(),
        ReportLanguage::English,
    );

    let started = Instant::now();
    let result = client
        .complete(&prompt, "llama3.2", Duration::from_millis(1), &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        Err(ClientError::Timeout {
            timeout: Duration::from_millis(1)
        })
    );
    assert!(started.elapsed() < Duration::from_millis(100), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn test_timeout_is_bounded_and_retried_once() {
    let (url, accepted) = silent_server().await;
    let config = config(&url).with_timeout(Duration::from_millis(100));
    let orchestrator =
        AnalysisOrchestrator::new(OllamaClient::from_config(&config).unwrap()).with_retry_policy(fast_retry());

    let started = Instant::now();
    let result = orchestrator
        .analyze(&element(), &config, &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        Err(AnalysisFailure::Timeout {
            timeout: Duration::from_millis(100)
        })
    );
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_retry_policy_sends_one_request() {
    let (url, accepted) = silent_server().await;
    let config = config(&url).with_timeout(Duration::from_millis(100));
    let orchestrator = AnalysisOrchestrator::new(OllamaClient::from_config(&config).unwrap())
        .with_retry_policy(RetryPolicy::none());

    let result = orchestrator
        .analyze(&element(), &config, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(AnalysisFailure::Timeout { .. })));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connection_refused() {
    let url = closed_port_url().await;

    let result = run_analysis(element(), config(&url)).await;

    match result {
        Err(failure @ AnalysisFailure::Connection { .. }) => {
            assert_eq!(failure.exit_code(), 5);
        }
        other => panic!("expected connection failure, got {:?}", other),
    }

    assert!(!test_connection(&config(&url)).await);
    assert!(matches!(
        fetch_available_models(&config(&url)).await,
        Err(ClientError::Connection { .. })
    ));
}

#[tokio::test]
async fn test_model_not_found_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .expect(1)
        .with_status(404)
        .with_body(json!({"error": "model \"llama9\" not found, try pulling it first"}).to_string())
        .create_async()
        .await;

    let result = run_analysis(element(), config(&server.url()).with_model("llama9")).await;

    assert_eq!(
        result,
        Err(AnalysisFailure::ModelNotFound {
            model: "llama9".to_string()
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .expect(1)
        .with_status(500)
        .with_body(json!({"error": "out of memory"}).to_string())
        .create_async()
        .await;

    let result = run_analysis(element(), config(&server.url())).await;

    assert_eq!(
        result,
        Err(AnalysisFailure::Server {
            status: Some(500),
            detail: "out of memory".to_string()
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_during_request() {
    let (url, _accepted) = silent_server().await;
    let config = config(&url).with_timeout(Duration::from_secs(60));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = run_analysis_with_cancel(element(), config, cancel).await;

    assert_eq!(result, Err(AnalysisFailure::Cancelled));
    assert_eq!(result.unwrap_err().exit_code(), 130);
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn test_invalid_server_url() {
    let result = run_analysis(element(), config("localhost:11434")).await;
    assert!(matches!(result, Err(AnalysisFailure::InvalidConfig(_))));
    assert_eq!(result.unwrap_err().exit_code(), 2);
}
