use clap::Parser;
use std::time::Duration;
use wcag_reporter::cli::{Cli, ReportFormatter};
use wcag_reporter::localization::LocalizedStrings;
use wcag_reporter::{
    AnalysisFailure, CliHandler, ClientError, ParseError, ReportLanguage, WcagError,
};

fn every_failure() -> Vec<AnalysisFailure> {
    vec![
        AnalysisFailure::NoElementContext,
        AnalysisFailure::InvalidConfig("model identifier cannot be empty".to_string()),
        AnalysisFailure::Connection {
            url: "http://localhost:11434".to_string(),
            detail: "connection refused".to_string(),
        },
        AnalysisFailure::ModelNotFound {
            model: "llama3.2".to_string(),
        },
        AnalysisFailure::Timeout {
            timeout: Duration::from_secs(90),
        },
        AnalysisFailure::Server {
            status: Some(503),
            detail: "loading model".to_string(),
        },
        AnalysisFailure::Parse(ParseError::MissingSummary),
        AnalysisFailure::Parse(ParseError::EmptyResponse),
        AnalysisFailure::Cancelled,
    ]
}

#[test]
fn test_exit_codes_per_failure_kind() {
    let codes: Vec<i32> = every_failure().iter().map(AnalysisFailure::exit_code).collect();
    assert_eq!(codes, vec![3, 2, 5, 6, 4, 5, 7, 7, 130]);
}

#[test]
fn test_every_failure_has_a_message_in_both_languages() {
    for language in [ReportLanguage::English, ReportLanguage::Turkish] {
        let strings = LocalizedStrings::new(language);
        for failure in every_failure() {
            let message = strings.failure_message(&failure);
            assert!(!message.is_empty(), "{:?} has no {:?} message", failure, language);
            assert!(!message.contains('{'), "unfilled placeholder in {:?}", message);
        }
    }
}

#[test]
fn test_messages_carry_the_relevant_detail() {
    let strings = LocalizedStrings::new(ReportLanguage::Turkish);

    let timeout = strings.failure_message(&AnalysisFailure::Timeout {
        timeout: Duration::from_millis(1500),
    });
    assert!(timeout.contains("2 saniye"), "{}", timeout);

    let server = strings.failure_message(&AnalysisFailure::Server {
        status: Some(503),
        detail: "loading model".to_string(),
    });
    assert!(server.contains("HTTP 503 loading model"));

    let wrong_path = strings.failure_message(&AnalysisFailure::Server {
        status: Some(404),
        detail: "404 page not found".to_string(),
    });
    assert!(wrong_path.contains("http://localhost:11434"), "{}", wrong_path);
    assert!(!wrong_path.contains("ollama pull"));

    let missing = strings.failure_message(&AnalysisFailure::ModelNotFound {
        model: "mistral:7b".to_string(),
    });
    assert!(missing.contains("ollama pull mistral:7b"));
}

#[test]
fn test_client_errors_convert_to_failures() {
    let failure: AnalysisFailure = ClientError::Server {
        status: None,
        detail: "response field missing".to_string(),
    }
    .into();
    assert_eq!(failure.to_string(), "Model server error: response field missing");

    let wrapped = WcagError::from(ClientError::Timeout {
        timeout: Duration::from_secs(1),
    });
    assert_eq!(wrapped.exit_code(), 4);

    let wrapped = WcagError::from(AnalysisFailure::Cancelled);
    assert_eq!(wrapped.to_string(), "Analysis cancelled");
    assert_eq!(wrapped.exit_code(), 130);
}

#[test]
fn test_failure_report_is_localized() {
    let formatter = ReportFormatter::new(ReportLanguage::Turkish, false, false);
    let text = formatter.format_failure(&AnalysisFailure::NoElementContext);

    assert!(text.starts_with("ANALİZ HATASI"));
    assert!(text.contains("Öğe bilgisi alınamadı."));
}

#[tokio::test]
async fn test_cli_returns_exit_code_for_empty_element() {
    let cli = Cli::try_parse_from(["wcag-reporter", "-l", "en", "analyze", "--retries", "0"]).unwrap();

    let code = CliHandler::new(cli).run().await.unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn test_cli_returns_exit_code_for_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let cli = Cli::try_parse_from([
        "wcag-reporter",
        "-u",
        url.as_str(),
        "-l",
        "en",
        "analyze",
        "--role",
        "button",
        "--retries",
        "0",
    ])
    .unwrap();
    assert_eq!(CliHandler::new(cli).run().await.unwrap(), 5);

    let cli = Cli::try_parse_from(["wcag-reporter", "-u", url.as_str(), "test-connection"]).unwrap();
    assert_eq!(CliHandler::new(cli).run().await.unwrap(), 5);
}
