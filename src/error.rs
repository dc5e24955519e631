use std::time::Duration;
use thiserror::Error;

/// Failures raised by a [`ModelServerClient`](crate::analyzer::ModelServerClient).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Model server unreachable at {url}: {detail}")]
    Connection { url: String, detail: String },

    #[error("Model '{model}' is not available on the server")]
    ModelNotFound { model: String },

    #[error("Model server did not answer within {} ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("Model server error{}: {detail}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Server { status: Option<u16>, detail: String },

    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Transient failures that a fresh attempt may fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Connection { .. } | ClientError::Timeout { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Model response is empty")]
    EmptyResponse,

    #[error("Model response has no summary section")]
    MissingSummary,
}

/// Every way a single analysis can end without a report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFailure {
    #[error("No element context: both accessible name and role are empty")]
    NoElementContext,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Model server unreachable at {url}: {detail}")]
    Connection { url: String, detail: String },

    #[error("Model '{model}' is not available on the server")]
    ModelNotFound { model: String },

    #[error("Model server did not answer within {} ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("Model server error{}: {detail}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Server { status: Option<u16>, detail: String },

    #[error("Could not parse model response: {0}")]
    Parse(#[from] ParseError),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl From<ClientError> for AnalysisFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Connection { url, detail } => AnalysisFailure::Connection { url, detail },
            ClientError::ModelNotFound { model } => AnalysisFailure::ModelNotFound { model },
            ClientError::Timeout { timeout } => AnalysisFailure::Timeout { timeout },
            ClientError::Server { status, detail } => AnalysisFailure::Server { status, detail },
            ClientError::Cancelled => AnalysisFailure::Cancelled,
        }
    }
}

impl AnalysisFailure {
    pub fn exit_code(&self) -> i32 {
        match self {
            AnalysisFailure::InvalidConfig(_) => 2,
            AnalysisFailure::NoElementContext => 3,
            AnalysisFailure::Timeout { .. } => 4,
            AnalysisFailure::Connection { .. } | AnalysisFailure::Server { .. } => 5,
            AnalysisFailure::ModelNotFound { .. } => 6,
            AnalysisFailure::Parse(_) => 7,
            AnalysisFailure::Cancelled => 130,
        }
    }
}

#[derive(Error, Debug)]
pub enum WcagError {
    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl WcagError {
    pub fn exit_code(&self) -> i32 {
        match self {
            WcagError::InvalidArguments(_) => 2,
            WcagError::Analysis(failure) => failure.exit_code(),
            WcagError::Client(err) => AnalysisFailure::from(err.clone()).exit_code(),
            WcagError::IoError(_) | WcagError::SerializationError(_) => 1,
        }
    }
}
