pub mod analyzer;
pub mod cli;
pub mod error;
pub mod localization;
pub mod models;

pub use error::{AnalysisFailure, ClientError, ParseError, WcagError};

// Re-export commonly used types
pub use models::{
    AnalysisConfig, AnalysisReport, ConformanceLevel, ElementContext, Issue, OutputLanguage,
    RawModelResponse, ReportLanguage, Severity, WcagVersion,
};

pub use analyzer::{
    fetch_available_models, run_analysis, run_analysis_with_cancel, test_connection,
    AnalysisOrchestrator, ModelServerClient, OllamaClient, PromptBuilder, ResponseParser,
};

pub use cli::CliHandler;
