// Analyzer module - prompt construction, model server access and report parsing

pub mod llm_client;
pub mod orchestrator;
pub mod parser;
pub mod prompts;

pub use llm_client::{model_is_available, ModelServerClient, OllamaClient, HEALTH_CHECK_TIMEOUT};
pub use orchestrator::{
    fetch_available_models, run_analysis, run_analysis_with_cancel, test_connection,
    AnalysisOrchestrator, AnalysisRun, AnalysisState, AttemptOutcome, RetryPolicy,
};
pub use parser::{ResponseParser, Sections};
pub use prompts::{Prompt, PromptBuilder, MAX_HTML_CHARS};
