use crate::analyzer::llm_client::{ModelServerClient, OllamaClient};
use crate::analyzer::parser::ResponseParser;
use crate::analyzer::prompts::{Prompt, PromptBuilder};
use crate::error::{AnalysisFailure, ClientError};
use crate::models::{AnalysisConfig, AnalysisReport, ElementContext, RawModelResponse};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    Building,
    Requesting,
    Parsing,
    Done,
    Failed,
}

impl AnalysisState {
    fn rank(&self) -> u8 {
        match self {
            AnalysisState::Idle => 0,
            AnalysisState::Building => 1,
            AnalysisState::Requesting => 2,
            AnalysisState::Parsing => 3,
            AnalysisState::Done | AnalysisState::Failed => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Done | AnalysisState::Failed)
    }
}

/// State history of a single analysis. Transitions only move forward.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    history: Vec<AnalysisState>,
    attempts: u32,
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRun {
    pub fn new() -> Self {
        Self {
            history: vec![AnalysisState::Idle],
            attempts: 0,
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.history
            .last()
            .copied()
            .unwrap_or(AnalysisState::Idle)
    }

    pub fn history(&self) -> &[AnalysisState] {
        &self.history
    }

    /// Completion requests sent so far, retries included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn advance(&mut self, next: AnalysisState) {
        let current = self.state();
        if current.is_terminal() || current == next {
            return;
        }
        if next.rank() < current.rank() {
            warn!(?current, ?next, "ignoring backward state transition");
            return;
        }
        debug!(from = ?current, to = ?next, "analysis state change");
        self.history.push(next);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// `attempt` is 1-based: the number of requests sent including this one.
    pub fn classify(
        &self,
        result: Result<RawModelResponse, ClientError>,
        attempt: u32,
    ) -> AttemptOutcome {
        match result {
            Ok(raw) => AttemptOutcome::Completed(raw),
            Err(err) if err.is_transient() && attempt <= self.max_retries => {
                AttemptOutcome::Retry(err)
            }
            Err(err) => AttemptOutcome::GiveUp(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Completed(RawModelResponse),
    Retry(ClientError),
    GiveUp(ClientError),
}

/// Drives one element through prompt, request and parse.
///
/// Holds no per-analysis state, so a single orchestrator can serve concurrent
/// analyses.
pub struct AnalysisOrchestrator<C: ModelServerClient> {
    client: C,
    retry: RetryPolicy,
}

impl AnalysisOrchestrator<OllamaClient> {
    pub fn for_config(config: &AnalysisConfig) -> Result<Self, AnalysisFailure> {
        let client = OllamaClient::from_config(config)?;
        Ok(Self::new(client))
    }
}

impl<C: ModelServerClient> AnalysisOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub async fn analyze(
        &self,
        element: &ElementContext,
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisFailure> {
        let mut run = AnalysisRun::new();
        self.analyze_tracked(element, config, cancel, &mut run).await
    }

    /// Like [`analyze`](Self::analyze), recording every state into `run`.
    pub async fn analyze_tracked(
        &self,
        element: &ElementContext,
        config: &AnalysisConfig,
        cancel: &CancellationToken,
        run: &mut AnalysisRun,
    ) -> Result<AnalysisReport, AnalysisFailure> {
        let result = self.drive(element, config, cancel, run).await;

        match &result {
            Ok(report) => {
                run.advance(AnalysisState::Done);
                info!(
                    issues = report.issue_count(),
                    attempts = run.attempts(),
                    elapsed_ms = report.elapsed_ms,
                    "analysis finished"
                );
            }
            Err(failure) => {
                run.advance(AnalysisState::Failed);
                warn!(error = %failure, attempts = run.attempts(), "analysis failed");
            }
        }

        result
    }

    async fn drive(
        &self,
        element: &ElementContext,
        config: &AnalysisConfig,
        cancel: &CancellationToken,
        run: &mut AnalysisRun,
    ) -> Result<AnalysisReport, AnalysisFailure> {
        run.advance(AnalysisState::Building);
        if cancel.is_cancelled() {
            return Err(AnalysisFailure::Cancelled);
        }

        config.validate()?;
        if element.is_empty() {
            return Err(AnalysisFailure::NoElementContext);
        }

        let prompt = PromptBuilder::build(element, config);
        debug!(
            role = %element.role,
            language = prompt.language().as_str(),
            prompt_chars = prompt.len(),
            "prompt built"
        );

        run.advance(AnalysisState::Requesting);
        let raw = self.request_with_retry(&prompt, config, cancel, run).await?;

        run.advance(AnalysisState::Parsing);
        if cancel.is_cancelled() {
            return Err(AnalysisFailure::Cancelled);
        }

        Ok(ResponseParser::parse(&raw, config)?)
    }

    async fn request_with_retry(
        &self,
        prompt: &Prompt,
        config: &AnalysisConfig,
        cancel: &CancellationToken,
        run: &mut AnalysisRun,
    ) -> Result<RawModelResponse, AnalysisFailure> {
        loop {
            run.attempts += 1;
            let attempt = run.attempts;
            info!(attempt, model = %config.model, "requesting analysis");

            let result = self
                .client
                .complete(prompt, &config.model, config.timeout, cancel)
                .await;

            match self.retry.classify(result, attempt) {
                AttemptOutcome::Completed(raw) => return Ok(raw),
                AttemptOutcome::GiveUp(err) => return Err(err.into()),
                AttemptOutcome::Retry(err) => {
                    warn!(
                        attempt,
                        error = %err,
                        backoff_ms = self.retry.backoff.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(AnalysisFailure::Cancelled),
                        _ = tokio::time::sleep(self.retry.backoff) => {}
                    }
                }
            }
        }
    }
}

/// Analyzes one element against the configured Ollama server.
pub async fn run_analysis(
    element: ElementContext,
    config: AnalysisConfig,
) -> Result<AnalysisReport, AnalysisFailure> {
    run_analysis_with_cancel(element, config, CancellationToken::new()).await
}

pub async fn run_analysis_with_cancel(
    element: ElementContext,
    config: AnalysisConfig,
    cancel: CancellationToken,
) -> Result<AnalysisReport, AnalysisFailure> {
    let orchestrator = AnalysisOrchestrator::for_config(&config)?;
    orchestrator.analyze(&element, &config, &cancel).await
}

pub async fn test_connection(config: &AnalysisConfig) -> bool {
    match OllamaClient::from_config(config) {
        Ok(client) => client.check_connectivity().await,
        Err(err) => {
            debug!(error = %err, "could not create client");
            false
        }
    }
}

pub async fn fetch_available_models(
    config: &AnalysisConfig,
) -> Result<BTreeSet<String>, ClientError> {
    OllamaClient::from_config(config)?.list_models().await
}
