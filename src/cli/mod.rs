pub mod args;
pub mod plain_text;
pub mod reporter;

pub use args::{AnalyzeArgs, Cli, Command};
pub use plain_text::PlainTextConverter;
pub use reporter::ReportFormatter;

use crate::analyzer::{
    fetch_available_models, test_connection, AnalysisOrchestrator, RetryPolicy,
};
use crate::error::{AnalysisFailure, WcagError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct CliHandler {
    cli: Cli,
    cancel: CancellationToken,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self::with_cancellation(cli, CancellationToken::new())
    }

    pub fn with_cancellation(cli: Cli, cancel: CancellationToken) -> Self {
        Self { cli, cancel }
    }

    /// Runs the selected subcommand and returns the process exit code.
    pub async fn run(&self) -> Result<i32, WcagError> {
        if self.cli.is_debug() {
            debug!("{}", self.cli.get_language_debug_info());
        }

        match &self.cli.command {
            Command::Analyze(args) => self.analyze(args).await,
            Command::Models => self.list_models().await,
            Command::TestConnection => self.check_connection().await,
        }
    }

    async fn analyze(&self, args: &AnalyzeArgs) -> Result<i32, WcagError> {
        let config = self.cli.analysis_config(args)?;
        let element = args.load_element()?;
        let formatter = ReportFormatter::for_cli(&self.cli)?;

        if self.cli.is_verbose() {
            eprintln!("{}", formatter.format_progress(formatter.strings().get("progress_start")));
        }
        info!(
            role = %element.role,
            name = %element.name,
            model = %config.model,
            server = %config.server_url,
            "starting analysis"
        );

        let orchestrator = AnalysisOrchestrator::for_config(&config)?.with_retry_policy(RetryPolicy {
            max_retries: args.retries,
            ..RetryPolicy::default()
        });

        match orchestrator.analyze(&element, &config, &self.cancel).await {
            Ok(report) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", formatter.format_analysis_report(&report, &config));
                }
                if self.cli.is_verbose() {
                    eprintln!("{}", formatter.format_progress(formatter.strings().get("progress_done")));
                }
                Ok(0)
            }
            Err(failure) => Ok(self.report_failure(&formatter, &failure)),
        }
    }

    async fn list_models(&self) -> Result<i32, WcagError> {
        let config = self.cli.base_config()?;
        let formatter = ReportFormatter::for_cli(&self.cli)?;

        if self.cli.is_verbose() {
            eprintln!("{}", formatter.format_progress(formatter.strings().get("progress_connecting")));
        }

        match fetch_available_models(&config).await {
            Ok(models) => {
                println!("{}", formatter.format_models(&models, &config.model));
                Ok(0)
            }
            Err(err) => Ok(self.report_failure(&formatter, &AnalysisFailure::from(err))),
        }
    }

    async fn check_connection(&self) -> Result<i32, WcagError> {
        let config = self.cli.base_config()?;
        let formatter = ReportFormatter::for_cli(&self.cli)?;

        if test_connection(&config).await {
            println!("{}", formatter.format_connection(true, &config.server_url));
            Ok(0)
        } else {
            eprintln!("{}", formatter.format_connection(false, &config.server_url));
            Ok(5)
        }
    }

    fn report_failure(&self, formatter: &ReportFormatter, failure: &AnalysisFailure) -> i32 {
        eprintln!("{}", formatter.format_failure(failure));
        failure.exit_code()
    }
}
