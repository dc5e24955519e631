use crate::error::WcagError;
use crate::localization::LocaleDetector;
use crate::models::config::{DEFAULT_MODEL, DEFAULT_SERVER_URL};
use crate::models::{
    AnalysisConfig, ConformanceLevel, ElementContext, OutputLanguage, ReportLanguage, WcagVersion,
};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const LANGUAGE_ENV: &str = "WCAG_REPORTER_LANGUAGE";

#[derive(Parser, Debug)]
#[command(name = "wcag-reporter")]
#[command(about = "WCAG accessibility reports for a single UI element, reasoned by a local model server")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the Ollama-compatible model server
    #[arg(short = 'u', long, global = true, env = "WCAG_REPORTER_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,

    /// Model used for the analysis
    #[arg(short = 'm', long, global = true, env = "WCAG_REPORTER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum time to wait for the model in seconds (1-600)
    #[arg(short = 't', long, global = true, env = "WCAG_REPORTER_TIMEOUT", default_value = "120", value_parser = validate_timeout)]
    pub timeout: u64,

    /// Report language (auto, english, turkish)
    /// If set to auto, the language follows the system locale
    #[arg(short = 'l', long, global = true, default_value = "auto")]
    pub output_lang: String,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable debug output including model server traffic
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one element and print the WCAG report
    Analyze(AnalyzeArgs),
    /// List the models installed on the server
    Models,
    /// Check that the model server is reachable
    TestConnection,
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// JSON file describing the element, or "-" to read it from stdin
    #[arg(short = 'e', long, conflicts_with_all = ["role", "name", "html", "states", "description", "value"])]
    pub element: Option<PathBuf>,

    /// Accessible role of the element (button, link, ...)
    #[arg(long)]
    pub role: Option<String>,

    /// Accessible name of the element
    #[arg(long)]
    pub name: Option<String>,

    /// HTML snippet of the element
    #[arg(long)]
    pub html: Option<String>,

    /// State flag such as focused or checked; repeatable
    #[arg(long = "state")]
    pub states: Vec<String>,

    /// Accessible description
    #[arg(long)]
    pub description: Option<String>,

    /// Current value, for inputs and sliders
    #[arg(long)]
    pub value: Option<String>,

    /// WCAG version (2.0, 2.1, 2.2)
    #[arg(long = "wcag", default_value = "2.2")]
    pub wcag_version: String,

    /// Conformance level (A, AA, AAA)
    #[arg(long, default_value = "AA")]
    pub level: String,

    /// Do not ask the model for severity ratings
    #[arg(long)]
    pub no_severity: bool,

    /// Do not ask the model for code fixes
    #[arg(long)]
    pub no_code: bool,

    /// Replacement auditor instructions; {version} and {level} are filled in
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Extra attempts after a timeout or connection failure
    #[arg(long, default_value = "1")]
    pub retries: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse_args() -> Result<Self, WcagError> {
        let cli = match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(WcagError::InvalidArguments(e.to_string())),
        };

        cli.validate()?;

        Ok(cli)
    }

    pub fn validate(&self) -> Result<(), WcagError> {
        if !(1..=600).contains(&self.timeout) {
            return Err(WcagError::InvalidArguments(
                "Timeout must be between 1 and 600 seconds".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(WcagError::InvalidArguments(
                "Model name cannot be empty".to_string(),
            ));
        }

        self.get_output_language()?;

        if let Command::Analyze(args) = &self.command {
            args.wcag()?;
        }

        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "wcag_reporter=debug"
        } else if self.verbose {
            "wcag_reporter=info"
        } else {
            "warn"
        }
    }

    pub fn should_use_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err()
    }

    pub fn get_output_language(&self) -> Result<OutputLanguage, WcagError> {
        // Priority 1: Environment variable override
        if let Ok(env_lang) = std::env::var(LANGUAGE_ENV) {
            return OutputLanguage::from_str(&env_lang).map_err(WcagError::InvalidArguments);
        }

        // Priority 2: CLI option; auto falls through to the system locale
        OutputLanguage::from_str(&self.output_lang).map_err(WcagError::InvalidArguments)
    }

    /// The language used for the report, with `auto` resolved against the locale.
    pub fn report_language(&self) -> Result<ReportLanguage, WcagError> {
        Ok(self
            .get_output_language()?
            .explicit()
            .unwrap_or_else(LocaleDetector::detect_system_locale))
    }

    /// Configuration shared by every subcommand.
    pub fn base_config(&self) -> Result<AnalysisConfig, WcagError> {
        Ok(AnalysisConfig::default()
            .with_server_url(self.url.trim())
            .with_model(self.model.trim())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_output_language(self.get_output_language()?))
    }

    pub fn analysis_config(&self, args: &AnalyzeArgs) -> Result<AnalysisConfig, WcagError> {
        let (version, level) = args.wcag()?;
        let mut config = self
            .base_config()?
            .with_wcag(version, level)
            .with_severity(!args.no_severity)
            .with_code_suggestions(!args.no_code);

        if let Some(prompt) = &args.system_prompt {
            config = config.with_custom_system_prompt(prompt.clone());
        }

        Ok(config)
    }

    /// Get debug information about language detection
    pub fn get_language_debug_info(&self) -> String {
        let mut info = Vec::new();

        match std::env::var(LANGUAGE_ENV) {
            Ok(value) => info.push(format!("{}={}", LANGUAGE_ENV, value)),
            Err(_) => info.push(format!("{}=(not set)", LANGUAGE_ENV)),
        }

        info.push(format!("CLI --output-lang={}", self.output_lang));
        info.push(format!("System locale: {}", LocaleDetector::get_system_locale_info()));

        match self.report_language() {
            Ok(lang) => info.push(format!("Report language: {}", lang.as_str())),
            Err(e) => info.push(format!("Language detection error: {}", e)),
        }

        info.join("\n")
    }
}

impl AnalyzeArgs {
    pub fn wcag(&self) -> Result<(WcagVersion, ConformanceLevel), WcagError> {
        let version =
            WcagVersion::from_str(&self.wcag_version).map_err(WcagError::InvalidArguments)?;
        let level = ConformanceLevel::from_str(&self.level).map_err(WcagError::InvalidArguments)?;
        Ok((version, level))
    }

    /// Reads the element from `--element` (file or stdin) or from the flags.
    pub fn load_element(&self) -> Result<ElementContext, WcagError> {
        match &self.element {
            Some(path) if path.as_os_str() == "-" => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Self::parse_element_json(&buffer)
            }
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::parse_element_json(&content)
            }
            None => Ok(self.element_from_flags()),
        }
    }

    pub fn parse_element_json(content: &str) -> Result<ElementContext, WcagError> {
        if content.trim().is_empty() {
            return Ok(ElementContext::default());
        }
        Ok(serde_json::from_str(content)?)
    }

    fn element_from_flags(&self) -> ElementContext {
        let mut element = ElementContext::new(
            self.role.clone().unwrap_or_default(),
            self.name.clone().unwrap_or_default(),
        );

        if let Some(html) = &self.html {
            element = element.with_html(html.clone());
        }
        for state in &self.states {
            element.add_state(state);
        }
        if let Some(description) = &self.description {
            element = element.with_description(description.clone());
        }
        if let Some(value) = &self.value {
            element = element.with_value(value.clone());
        }

        element
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.trim().parse().map_err(|_| "Timeout must be a number")?;

    if (1..=600).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 1 and 600 seconds".to_string())
    }
}
