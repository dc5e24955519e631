use crate::error::AnalysisFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagVersion {
    #[serde(rename = "2.0")]
    V2_0,
    #[serde(rename = "2.1")]
    V2_1,
    #[serde(rename = "2.2")]
    V2_2,
}

impl WcagVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            WcagVersion::V2_0 => "2.0",
            WcagVersion::V2_1 => "2.1",
            WcagVersion::V2_2 => "2.2",
        }
    }
}

impl FromStr for WcagVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.0" | "2" => Ok(WcagVersion::V2_0),
            "2.1" => Ok(WcagVersion::V2_1),
            "2.2" => Ok(WcagVersion::V2_2),
            other => Err(format!("unsupported WCAG version '{}' (expected 2.0, 2.1 or 2.2)", other)),
        }
    }
}

impl fmt::Display for WcagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConformanceLevel {
    A,
    AA,
    AAA,
}

impl ConformanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConformanceLevel::A => "A",
            ConformanceLevel::AA => "AA",
            ConformanceLevel::AAA => "AAA",
        }
    }
}

impl FromStr for ConformanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(ConformanceLevel::A),
            "AA" => Ok(ConformanceLevel::AA),
            "AAA" => Ok(ConformanceLevel::AAA),
            other => Err(format!("unsupported conformance level '{}' (expected A, AA or AAA)", other)),
        }
    }
}

impl fmt::Display for ConformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language requested by the user; `Auto` defers to the system locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputLanguage {
    Auto,
    English,
    Turkish,
}

impl OutputLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputLanguage::Auto => "auto",
            OutputLanguage::English => "english",
            OutputLanguage::Turkish => "turkish",
        }
    }

    /// `None` for `Auto`, which needs a locale to resolve.
    pub fn explicit(&self) -> Option<ReportLanguage> {
        match self {
            OutputLanguage::Auto => None,
            OutputLanguage::English => Some(ReportLanguage::English),
            OutputLanguage::Turkish => Some(ReportLanguage::Turkish),
        }
    }
}

impl FromStr for OutputLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(OutputLanguage::Auto),
            "english" | "en" => Ok(OutputLanguage::English),
            "turkish" | "tr" | "türkçe" | "turkce" => Ok(OutputLanguage::Turkish),
            other => Err(format!("unsupported output language '{}' (expected auto, english or turkish)", other)),
        }
    }
}

/// A concrete language the report and prompt are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLanguage {
    English,
    Turkish,
}

impl ReportLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportLanguage::English => "english",
            ReportLanguage::Turkish => "turkish",
        }
    }

    pub fn as_llm_language(&self) -> &'static str {
        match self {
            ReportLanguage::English => "English",
            ReportLanguage::Turkish => "Turkish",
        }
    }
}

/// Read-only settings snapshot for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub server_url: String,
    pub model: String,
    pub wcag_version: WcagVersion,
    pub level: ConformanceLevel,
    pub output_language: OutputLanguage,
    pub include_code_suggestions: bool,
    pub include_severity: bool,
    pub timeout: Duration,
    pub custom_system_prompt: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            wcag_version: WcagVersion::V2_2,
            level: ConformanceLevel::AA,
            output_language: OutputLanguage::Auto,
            include_code_suggestions: true,
            include_severity: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            custom_system_prompt: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_wcag(mut self, version: WcagVersion, level: ConformanceLevel) -> Self {
        self.wcag_version = version;
        self.level = level;
        self
    }

    pub fn with_output_language(mut self, language: OutputLanguage) -> Self {
        self.output_language = language;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_severity(mut self, include: bool) -> Self {
        self.include_severity = include;
        self
    }

    pub fn with_code_suggestions(mut self, include: bool) -> Self {
        self.include_code_suggestions = include;
        self
    }

    pub fn with_custom_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_system_prompt = Some(prompt.into());
        self
    }

    /// The custom system prompt, ignoring blank overrides.
    pub fn custom_prompt(&self) -> Option<&str> {
        self.custom_system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn validate(&self) -> Result<(), AnalysisFailure> {
        let url = reqwest::Url::parse(self.server_url.trim()).map_err(|e| {
            AnalysisFailure::InvalidConfig(format!("server URL '{}' is not valid: {}", self.server_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(AnalysisFailure::InvalidConfig(format!(
                "server URL '{}' must be an http or https URL",
                self.server_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AnalysisFailure::InvalidConfig(
                "model identifier cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(AnalysisFailure::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
