use crate::error::{AnalysisFailure, ParseError};
use crate::models::{ReportLanguage, Severity};

pub mod locale;
pub mod strings;

pub use locale::LocaleDetector;

pub struct LocalizedStrings {
    pub language: ReportLanguage,
}

impl LocalizedStrings {
    pub fn new(language: ReportLanguage) -> Self {
        Self { language }
    }

    pub fn get(&self, key: &str) -> &'static str {
        match self.language {
            ReportLanguage::English => strings::ENGLISH_STRINGS.get(key).copied().unwrap_or(""),
            ReportLanguage::Turkish => strings::TURKISH_STRINGS.get(key).copied().unwrap_or(""),
        }
    }

    /// Looks up `key` and substitutes `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.get(key).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    pub fn severity(&self, severity: Severity) -> &'static str {
        self.get(&format!("severity_{}", severity.as_str()))
    }

    pub fn section(&self, section: &str) -> &'static str {
        self.get(&format!("section_{}", section))
    }

    /// One actionable message per failure kind.
    pub fn failure_message(&self, failure: &AnalysisFailure) -> String {
        match failure {
            AnalysisFailure::NoElementContext => self.get("failure_no_element").to_string(),
            AnalysisFailure::InvalidConfig(detail) => {
                self.format("failure_invalid_config", &[("detail", detail.as_str())])
            }
            AnalysisFailure::Connection { url, .. } => {
                self.format("failure_connection", &[("url", url.as_str())])
            }
            AnalysisFailure::ModelNotFound { model } => {
                self.format("failure_model_not_found", &[("model", model.as_str())])
            }
            AnalysisFailure::Timeout { timeout } => {
                let seconds = format!("{:.0}", timeout.as_secs_f64().ceil());
                self.format("failure_timeout", &[("seconds", seconds.as_str())])
            }
            AnalysisFailure::Server { status: Some(404), .. } => {
                self.get("failure_endpoint_missing").to_string()
            }
            AnalysisFailure::Server { status, detail } => {
                let detail = match status {
                    Some(code) => format!("HTTP {} {}", code, detail),
                    None => detail.clone(),
                };
                self.format("failure_server", &[("detail", detail.trim())])
            }
            AnalysisFailure::Parse(ParseError::MissingSummary) => {
                self.get("failure_parse_summary").to_string()
            }
            AnalysisFailure::Parse(ParseError::EmptyResponse) => {
                self.get("failure_parse_empty").to_string()
            }
            AnalysisFailure::Cancelled => self.get("failure_cancelled").to_string(),
        }
    }
}
