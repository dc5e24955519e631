use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
        }
    }

    /// Maps a single word emitted by the model to a severity.
    ///
    /// Besides the four canonical names this accepts the Turkish terms and the
    /// High/Medium/Low scale that models often fall back to.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        match lower.as_str() {
            "critical" | "blocker" | "kritik" => Some(Severity::Critical),
            "serious" | "high" | "major" | "ciddi" | "yüksek" | "yuksek" => Some(Severity::Serious),
            "moderate" | "medium" | "orta" => Some(Severity::Moderate),
            "minor" | "low" | "düşük" | "dusuk" | "küçük" => Some(Severity::Minor),
            _ => None,
        }
    }
}

/// A single accessibility problem reported by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_suggestion: Option<String>,
}

/// Text returned by the model server for one completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelResponse {
    pub text: String,
    pub model: String,
    pub elapsed: Duration,
}

impl RawModelResponse {
    pub fn new(text: impl Into<String>, model: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            elapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub screen_reader_experience: String,
    /// In the order the model listed them.
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub model: String,
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn criteria(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|issue| issue.criterion.as_deref())
            .collect()
    }
}
