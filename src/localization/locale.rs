use crate::models::{AnalysisConfig, ReportLanguage};
use std::env;

const LOCALE_VARS: [&str; 4] = ["LC_ALL", "LC_MESSAGES", "LANG", "LANGUAGE"];

pub struct LocaleDetector;

impl LocaleDetector {
    /// Resolves the configured output language, consulting the system locale
    /// only when the configuration says `Auto`.
    pub fn resolve_output_language(config: &AnalysisConfig) -> ReportLanguage {
        config
            .output_language
            .explicit()
            .unwrap_or_else(Self::detect_system_locale)
    }

    /// Detect the system locale and return the matching report language
    pub fn detect_system_locale() -> ReportLanguage {
        for var in &LOCALE_VARS {
            if let Ok(locale) = env::var(var) {
                if let Some(lang) = Self::parse_locale(&locale) {
                    return lang;
                }
            }
        }

        ReportLanguage::English
    }

    /// Parse a locale string and extract the language.
    ///
    /// Handles `tr_TR.UTF-8`, `tr`, `Turkish_Turkey.1254`, `en_US`, `C` and `POSIX`.
    /// `LANGUAGE` may hold a colon-separated list; the first entry decides.
    fn parse_locale(locale: &str) -> Option<ReportLanguage> {
        let first = locale.split(':').next().unwrap_or(locale);
        let locale_lower = first.trim().to_lowercase();

        if locale_lower.starts_with("tr")
            || locale_lower.contains("turkish")
            || locale_lower.contains("türkçe")
        {
            return Some(ReportLanguage::Turkish);
        }

        if locale_lower.starts_with("en")
            || locale_lower.contains("english")
            || locale_lower == "c"
            || locale_lower.starts_with("c.")
            || locale_lower == "posix"
        {
            return Some(ReportLanguage::English);
        }

        None
    }

    /// Get the current system locale variables for debugging
    pub fn get_system_locale_info() -> String {
        LOCALE_VARS
            .iter()
            .map(|var| match env::var(var) {
                Ok(value) => format!("{}={}", var, value),
                Err(_) => format!("{}=(not set)", var),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
