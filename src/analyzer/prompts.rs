use crate::localization::{LocaleDetector, LocalizedStrings};
use crate::models::{AnalysisConfig, ElementContext, ReportLanguage};

/// Characters of HTML kept in the prompt before truncation.
pub const MAX_HTML_CHARS: usize = 4000;

/// Section labels the model is asked to use; the parser keys on them.
pub const SECTION_SUMMARY: &str = "Summary";
pub const SECTION_SCREEN_READER: &str = "Screen-reader experience";
pub const SECTION_ISSUES: &str = "Issues";
pub const SECTION_SUGGESTIONS: &str = "Suggestions";

/// The complete text sent to the model for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    language: ReportLanguage,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> ReportLanguage {
        self.language
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(element: &ElementContext, config: &AnalysisConfig) -> Prompt {
        let language = LocaleDetector::resolve_output_language(config);
        Self::build_for_language(element, config, language)
    }

    pub fn build_for_language(
        element: &ElementContext,
        config: &AnalysisConfig,
        language: ReportLanguage,
    ) -> Prompt {
        let system = Self::build_system_prompt(config, language);
        let user = Self::build_user_prompt(element, language);

        Prompt {
            text: format!("{}\n\n{}", system, user),
            language,
        }
    }

    pub fn build_system_prompt(config: &AnalysisConfig, language: ReportLanguage) -> String {
        let version = config.wcag_version.as_str();
        let level = config.level.as_str();

        let persona = match config.custom_prompt() {
            Some(custom) => custom
                .replace("{version}", version)
                .replace("{level}", level),
            None => Self::default_persona(version, level, language),
        };

        format!(
            "{}\n\n{}\n\nOUTPUT LANGUAGE: {}\nWrite the content of every section in {}, but keep the four section labels exactly as written above.",
            persona,
            Self::response_format_instructions(config),
            language.as_llm_language(),
            language.as_llm_language()
        )
    }

    fn default_persona(version: &str, level: &str, language: ReportLanguage) -> String {
        match language {
            ReportLanguage::English => format!(
                r#"You are a WCAG {version} accessibility auditor evaluating at conformance level {level}.
Analyze the single user-interface element described below against the WCAG {version} success criteria up to level {level}.
Base every finding on a specific success criterion, be concrete, and briefly explain technical terms."#
            ),
            ReportLanguage::Turkish => format!(
                r#"Sen WCAG {version} standardına göre {level} uygunluk seviyesinde değerlendirme yapan bir erişilebilirlik denetçisisin (WCAG {version} accessibility auditor evaluating at conformance level {level}).
Aşağıda tanımlanan tek kullanıcı arayüzü öğesini WCAG {version} başarı kriterlerine göre {level} seviyesine kadar analiz et.
Her bulguyu belirli bir başarı kriterine dayandır, somut ol ve teknik terimleri kısaca açıkla."#
            ),
        }
    }

    fn response_format_instructions(config: &AnalysisConfig) -> String {
        let issue_line = if config.include_severity {
            "1. [Severity] <WCAG criterion number, e.g. 1.1.1> - <description of the problem>"
        } else {
            "1. <WCAG criterion number, e.g. 1.1.1> - <description of the problem>"
        };

        let mut issue_rules = Vec::new();
        if config.include_severity {
            issue_rules.push(
                "Severity is exactly one of Critical, Serious, Moderate, Minor. List the most severe issues first.",
            );
        } else {
            issue_rules.push("Do not rate severity. List the most important issues first.");
        }
        if config.include_code_suggestions {
            issue_rules.push(
                "Under each issue, give the corrected markup in a fenced ```html code block.",
            );
        } else {
            issue_rules.push("Do not include code in the issues.");
        }
        issue_rules.push("If the element has no issues, write \"None\" under Issues.");

        let suggestions_line = if config.include_code_suggestions {
            "- <general improvement, with example code where it helps>"
        } else {
            "- <general improvement described in plain language, without code>"
        };

        format!(
            r#"RESPONSE FORMAT:
Answer with exactly these four sections, in this order. Start each section with its label on its own line.

{summary}:
<one or two sentences describing the element and its overall accessibility>

{screen_reader}:
<how a screen-reader user perceives and operates this element>

{issues}:
{issue_line}

{suggestions}:
{suggestions_line}

RULES FOR ISSUES:
{rules}"#,
            summary = SECTION_SUMMARY,
            screen_reader = SECTION_SCREEN_READER,
            issues = SECTION_ISSUES,
            suggestions = SECTION_SUGGESTIONS,
            issue_line = issue_line,
            suggestions_line = suggestions_line,
            rules = issue_rules
                .iter()
                .map(|rule| format!("- {}", rule))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn build_user_prompt(element: &ElementContext, language: ReportLanguage) -> String {
        let strings = LocalizedStrings::new(language);
        let labels = UserLabels::for_language(language);
        let none = strings.get("prompt_none");

        let mut lines = vec![labels.heading.to_string()];
        lines.push(format!("{}: {}", labels.role, non_empty_or(&element.role, none)));
        lines.push(format!("{}: {}", labels.name, non_empty_or(&element.name, none)));

        // BTreeSet iteration is sorted, which keeps the prompt stable.
        let states = element.states.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(format!("{}: {}", labels.states, non_empty_or(&states, none)));

        if let Some(description) = element.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(format!("{}: {}", labels.description, description.trim()));
        }
        if let Some(value) = element.value.as_deref().filter(|v| !v.trim().is_empty()) {
            lines.push(format!("{}: {}", labels.value, value.trim()));
        }

        if element.has_html() {
            let html = Self::truncate_html(&element.html);
            lines.push(format!("{}:\n```html\n{}\n```", labels.html, html));
        } else {
            lines.push(format!("{}: {}", labels.html, strings.get("prompt_not_available")));
            lines.push(format!(
                "{}:\n```html\n{}\n```",
                labels.approximate,
                element.approximate_markup()
            ));
        }

        lines.push(String::new());
        lines.push(labels.closing.to_string());

        lines.join("\n")
    }

    /// Caps the snippet at [`MAX_HTML_CHARS`] characters, appending a marker.
    pub fn truncate_html(html: &str) -> String {
        let html = html.trim();
        let total_chars = html.chars().count();

        if total_chars <= MAX_HTML_CHARS {
            return html.to_string();
        }

        let excerpt: String = html.chars().take(MAX_HTML_CHARS).collect();
        format!(
            "{}\n[... TRUNCATED - showing first {} characters of {} total ...]",
            excerpt, MAX_HTML_CHARS, total_chars
        )
    }
}

struct UserLabels {
    heading: &'static str,
    role: &'static str,
    name: &'static str,
    states: &'static str,
    description: &'static str,
    value: &'static str,
    html: &'static str,
    approximate: &'static str,
    closing: &'static str,
}

impl UserLabels {
    fn for_language(language: ReportLanguage) -> Self {
        match language {
            ReportLanguage::English => Self {
                heading: "ELEMENT UNDER ANALYSIS",
                role: "Role",
                name: "Accessible name",
                states: "States",
                description: "Description",
                value: "Value",
                html: "HTML snippet",
                approximate: "Approximate markup (derived from accessibility properties)",
                closing: "Provide the WCAG analysis of this element now.",
            },
            ReportLanguage::Turkish => Self {
                heading: "ANALİZ EDİLECEK ÖĞE",
                role: "Rol",
                name: "Erişilebilir ad",
                states: "Durumlar",
                description: "Açıklama",
                value: "Değer",
                html: "HTML kodu",
                approximate: "Yaklaşık işaretleme (erişilebilirlik özelliklerinden türetildi)",
                closing: "Şimdi bu öğenin WCAG analizini yap.",
            },
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
