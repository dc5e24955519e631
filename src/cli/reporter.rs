use crate::analyzer::model_is_available;
use crate::cli::args::Cli;
use crate::cli::plain_text::PlainTextConverter;
use crate::error::{AnalysisFailure, WcagError};
use crate::localization::LocalizedStrings;
use crate::models::{AnalysisConfig, AnalysisReport, Issue, ReportLanguage, Severity};
use std::collections::BTreeSet;

const RESET: &str = "\x1b[0m";

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
    localized_strings: LocalizedStrings,
    converter: PlainTextConverter,
}

impl ReportFormatter {
    pub fn new(language: ReportLanguage, use_colors: bool, verbose: bool) -> Self {
        let localized_strings = LocalizedStrings::new(language);
        let converter = PlainTextConverter::new(&localized_strings);
        Self {
            use_colors,
            verbose,
            localized_strings,
            converter,
        }
    }

    pub fn for_cli(cli: &Cli) -> Result<Self, WcagError> {
        Ok(Self::new(
            cli.report_language()?,
            cli.should_use_color(),
            cli.is_verbose(),
        ))
    }

    pub fn strings(&self) -> &LocalizedStrings {
        &self.localized_strings
    }

    pub fn format_analysis_report(&self, report: &AnalysisReport, config: &AnalysisConfig) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header(report, config));
        output.push_str("\n\n");

        output.push_str(&self.format_verdict(report));
        output.push_str("\n\n");

        output.push_str(&self.format_section(
            self.localized_strings.section("summary"),
            &self.converter.convert(&report.summary),
        ));
        output.push_str("\n\n");

        let experience = if report.screen_reader_experience.trim().is_empty() {
            self.localized_strings.get("report_not_provided").to_string()
        } else {
            self.converter.convert(&report.screen_reader_experience)
        };
        output.push_str(&self.format_section(
            self.localized_strings.section("screen_reader"),
            &experience,
        ));
        output.push_str("\n\n");

        let issues = if report.issues.is_empty() {
            self.localized_strings.get("report_no_issues").to_string()
        } else {
            report
                .issues
                .iter()
                .enumerate()
                .map(|(i, issue)| self.format_issue(i + 1, issue))
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        output.push_str(&self.format_section(self.localized_strings.section("issues"), &issues));

        if !report.suggestions.is_empty() {
            let suggestions = report
                .suggestions
                .iter()
                .map(|suggestion| format!("• {}", self.converter.convert(suggestion)))
                .collect::<Vec<_>>()
                .join("\n");

            output.push_str("\n\n");
            output.push_str(&self.format_section(
                self.localized_strings.section("suggestions"),
                &suggestions,
            ));
        }

        output
    }

    fn format_header(&self, report: &AnalysisReport, config: &AnalysisConfig) -> String {
        let header_text = self.localized_strings.get("report_header");
        let details = format!(
            "{}: WCAG {} {} | {}: {} ({} ms)",
            self.localized_strings.get("report_standard"),
            config.wcag_version,
            config.level,
            self.localized_strings.get("report_model"),
            report.model,
            report.elapsed_ms
        );

        if self.use_colors {
            format!("\x1b[1m\x1b[36m═══ {} ═══{}\n{}", header_text, RESET, details)
        } else {
            format!("=== {} ===\n{}", header_text, details)
        }
    }

    fn format_verdict(&self, report: &AnalysisReport) -> String {
        let (color_code, text) = if report.passed() {
            ("\x1b[1m\x1b[32m", self.localized_strings.get("report_pass").to_string())
        } else {
            let count = report.issue_count().to_string();
            (
                "\x1b[1m\x1b[31m",
                self.localized_strings.format("report_fail", &[("count", count.as_str())]),
            )
        };

        if self.use_colors {
            format!("{}{}{}", color_code, text, RESET)
        } else {
            text
        }
    }

    fn format_issue(&self, number: usize, issue: &Issue) -> String {
        let mut heading = format!("{}.", number);

        if let Some(severity) = issue.severity {
            let label = self.localized_strings.severity(severity);
            if self.use_colors {
                heading.push_str(&format!(" {}[{}]{}", severity_color(severity), label, RESET));
            } else {
                heading.push_str(&format!(" [{}]", label));
            }
        }

        if let Some(criterion) = &issue.criterion {
            heading.push_str(&format!(
                " {} {}:",
                self.localized_strings.get("report_criterion"),
                criterion
            ));
        }

        let mut text = format!("{} {}", heading, self.converter.convert(&issue.description));

        if let Some(code) = &issue.code_suggestion {
            text.push_str(&format!(
                "\n   {}:\n{}",
                self.localized_strings.get("report_fix"),
                indent(&self.converter.code_block(code), "   ")
            ));
        }

        text
    }

    fn format_section(&self, title: &str, content: &str) -> String {
        if self.use_colors {
            format!("\x1b[1m\x1b[37m{}{}\n{}", title, RESET, content)
        } else {
            format!("{}\n{}\n{}", title, "─".repeat(title.chars().count()), content)
        }
    }

    /// One localized, actionable message; the technical cause follows in
    /// verbose mode.
    pub fn format_failure(&self, failure: &AnalysisFailure) -> String {
        let (color_code, reset) = if self.use_colors {
            ("\x1b[1m\x1b[31m", RESET)
        } else {
            ("", "")
        };

        let title = self.localized_strings.get("failure_title");
        let message = self.localized_strings.failure_message(failure);

        if self.verbose {
            format!("{}{}{}\n\n{}\n\n({})", color_code, title, reset, message, failure)
        } else {
            format!("{}{}{}\n\n{}", color_code, title, reset, message)
        }
    }

    pub fn format_models(&self, models: &BTreeSet<String>, selected: &str) -> String {
        if models.is_empty() {
            return self
                .localized_strings
                .format("models_none", &[("model", selected)]);
        }

        let mut lines = vec![format!("{}:", self.localized_strings.get("models_header"))];
        for model in models {
            let is_selected = model_is_available(&BTreeSet::from([model.clone()]), selected);
            lines.push(format!("  {} {}", if is_selected { "*" } else { "•" }, model));
        }

        if !model_is_available(models, selected) {
            lines.push(String::new());
            lines.push(
                self.localized_strings
                    .format("model_selected_missing", &[("model", selected)]),
            );
        }

        lines.join("\n")
    }

    pub fn format_connection(&self, reachable: bool, url: &str) -> String {
        let key = if reachable { "connection_ok" } else { "connection_failed" };
        let message = self.localized_strings.format(key, &[("url", url)]);

        if !self.use_colors {
            return message;
        }
        let color_code = if reachable { "\x1b[32m" } else { "\x1b[31m" };
        format!("{}{}{}", color_code, message, RESET)
    }

    pub fn format_progress(&self, message: &str) -> String {
        if self.use_colors {
            format!("\x1b[36m{}{}", message, RESET)
        } else {
            message.to_string()
        }
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[1m\x1b[31m", // Bold red
        Severity::Serious => "\x1b[1m\x1b[33m",  // Bold yellow
        Severity::Moderate => "\x1b[1m\x1b[35m", // Bold magenta
        Severity::Minor => "\x1b[1m\x1b[34m",    // Bold blue
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
