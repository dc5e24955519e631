use crate::error::ParseError;
use crate::models::{AnalysisConfig, AnalysisReport, Issue, RawModelResponse, Severity};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref BULLET: Regex =
        Regex::new(r"^(\s*)(?:[-*+•]|\d{1,3}[.)])\s+").expect("valid regex");
    static ref HEADING_NUMBER: Regex = Regex::new(r"^\d{1,2}[.)]\s*").expect("valid regex");
    static ref CRITERION: Regex =
        Regex::new(r"\b(\d{1,2}\.\d(?:\.\d{1,2})?)\b").expect("valid regex");
    static ref BRACKETED: Regex = Regex::new(r"\[([^\]\n]+)\]").expect("valid regex");
    static ref SEVERITY_LABEL: Regex =
        Regex::new(r"(?i)(?:severity|önem derecesi|önem|ciddiyet)\s*[:=]\s*\**\s*([\p{L}]+)")
            .expect("valid regex");
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`\n]+)`").expect("valid regex");
    static ref FIELD_LABEL: Regex = Regex::new(
        r"(?i)^(?:issue|problem|description|finding|sorun|açıklama|bulgu)\s*:\s*"
    )
    .expect("valid regex");
    static ref LEADING_CRITERION: Regex = Regex::new(
        r"(?i)^\(?(?:wcag\s*)?(?:sc\s*|success criterion\s*|başarı kriteri\s*)?\d{1,2}\.\d(?:\.\d{1,2})?\)?"
    )
    .expect("valid regex");
}

const SEPARATORS: &[char] = &['-', '–', '—', ':', '|', ',', '.', ';', ' ', '\t'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    ScreenReader,
    Issues,
    Suggestions,
}

impl SectionKind {
    const ALL: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::ScreenReader,
        SectionKind::Issues,
        SectionKind::Suggestions,
    ];

    /// Lowercase heading labels accepted for this section.
    fn labels(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Summary => &["summary", "overview", "özet", "ozet", "genel bakış"],
            SectionKind::ScreenReader => &[
                "screen-reader experience",
                "screen reader experience",
                "screen-reader user experience",
                "screen reader user experience",
                "screen-reader",
                "screen reader",
                "ekran okuyucu deneyimi",
                "ekran okuyucu kullanıcı deneyimi",
                "ekran okuyucu",
            ],
            SectionKind::Issues => &[
                "issues",
                "issue",
                "issues found",
                "accessibility issues",
                "wcag issues",
                "sorunlar",
                "bulunan sorunlar",
                "tespit edilen sorunlar",
                "erişilebilirlik sorunları",
            ],
            SectionKind::Suggestions => &[
                "suggestions",
                "recommendations",
                "general suggestions",
                "improvement suggestions",
                "öneriler",
                "oneriler",
                "genel öneriler",
                "iyileştirme önerileri",
            ],
        }
    }
}

/// Bodies of the four report sections, `None` when the heading never appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub summary: Option<String>,
    pub screen_reader: Option<String>,
    pub issues: Option<String>,
    pub suggestions: Option<String>,
}

impl Sections {
    fn slot(&mut self, kind: SectionKind) -> &mut Option<String> {
        match kind {
            SectionKind::Summary => &mut self.summary,
            SectionKind::ScreenReader => &mut self.screen_reader,
            SectionKind::Issues => &mut self.issues,
            SectionKind::Suggestions => &mut self.suggestions,
        }
    }

    fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.screen_reader.is_none()
            && self.issues.is_none()
            && self.suggestions.is_none()
    }
}

struct Heading {
    kind: SectionKind,
    line: usize,
    inline: String,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Turns the model's free text into a structured report in one pass.
    pub fn parse(
        raw: &RawModelResponse,
        config: &AnalysisConfig,
    ) -> Result<AnalysisReport, ParseError> {
        if raw.text.trim().is_empty() {
            return Err(ParseError::EmptyResponse);
        }

        let mut sections = Self::locate_sections(&raw.text);
        if sections.is_empty() {
            // Some models wrap the whole answer in a single code fence.
            if let Some(inner) = strip_outer_fence(&raw.text) {
                sections = Self::locate_sections(inner);
            }
        }

        let summary = sections
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ParseError::MissingSummary)?
            .to_string();

        let issues = match sections.issues.as_deref() {
            Some(body) if !is_none_marker(body) => Self::split_items(body)
                .iter()
                .filter(|item| !is_none_marker(item))
                .map(|item| Self::extract_issue(item, config))
                .collect(),
            _ => Vec::new(),
        };

        let suggestions = match sections.suggestions.as_deref() {
            Some(body) if !is_none_marker(body) => Self::split_items(body)
                .into_iter()
                .filter(|item| !is_none_marker(item))
                .collect(),
            _ => Vec::new(),
        };

        debug!(
            issues = issues.len(),
            suggestions = suggestions.len(),
            has_screen_reader = sections.screen_reader.is_some(),
            "parsed model response"
        );

        Ok(AnalysisReport {
            summary,
            screen_reader_experience: sections
                .screen_reader
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            issues,
            suggestions,
            model: raw.model.clone(),
            elapsed_ms: raw.elapsed.as_millis() as u64,
        })
    }

    /// Finds section headings outside fenced code; the first heading of each
    /// kind wins and its body runs up to the next heading of another kind.
    ///
    /// Inside an open Issues or Suggestions list, a bulleted or numbered line
    /// only counts as a heading when it is a bare label, so per-item fields
    /// such as `1. **Issue:** ...` stay in the list.
    pub fn locate_sections(text: &str) -> Sections {
        let lines: Vec<&str> = text.lines().collect();
        let mut headings: Vec<Heading> = Vec::new();
        let mut in_fence = false;

        for (index, line) in lines.iter().enumerate() {
            if is_fence(line) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            let Some((kind, inline)) = match_heading(line) else {
                continue;
            };
            if headings.iter().any(|seen| seen.kind == kind) {
                continue;
            }

            let open_list = matches!(
                headings.last().map(|open| open.kind),
                Some(SectionKind::Issues | SectionKind::Suggestions)
            );
            let trimmed = line.trim_start();
            let list_item = !trimmed.starts_with('#') && BULLET.is_match(line);
            if open_list && list_item && (!inline.is_empty() || trimmed.len() != line.len()) {
                continue;
            }

            headings.push(Heading {
                kind,
                line: index,
                inline,
            });
        }

        let mut sections = Sections::default();
        for (position, heading) in headings.iter().enumerate() {
            let slot = sections.slot(heading.kind);

            let end = headings
                .get(position + 1)
                .map(|next| next.line)
                .unwrap_or(lines.len());

            let mut body = Vec::new();
            if !heading.inline.is_empty() {
                body.push(heading.inline.as_str());
            }
            body.extend_from_slice(&lines[heading.line + 1..end]);

            *slot = Some(body.join("\n").trim().to_string());
        }

        sections
    }

    /// Splits a section body into list items. Continuation lines, nested
    /// bullets and fenced blocks stay with the item they follow.
    pub fn split_items(body: &str) -> Vec<String> {
        let mut items: Vec<Vec<String>> = Vec::new();
        let mut item_indent = 0usize;
        let mut in_fence = false;

        for line in body.lines() {
            if is_fence(line) {
                in_fence = !in_fence;
                push_line(&mut items, line.to_string());
                continue;
            }
            if in_fence {
                push_line(&mut items, line.to_string());
                continue;
            }

            if let Some(captures) = BULLET.captures(line) {
                let indent = captures.get(1).map(|m| m.as_str().len()).unwrap_or(0);
                if items.is_empty() || indent <= item_indent {
                    item_indent = indent;
                    let marker_len = captures.get(0).map(|m| m.end()).unwrap_or(0);
                    items.push(vec![line[marker_len..].to_string()]);
                    continue;
                }
            }

            if line.trim().is_empty() && items.is_empty() {
                continue;
            }
            push_line(&mut items, line.to_string());
        }

        items
            .into_iter()
            .map(|lines| lines.join("\n").trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    pub fn extract_issue(item: &str, config: &AnalysisConfig) -> Issue {
        Issue {
            severity: if config.include_severity {
                extract_severity(item)
            } else {
                None
            },
            criterion: extract_criterion(&strip_fenced_blocks(item)),
            description: extract_description(item),
            code_suggestion: if config.include_code_suggestions {
                extract_code(item)
            } else {
                None
            },
        }
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn push_line(items: &mut Vec<Vec<String>>, line: String) {
    match items.last_mut() {
        Some(current) => current.push(line),
        None => items.push(vec![line]),
    }
}

fn strip_outer_fence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") || !trimmed.ends_with("```") || trimmed.len() < 6 {
        return None;
    }
    let without_close = &trimmed[..trimmed.len() - 3];
    let body_start = without_close.find('\n')?;
    Some(&without_close[body_start + 1..])
}

/// Recognizes `## Summary`, `**Summary:**`, `Summary:`, `1. Summary` and the
/// like, returning the text that follows the label on the same line.
fn match_heading(line: &str) -> Option<(SectionKind, String)> {
    let mut candidate = line.trim().trim_start_matches('#').trim_start();
    if let Some(found) = HEADING_NUMBER.find(candidate) {
        candidate = &candidate[found.end()..];
    }
    let candidate = candidate.trim_start_matches(['*', '_']).trim_start();

    for kind in SectionKind::ALL {
        for label in kind.labels() {
            let Some(rest) = strip_label(candidate, label) else {
                continue;
            };
            let rest = rest.trim_start_matches(['*', '_']).trim_start();
            if rest.is_empty() {
                return Some((kind, String::new()));
            }
            if let Some(inline) = rest.strip_prefix(':') {
                let inline = inline.trim_start_matches(['*', '_']).trim();
                return Some((kind, inline.to_string()));
            }
        }
    }

    None
}

/// Case-insensitive prefix match that keeps the remainder in its original case.
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in label.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let rest_start = chars.next().map(|(index, _)| index).unwrap_or(text.len());
    Some(&text[rest_start..])
}

fn is_none_marker(text: &str) -> bool {
    let normalized = text
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    matches!(
        normalized.as_str(),
        "none" | "n/a" | "na" | "no" | "yok" | "hiçbiri" | "sorun yok" | "sorun bulunamadı"
            | "no issues" | "no issues found" | "no issues identified" | "none found"
    ) || normalized.starts_with("no accessibility issues")
        || normalized.starts_with("no issues were found")
        || normalized.starts_with("herhangi bir sorun bulunamadı")
        || normalized.starts_with("erişilebilirlik sorunu bulunamadı")
}

/// Bracketed token on the first line, then a `Severity:` label on any prose
/// line of the item, then a severity word opening the first line.
fn extract_severity(item: &str) -> Option<Severity> {
    let prose = strip_fenced_blocks(item);
    let first_line = prose.lines().next().unwrap_or("").trim();

    for captures in BRACKETED.captures_iter(first_line) {
        let token = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        if let Some(severity) = token.split_whitespace().rev().find_map(Severity::from_token) {
            return Some(severity);
        }
    }

    if let Some(severity) = prose.lines().find_map(|line| {
        SEVERITY_LABEL
            .captures(line)
            .and_then(|c| c.get(1))
            .and_then(|m| Severity::from_token(m.as_str()))
    }) {
        return Some(severity);
    }

    leading_severity(first_line)
}

/// A bare severity word counts only when it opens the line and is either
/// emphasized or followed by a separator; "Text has low contrast" has none.
fn leading_severity(line: &str) -> Option<Severity> {
    let trimmed = line.trim_start();
    let emphasized = trimmed.starts_with("**") || trimmed.starts_with("__");
    let text = trimmed.trim_start_matches(['*', '_']);

    let word_end = text
        .find(|c: char| !c.is_alphanumeric())
        .unwrap_or(text.len());
    let (word, rest) = text.split_at(word_end);
    let severity = Severity::from_token(word)?;

    let closed = emphasized && (rest.starts_with("**") || rest.starts_with("__"));
    let rest = rest.trim_start_matches(['*', '_']).trim_start();
    if closed || rest.starts_with([':', '-', '–', '—', '|']) {
        Some(severity)
    } else {
        None
    }
}

/// Three-part references win; a two-part match right after "WCAG" is the
/// standard's version, not a criterion.
fn extract_criterion(text: &str) -> Option<String> {
    let mut fallback = None;

    for found in CRITERION.find_iter(text) {
        let reference = found.as_str();
        if reference.matches('.').count() == 2 {
            return Some(reference.to_string());
        }
        if fallback.is_none() {
            let before = text[..found.start()].trim_end().to_lowercase();
            if !before.ends_with("wcag") {
                fallback = Some(reference.to_string());
            }
        }
    }

    fallback
}

fn extract_code(item: &str) -> Option<String> {
    let mut in_fence = false;
    let mut block = Vec::new();

    for line in item.lines() {
        if is_fence(line) {
            if in_fence {
                let code = block.join("\n");
                let code = dedent(&code);
                if !code.trim().is_empty() {
                    return Some(code);
                }
                block.clear();
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            block.push(line);
        }
    }

    INLINE_CODE
        .captures(item)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|code| !code.is_empty())
}

fn dedent(code: &str) -> String {
    let indent = code
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    code.lines()
        .map(|line| line.get(indent..).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn strip_fenced_blocks(item: &str) -> String {
    let mut in_fence = false;
    item.lines()
        .filter(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                return false;
            }
            !in_fence
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_description(item: &str) -> String {
    let prose = strip_fenced_blocks(item);
    let mut lines = prose.lines().map(str::trim).filter(|line| !line.is_empty());

    let first = lines.next().unwrap_or("");
    let cleaned = clean_description_line(first);
    if !cleaned.is_empty() {
        return cleaned;
    }

    lines
        .map(clean_description_line)
        .find(|line| !line.is_empty())
        .unwrap_or_else(|| first.to_string())
}

fn clean_description_line(line: &str) -> String {
    let mut text = line.replace("**", "").replace("__", "");

    text = BRACKETED
        .replace_all(&text, |captures: &regex::Captures| {
            let token = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            let is_severity = token.split_whitespace().any(|w| Severity::from_token(w).is_some());
            let is_criterion = CRITERION.is_match(token);
            if is_severity || is_criterion {
                String::new()
            } else {
                captures.get(0).map(|m| m.as_str().to_string()).unwrap_or_default()
            }
        })
        .into_owned();

    text = SEVERITY_LABEL.replace(&text, "").into_owned();

    let mut rest = text.trim_start_matches(SEPARATORS);
    loop {
        let before = rest;

        if let Some(found) = FIELD_LABEL.find(rest) {
            rest = &rest[found.end()..];
        }

        if let Some(found) = LEADING_CRITERION.find(rest) {
            rest = rest[found.end()..].trim_start_matches(SEPARATORS);
        }

        let first_word_end = rest
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(rest.len());
        let first_word = &rest[..first_word_end];
        let after = rest[first_word_end..].trim_start();
        // A leading severity word only counts when a separator follows it.
        if !first_word.is_empty()
            && Severity::from_token(first_word).is_some()
            && after.starts_with([':', '-', '–', '—', '|'])
        {
            rest = after.trim_start_matches(SEPARATORS);
        }

        if rest == before {
            break;
        }
    }

    rest.trim().to_string()
}
