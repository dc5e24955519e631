use crate::localization::LocalizedStrings;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^\s*(#{1,6})\s*(.+?)\s*#*\s*$").expect("valid regex");
    static ref RULE: Regex = Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("valid regex");
    static ref BULLET: Regex = Regex::new(r"^\s*[-*+]\s+").expect("valid regex");
    static ref ORDERED: Regex = Regex::new(r"^\s*(\d+)[.)]\s+").expect("valid regex");
    static ref QUOTE: Regex = Regex::new(r"^\s*>\s?").expect("valid regex");
    static ref TABLE_SEPARATOR: Regex =
        Regex::new(r"^\|?\s*:?-{2,}:?\s*(?:\|\s*:?-{2,}:?\s*)*\|?$").expect("valid regex");
    static ref BOLD_ITALIC: Regex = Regex::new(r"\*\*\*(.+?)\*\*\*").expect("valid regex");
    static ref BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").expect("valid regex");
    static ref BOLD_UNDERSCORE: Regex = Regex::new(r"__(.+?)__").expect("valid regex");
    static ref ITALIC: Regex = Regex::new(r"\*([^*\s][^*]*?)\*").expect("valid regex");
    static ref ITALIC_UNDERSCORE: Regex =
        Regex::new(r"(^|[^\w])_([^_\s][^_]*?)_([^\w]|$)").expect("valid regex");
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid regex");
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`]+)`").expect("valid regex");
    static ref STRAY_PIPE: Regex = Regex::new(r"\s*\|\s*").expect("valid regex");
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").expect("valid regex");
}

/// Rewrites model markdown into text a screen reader reads cleanly.
///
/// Code blocks are kept verbatim between localized start/end markers.
pub struct PlainTextConverter {
    code_start: &'static str,
    code_end: &'static str,
}

impl PlainTextConverter {
    pub fn new(strings: &LocalizedStrings) -> Self {
        Self {
            code_start: strings.get("code_start"),
            code_end: strings.get("code_end"),
        }
    }

    pub fn convert(&self, text: &str) -> String {
        let mut parts = Vec::new();
        let mut prose: Vec<&str> = Vec::new();
        let mut code: Vec<&str> = Vec::new();
        let mut in_fence = false;

        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                if in_fence {
                    parts.push(self.code_block(&code.join("\n")));
                    code.clear();
                } else {
                    parts.push(convert_prose(&prose));
                    prose.clear();
                }
                in_fence = !in_fence;
                continue;
            }

            if in_fence {
                code.push(line);
            } else {
                prose.push(line);
            }
        }

        if in_fence && !code.is_empty() {
            parts.push(self.code_block(&code.join("\n")));
        }
        parts.push(convert_prose(&prose));

        let joined = parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_RUN
            .replace_all(&joined, "\n\n")
            .trim_matches('\n')
            .trim_end()
            .to_string()
    }

    pub fn code_block(&self, code: &str) -> String {
        format!("{}\n{}\n{}", self.code_start, code.trim_matches('\n'), self.code_end)
    }
}

fn convert_prose(lines: &[&str]) -> String {
    let mut output = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if is_table_row(line) {
            while index < lines.len() && is_table_row(lines[index]) {
                let row = lines[index].trim();
                if !TABLE_SEPARATOR.is_match(row) {
                    let cells = row
                        .trim_matches('|')
                        .split('|')
                        .map(|cell| convert_inline(cell.trim()))
                        .collect::<Vec<_>>();
                    output.push(cells.join("\t"));
                }
                index += 1;
            }
            continue;
        }

        output.push(convert_line(line));
        index += 1;
    }

    output.join("\n")
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn convert_line(line: &str) -> String {
    if RULE.is_match(line) {
        return format!("\n{}\n", "=".repeat(40));
    }

    if let Some(captures) = HEADING.captures(line) {
        let level = captures.get(1).map(|m| m.as_str().len()).unwrap_or(1);
        let title = convert_inline(captures.get(2).map(|m| m.as_str()).unwrap_or(""));
        return match level {
            1 => format!("\n= {} =\n", title),
            2 => format!("\n== {} ==\n", title),
            3 => format!("\n=== {} ===\n", title),
            _ => format!("\n{}\n", title),
        };
    }

    let line = QUOTE.replace(line, "");
    let line = BULLET.replace(&line, "  • ");
    let line = ORDERED.replace(&line, "  $1. ");

    let converted = convert_inline(&line);
    STRAY_PIPE
        .replace_all(&converted, "  ")
        .trim_end()
        .to_string()
}

fn convert_inline(text: &str) -> String {
    let text = BOLD_ITALIC.replace_all(text, "$1");
    let text = BOLD.replace_all(&text, "$1");
    let text = BOLD_UNDERSCORE.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1$2$3");
    let text = LINK.replace_all(&text, "$1 ($2)");
    INLINE_CODE.replace_all(&text, "[$1]").into_owned()
}
