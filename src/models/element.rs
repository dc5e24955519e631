use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Accessible properties of the element under analysis, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementContext {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub html: String,
    /// Normalized to lowercase; `BTreeSet` keeps them in canonical order.
    #[serde(default, deserialize_with = "deserialize_states")]
    pub states: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ElementContext {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into().trim().to_string(),
            name: name.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.add_state(state);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn add_state(&mut self, state: &str) {
        if let Some(normalized) = normalize_state(state) {
            self.states.insert(normalized);
        }
    }

    /// An element with neither name nor role cannot be meaningfully analyzed.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.role.trim().is_empty()
    }

    pub fn has_html(&self) -> bool {
        !self.html.trim().is_empty()
    }

    /// HTML-like rendering of the accessible properties, used when no real
    /// markup could be captured from the page.
    pub fn approximate_markup(&self) -> String {
        let tag = guess_tag(&self.role);
        let mut attrs = Vec::new();

        if !self.role.trim().is_empty() {
            attrs.push(format!("role=\"{}\"", escape_attribute(self.role.trim())));
        }
        if !self.name.trim().is_empty() {
            attrs.push(format!("aria-label=\"{}\"", escape_attribute(self.name.trim())));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            let short: String = description.trim().chars().take(100).collect();
            attrs.push(format!("aria-description=\"{}\"", escape_attribute(&short)));
        }
        for state in &self.states {
            if let Some(attr) = state_attribute(state) {
                if !attrs.iter().any(|a| a == attr) {
                    attrs.push(attr.to_string());
                }
            }
        }

        let content = self
            .value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(self.name.trim());
        let content: String = if content.chars().count() > 200 {
            format!("{}...", content.chars().take(200).collect::<String>())
        } else {
            content.to_string()
        };

        if attrs.is_empty() {
            format!("<{tag}>{content}</{tag}>")
        } else {
            format!("<{tag} {}>{content}</{tag}>", attrs.join(" "))
        }
    }
}

fn normalize_state(state: &str) -> Option<String> {
    let normalized = state.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn deserialize_states<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(|s| normalize_state(s)).collect())
}

fn guess_tag(role: &str) -> &'static str {
    match role.trim().to_lowercase().as_str() {
        "button" | "toggle button" => "button",
        "link" => "a",
        "edit" | "editable text" | "textbox" | "text field" | "checkbox" | "check box"
        | "radio button" | "radio" => "input",
        "combo box" | "combobox" | "listbox" => "select",
        "list" => "ul",
        "list item" | "listitem" => "li",
        "table" => "table",
        "heading" => "h2",
        "graphic" | "image" | "img" => "img",
        "paragraph" => "p",
        _ => "div",
    }
}

fn state_attribute(state: &str) -> Option<&'static str> {
    // Turkish state names appear when the host runs in a Turkish locale.
    let pairs: &[(&[&str], &str)] = &[
        // Negated forms contain their positive word, so they are matched first.
        (&["unchecked", "not checked", "işaretsiz", "işaretli değil"], "aria-checked=\"false\""),
        (&["checked", "işaretli"], "aria-checked=\"true\""),
        (&["unselected", "not selected", "seçili değil", "seçilmemiş"], "aria-selected=\"false\""),
        (&["selected", "seçili"], "aria-selected=\"true\""),
        (&["collapsed", "not expanded", "daraltılmış"], "aria-expanded=\"false\""),
        (&["expanded", "genişletilmiş"], "aria-expanded=\"true\""),
        (&["not required", "gerekli değil"], "aria-required=\"false\""),
        (&["required", "gerekli"], "aria-required=\"true\""),
        (&["not invalid", "geçersiz değil"], "aria-invalid=\"false\""),
        (&["invalid", "geçersiz"], "aria-invalid=\"true\""),
        (&["disabled", "unavailable", "devre dışı"], "disabled"),
        (&["readonly", "read only", "salt okunur"], "readonly"),
        (&["not focusable", "unfocusable", "odaklanamaz"], "tabindex=\"-1\""),
        (&["focusable", "odaklanabilir"], "tabindex=\"0\""),
    ];

    pairs
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| state.contains(n)))
        .map(|(_, attr)| *attr)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
