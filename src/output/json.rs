use super::{OutputFormatter, display_value};
use crate::entries::ConfigEntry;
use crate::hook::Outcome;
use serde::{Deserialize, Serialize};

/// JSON output formatter
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of an invocation
#[derive(Debug, Serialize, Deserialize)]
struct JsonOutcome {
    /// "configured" or "skipped"
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    written: Vec<JsonSetting>,
    skipped: Vec<JsonSetting>,
    changed: bool,
    dry_run: bool,
}

/// JSON representation of one setting
#[derive(Debug, Serialize, Deserialize)]
struct JsonSetting {
    section: String,
    key: String,
    variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    unset: bool,
}

impl From<&ConfigEntry> for JsonSetting {
    fn from(entry: &ConfigEntry) -> Self {
        Self {
            section: entry.section.to_string(),
            key: entry.key.to_string(),
            variable: entry.variable.to_string(),
            value: None,
            unset: false,
        }
    }
}

impl From<&Outcome> for JsonOutcome {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Skipped(reason) => Self {
                status: "skipped".to_string(),
                reason: Some(reason.to_string()),
                destination: None,
                written: Vec::new(),
                skipped: Vec::new(),
                changed: false,
                dry_run: false,
            },
            Outcome::Configured { destination, report } => Self {
                status: "configured".to_string(),
                reason: None,
                destination: Some(destination.display().to_string()),
                written: report
                    .written
                    .iter()
                    .map(|resolved| JsonSetting {
                        value: Some(display_value(resolved).to_string()),
                        unset: resolved.unset,
                        ..JsonSetting::from(&resolved.entry)
                    })
                    .collect(),
                skipped: report.skipped.iter().map(JsonSetting::from).collect(),
                changed: report.changed,
                dry_run: report.dry_run,
            },
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_outcome(&self, outcome: &Outcome) -> String {
        serde_json::to_string_pretty(&JsonOutcome::from(outcome))
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize JSON: {e}"}}"#))
    }

    fn format_entries(&self, entries: &[ConfigEntry]) -> String {
        serde_json::to_string_pretty(entries)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize JSON: {e}"}}"#))
    }
}
