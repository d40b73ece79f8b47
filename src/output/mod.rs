pub mod human;
pub mod json;

use crate::entries::ConfigEntry;
use crate::hook::Outcome;
use crate::materializer::Resolved;

/// Placeholder shown instead of secret values
pub const MASK: &str = "********";

/// Trait for rendering what a run did
pub trait OutputFormatter {
    /// Format the outcome of an invocation
    fn format_outcome(&self, outcome: &Outcome) -> String;

    /// Format the entry table for `--list-entries`
    fn format_entries(&self, entries: &[ConfigEntry]) -> String;
}

/// Get the appropriate formatter for the given format
pub fn get_formatter(format: &crate::cli::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        crate::cli::OutputFormat::Human => Box::new(human::HumanFormatter::new()),
        crate::cli::OutputFormat::Json => Box::new(json::JsonFormatter::new()),
    }
}

/// The value to show a user for a resolved entry
pub fn display_value(resolved: &Resolved) -> &str {
    if resolved.entry.is_secret() && !resolved.value.is_empty() {
        MASK
    } else {
        &resolved.value
    }
}
