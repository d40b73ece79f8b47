use crate::entries::{ConfigEntry, ENTRIES, WriteRule};
use crate::environment::Environment;
use crate::ini::{IniFile, IniSink};
use eyre::{Context, Result};
use std::path::Path;

/// A resolved entry: the entry plus the value it will carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub entry: ConfigEntry,
    pub value: String,
    /// The source variable was not set at all
    pub unset: bool,
}

/// Entries split into what will be written and what will be left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub writes: Vec<Resolved>,
    pub skips: Vec<ConfigEntry>,
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub written: Vec<Resolved>,
    pub skipped: Vec<ConfigEntry>,
    /// Whether the destination text changed
    pub changed: bool,
    pub dry_run: bool,
}

/// Maps environment variables onto tempest.conf settings
#[derive(Debug, Clone)]
pub struct Materializer {
    entries: &'static [ConfigEntry],
}

impl Materializer {
    /// Create a materializer over the built-in entry table
    pub fn new() -> Self {
        Self::with_entries(ENTRIES)
    }

    /// Create a materializer over a custom entry table
    pub fn with_entries(entries: &'static [ConfigEntry]) -> Self {
        Self { entries }
    }

    /// Resolve every entry against the environment
    pub fn plan(&self, env: &Environment) -> Plan {
        let mut plan = Plan::default();

        for entry in self.entries {
            let value = env.resolve(entry.variable);
            let invalid = env.is_invalid(entry.variable);
            if invalid {
                tracing::warn!(variable = entry.variable, section = entry.section, key = entry.key, "variable is not valid UTF-8, treating it as empty");
            }

            match entry.rule {
                WriteRule::WhenNonEmpty if value.is_empty() => plan.skips.push(*entry),
                WriteRule::WhenNonEmpty | WriteRule::Always => plan.writes.push(Resolved {
                    entry: *entry,
                    value: value.to_string(),
                    unset: !invalid && !env.contains(entry.variable),
                }),
            }
        }

        plan
    }

    /// Write a plan into a sink, stopping at the first failure
    pub fn apply(&self, plan: &Plan, sink: &mut dyn IniSink) -> Result<()> {
        for resolved in &plan.writes {
            let entry = &resolved.entry;
            if resolved.unset {
                tracing::warn!(variable = entry.variable, section = entry.section, key = entry.key, "variable is unset, writing empty value");
            }
            tracing::debug!(section = entry.section, key = entry.key, "setting ini value");

            sink.set(entry.section, entry.key, &resolved.value)
                .with_context(|| format!("Failed to set [{}] {}", entry.section, entry.key))?;
        }

        for entry in &plan.skips {
            tracing::debug!(section = entry.section, key = entry.key, variable = entry.variable, "variable is empty, leaving key out");
        }

        Ok(())
    }

    /// Load the destination, write every entry and save it back
    pub fn materialize(&self, path: &Path, env: &Environment, dry_run: bool) -> Result<Report> {
        let plan = self.plan(env);

        let mut ini = IniFile::open(path)?;
        tracing::debug!(path = %path.display(), sections = ?ini.sections(), "loaded tempest configuration");
        for resolved in &plan.writes {
            if !ini.has_section(resolved.entry.section) {
                tracing::debug!(section = resolved.entry.section, "section will be created");
            }
        }

        self.apply(&plan, &mut ini)?;
        let changed = ini.is_dirty();

        if dry_run {
            tracing::info!(path = %path.display(), changed, "dry run, not saving");
        } else {
            ini.save(path)?;
            tracing::info!(path = %path.display(), written = plan.writes.len(), skipped = plan.skips.len(), changed, "tempest configuration written");
        }

        Ok(Report {
            written: plan.writes,
            skipped: plan.skips,
            changed,
            dry_run,
        })
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}
