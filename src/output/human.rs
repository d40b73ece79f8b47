use super::{OutputFormatter, display_value};
use crate::entries::ConfigEntry;
use crate::hook::Outcome;
use crate::materializer::Report;
use std::io::IsTerminal;
use std::path::Path;

/// Human-readable output formatter
#[derive(Debug, Default)]
pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self {
            use_colors: Self::should_use_colors(),
        }
    }

    /// Create a new human formatter with explicit color setting
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Determine if colors should be used based on environment
    fn should_use_colors() -> bool {
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
    }

    fn format_section(&self, section: &str) -> String {
        if self.use_colors {
            format!("\x1b[36m[{}]\x1b[0m", section) // Cyan
        } else {
            format!("[{}]", section)
        }
    }

    fn format_path(&self, path: &Path) -> String {
        if self.use_colors {
            format!("\x1b[1m{}\x1b[0m", path.display()) // Bold
        } else {
            path.display().to_string()
        }
    }

    fn format_note(&self, note: &str) -> String {
        if self.use_colors {
            format!("\x1b[90m({})\x1b[0m", note) // Gray
        } else {
            format!("({})", note)
        }
    }

    fn format_summary(&self, report: &Report) -> String {
        let written = report.written.len();
        let mut summary = format!("{} setting{}", written, if written == 1 { "" } else { "s" });

        if !report.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped", report.skipped.len()));
        }

        let status = match (report.dry_run, report.changed) {
            (true, true) => "would change file",
            (true, false) => "file already up to date",
            (false, true) => "file updated",
            (false, false) => "file unchanged",
        };

        if self.use_colors && report.changed && !report.dry_run {
            format!("{}, \x1b[32m{}\x1b[0m", summary, status) // Green
        } else {
            format!("{}, {}", summary, status)
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_outcome(&self, outcome: &Outcome) -> String {
        let (destination, report) = match outcome {
            Outcome::Skipped(reason) => return format!("Skipped: {}", reason),
            Outcome::Configured { destination, report } => (destination, report),
        };

        let mut output = vec![self.format_path(destination)];

        for resolved in &report.written {
            let entry = &resolved.entry;
            let mut line = format!(
                "  {} {} = {}",
                self.format_section(entry.section),
                entry.key,
                display_value(resolved)
            );
            if resolved.unset {
                line.push(' ');
                line.push_str(&self.format_note(&format!("{} unset", entry.variable)));
            }
            output.push(line);
        }

        for entry in &report.skipped {
            output.push(format!(
                "  {} {} {}",
                self.format_section(entry.section),
                entry.key,
                self.format_note(&format!("skipped, {} empty", entry.variable))
            ));
        }

        output.push(String::new());
        output.push(self.format_summary(report));

        output.join("\n")
    }

    fn format_entries(&self, entries: &[ConfigEntry]) -> String {
        let mut output = Vec::new();

        for entry in entries {
            output.push(format!("  {} {}", self.format_section(entry.section), entry.key));
            output.push(format!("    from ${} ({})", entry.variable, entry.rule));
        }

        output.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ENTRIES;
    use crate::materializer::Resolved;
    use crate::phase::SkipReason;
    use std::path::PathBuf;

    fn entry(key: &str) -> ConfigEntry {
        *ENTRIES.iter().find(|e| e.key == key).unwrap()
    }

    fn configured(report: Report) -> Outcome {
        Outcome::Configured {
            destination: PathBuf::from("/opt/stack/tempest/etc/tempest.conf"),
            report,
        }
    }

    #[test]
    fn test_format_skipped() {
        let formatter = HumanFormatter::with_colors(false);
        let outcome = Outcome::Skipped(SkipReason::ServiceDisabled("tempest".to_string()));
        assert_eq!(formatter.format_outcome(&outcome), "Skipped: service 'tempest' is not enabled");
    }

    #[test]
    fn test_format_configured() {
        let formatter = HumanFormatter::with_colors(false);
        let report = Report {
            written: vec![
                Resolved {
                    entry: entry("max_compute_nodes"),
                    value: "3".to_string(),
                    unset: false,
                },
                Resolved {
                    entry: entry("password"),
                    value: "secret".to_string(),
                    unset: false,
                },
                Resolved {
                    entry: entry("host"),
                    value: String::new(),
                    unset: true,
                },
            ],
            skipped: vec![entry("smt_hosts")],
            changed: true,
            dry_run: false,
        };

        let output = formatter.format_outcome(&configured(report));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "/opt/stack/tempest/etc/tempest.conf");
        assert_eq!(lines[1], "  [whitebox] max_compute_nodes = 3");
        assert_eq!(lines[2], "  [whitebox-database] password = ********");
        assert_eq!(lines[3], "  [whitebox-database] host =  (DATABASE_HOST unset)");
        assert_eq!(lines[4], "  [whitebox-hardware] smt_hosts (skipped, SMT_HOSTS empty)");
        assert_eq!(lines[6], "3 settings, 1 skipped, file updated");
        assert!(!output.contains("secret"));
    }

    #[test]
    fn test_format_summary_dry_run() {
        let formatter = HumanFormatter::with_colors(false);
        let report = Report {
            written: vec![Resolved {
                entry: entry("cpu_model"),
                value: "Nehalem".to_string(),
                unset: false,
            }],
            skipped: vec![],
            changed: false,
            dry_run: true,
        };

        assert_eq!(formatter.format_summary(&report), "1 setting, file already up to date");
    }

    #[test]
    fn test_format_section_with_colors() {
        let formatter = HumanFormatter::with_colors(true);
        assert_eq!(formatter.format_section("whitebox"), "\x1b[36m[whitebox]\x1b[0m");
    }

    #[test]
    fn test_format_entries() {
        let formatter = HumanFormatter::with_colors(false);
        let output = formatter.format_entries(&ENTRIES[..1]);
        assert_eq!(output, "  [whitebox] ctlplane_ssh_username\n    from $STACK_USER (always)");
    }
}
