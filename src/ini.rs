use eyre::{Context, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Destination for ini settings
pub trait IniSink {
    /// Ensure `section` exists and `key` in it is set to `value`
    fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()>;
}

/// Classification of a single line of an ini file
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    /// `[name]`
    Section(&'a str),
    /// `key = value`; `prefix` runs through `=` and at most one separator
    Entry { key: &'a str, prefix: &'a str, value: &'a str },
    /// `#` or `;` comment
    Comment,
    /// Blanks and anything unrecognised
    Other,
}

/// Regex-based line classifier
#[derive(Debug, Clone)]
struct LineParser {
    section_regex: Regex,
    entry_regex: Regex,
}

impl LineParser {
    fn new() -> Self {
        let section_regex = Regex::new(r"^\s*\[\s*([^\]]*?)\s*\]\s*$").expect("Invalid section regex");
        let entry_regex =
            Regex::new(r"^(\s*([^\s=#;\[][^=]*?)\s*=[ \t]?)(.*)$").expect("Invalid entry regex");

        Self {
            section_regex,
            entry_regex,
        }
    }

    fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if let Some(captures) = self.section_regex.captures(line) {
            return Line::Section(captures.get(1).map_or("", |m| m.as_str()));
        }

        if let Some(captures) = self.entry_regex.captures(line) {
            if let (Some(prefix), Some(key), Some(value)) = (captures.get(1), captures.get(2), captures.get(3)) {
                return Line::Entry {
                    key: key.as_str(),
                    prefix: prefix.as_str(),
                    value: value.as_str(),
                };
            }
        }

        if line.trim_start().starts_with(['#', ';']) {
            return Line::Comment;
        }

        Line::Other
    }
}

/// An ini document edited in place, preserving everything it does not touch
#[derive(Debug, Clone)]
pub struct IniFile {
    lines: Vec<String>,
    /// `\r\n` when the loaded text used it, otherwise `\n`
    newline: &'static str,
    original: String,
    parser: LineParser,
}

impl IniFile {
    /// Create an empty document
    pub fn new() -> Self {
        Self::parse("")
    }

    /// Parse a document from text
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            newline: if content.contains("\r\n") { "\r\n" } else { "\n" },
            original: content.to_string(),
            parser: LineParser::new(),
        }
    }

    /// Read a document from disk; a missing file yields an empty document
    pub fn open(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "ini file does not exist yet");
                Ok(Self::new())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read ini file: {}", path.display())),
        }
    }

    /// Write the document to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write ini file: {}", path.display()))
    }

    /// Whether the rendered text differs from what was loaded
    pub fn is_dirty(&self) -> bool {
        self.to_string() != self.original
    }

    /// Section names in order of first appearance
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for line in &self.lines {
            if let Line::Section(name) = self.parser.classify(line) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Whether the section header is present
    pub fn has_section(&self, section: &str) -> bool {
        self.section_header(section).is_some()
    }

    /// Get the value of `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let (start, end) = self.section_body(section)?;
        self.lines[start..end].iter().find_map(|line| match self.parser.classify(line) {
            Line::Entry { key: k, value, .. } if k == key => Some(value),
            _ => None,
        })
    }

    /// Set `key` in `section`, creating either as needed
    ///
    /// An existing key keeps its original spelling up to the value. A new key
    /// goes after the last line of its section that is neither blank nor a comment, and a new section is
    /// appended at the end of the document.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        validate(section, key, value)?;

        let Some((start, end)) = self.section_body(section) else {
            if self.lines.last().is_some_and(|line| !line.trim().is_empty()) {
                self.lines.push(String::new());
            }
            self.lines.push(format!("[{}]", section));
            self.lines.push(format!("{} = {}", key, value));
            return Ok(());
        };

        if let Some(index) = self.find_key(start, end, key) {
            let replaced = match self.parser.classify(&self.lines[index]) {
                Line::Entry { prefix, .. } => format!("{}{}", prefix, value),
                _ => format!("{} = {}", key, value),
            };
            self.lines[index] = replaced;
            return Ok(());
        }

        // Trailing comments belong to whatever follows the section
        let insert_at = (start..end)
            .rev()
            .find(|&i| !self.lines[i].trim().is_empty() && self.parser.classify(&self.lines[i]) != Line::Comment)
            .map_or(start, |i| i + 1);
        self.lines.insert(insert_at, format!("{} = {}", key, value));

        Ok(())
    }

    fn section_header(&self, section: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| self.parser.classify(line) == Line::Section(section))
    }

    /// Line range of the first `[section]` body, header excluded
    fn section_body(&self, section: &str) -> Option<(usize, usize)> {
        let start = self.section_header(section)? + 1;
        let end = self.lines[start..]
            .iter()
            .position(|line| matches!(self.parser.classify(line), Line::Section(_)))
            .map_or(self.lines.len(), |offset| start + offset);
        Some((start, end))
    }

    fn find_key(&self, start: usize, end: usize, key: &str) -> Option<usize> {
        (start..end).find(|&i| matches!(self.parser.classify(&self.lines[i]), Line::Entry { key: k, .. } if k == key))
    }
}

impl Default for IniFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{}{}", line, self.newline)?;
        }
        Ok(())
    }
}

impl IniSink for IniFile {
    fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        IniFile::set(self, section, key, value)
    }
}

fn validate(section: &str, key: &str, value: &str) -> Result<()> {
    if section.trim().is_empty() || section.contains(['[', ']', '\n']) {
        return Err(eyre::eyre!("Invalid ini section name '{}'", section));
    }
    if key.trim().is_empty() || key != key.trim() || key.contains(['=', '\n', '[']) || key.starts_with(['#', ';']) {
        return Err(eyre::eyre!("Invalid ini key '{}' in section [{}]", key, section));
    }
    if value.contains(['\n', '\r']) {
        return Err(eyre::eyre!("Multi-line value for [{}] {} is not supported", section, key));
    }
    Ok(())
}
