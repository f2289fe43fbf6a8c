//! Repository configuration
//!
//! The config file is INI-like:
//!
//! ```text
//! [core]
//!   bare = false
//! [remote "origin"]
//!   url = ../src
//! ```
//!
//! Sections are keyed by `(section, subsection)`; a missing subsection is
//! the empty string. `core.bare = "true"` marks a repository without a
//! working copy.

use anyhow::Context;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

const SECTION_PATTERN: &str = r#"^\[([A-Za-z0-9-]+)(?: "([^"]*)")?\]$"#;

fn section_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SECTION_PATTERN).expect("valid regex"))
}

/// Section identifier: name plus optional subsection (empty when absent)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SectionKey {
    pub section: String,
    pub subsection: String,
}

impl SectionKey {
    pub fn new(section: impl Into<String>, subsection: impl Into<String>) -> Self {
        SectionKey {
            section: section.into(),
            subsection: subsection.into(),
        }
    }
}

/// Parsed configuration contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigData {
    sections: BTreeMap<SectionKey, BTreeMap<String, String>>,
}

impl ConfigData {
    /// Parse the INI-like text format
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut sections = BTreeMap::new();
        let mut current: Option<SectionKey> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                let captures = section_regex()
                    .captures(line)
                    .with_context(|| format!("malformed config section header: {line:?}"))?;
                let key = SectionKey::new(
                    captures[1].to_string(),
                    captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
                );
                sections.entry(key.clone()).or_insert_with(BTreeMap::new);
                current = Some(key);
                continue;
            }

            let section = current
                .clone()
                .with_context(|| format!("config entry outside any section: {line:?}"))?;
            let (key, value) = line
                .split_once('=')
                .with_context(|| format!("malformed config entry: {line:?}"))?;
            sections
                .entry(section)
                .or_insert_with(BTreeMap::new)
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(ConfigData { sections })
    }

    /// Render back to the text format
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, values) in &self.sections {
            if key.subsection.is_empty() {
                out.push_str(&format!("[{}]\n", key.section));
            } else {
                out.push_str(&format!("[{} \"{}\"]\n", key.section, key.subsection));
            }
            for (name, value) in values {
                out.push_str(&format!("  {name} = {value}\n"));
            }
        }
        out
    }

    pub fn get(&self, section: &str, subsection: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&SectionKey::new(section, subsection))
            .and_then(|values| values.get(key))
            .map(String::as_str)
    }

    pub fn set(
        &mut self,
        section: &str,
        subsection: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.sections
            .entry(SectionKey::new(section, subsection))
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn is_bare(&self) -> bool {
        self.get("core", "", "bare") == Some("true")
    }

    pub fn has_remote(&self, name: &str) -> bool {
        self.sections.contains_key(&SectionKey::new("remote", name))
    }

    pub fn remote_url(&self, name: &str) -> Option<&str> {
        self.get("remote", name, "url")
    }

    /// Initial contents for a fresh repository
    pub fn initial(bare: bool) -> Self {
        let mut data = ConfigData::default();
        data.set("core", "", "bare", if bare { "true" } else { "false" });
        data
    }
}

/// Config handle over the on-disk config file
#[derive(Debug)]
pub struct Config {
    path: Box<Path>,
}

impl Config {
    pub fn new(path: Box<Path>) -> Self {
        Config { path }
    }

    pub fn read(&self) -> anyhow::Result<ConfigData> {
        let content = std::fs::read_to_string(&self.path).context("unable to read config")?;
        ConfigData::parse(&content)
    }

    pub fn write(&self, data: &ConfigData) -> anyhow::Result<()> {
        std::fs::write(&self.path, data.render()).context("unable to write config")
    }
}
