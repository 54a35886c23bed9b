//! Tolerant `name = value` line parser.
//!
//! # Responsibilities
//! - Match `name = value` lines, with `#` starting a trailing comment
//! - Skip blank, comment-only and malformed lines without error
//! - Drop names the schema does not know
//!
//! # Design Decisions
//! - Values cannot contain whitespace; every space and tab is removed
//! - Entries keep file order so later duplicates overwrite earlier ones

use std::sync::OnceLock;

use regex::Regex;

use crate::config::schema::Schema;

/// One recognized line of a config file, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub raw_value: String,
    /// 1-based line number in the source text.
    pub line: usize,
}

fn config_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ \t]*([a-zA-Z0-9_.]+)[ \t]*=[ \t]*([^#\n\r]+).*$")
            .expect("config line pattern is valid")
    })
}

/// Split one line into a name and a whitespace-free value.
pub fn parse_line(line: &str) -> Option<(&str, String)> {
    let caps = config_line().captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    let value = caps
        .get(2)?
        .as_str()
        .chars()
        .filter(|c| *c != ' ' && *c != '\t')
        .collect::<String>()
        .trim()
        .to_string();
    Some((name, value))
}

/// Parse config text into entries known to `schema`, in file order.
pub fn parse_entries(text: &str, schema: &Schema) -> Vec<RawEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let (name, raw_value) = parse_line(line)?;
            if !schema.contains(name) {
                tracing::trace!(line = i + 1, name, "Ignoring unknown parameter");
                return None;
            }
            Some(RawEntry {
                name: name.to_string(),
                raw_value,
                line: i + 1,
            })
        })
        .collect()
}
