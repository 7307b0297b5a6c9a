//! Minimal INI reader for host check result files.
//!
//! Accepts what the agent's host check writes: `[section]` headers,
//! `key = value` or `key: value` options, `#`/`;` comment lines, and
//! indented continuation lines. Option names are case-insensitive.

use std::collections::BTreeMap;

use crate::common::errors::CleanupError;

/// Parsed INI content: section name → option name → raw value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self, CleanupError> {
        let mut doc = IniDocument::default();
        let mut section: Option<String> = None;
        let mut last_option: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');

            if line.trim().is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            // "rem" comments are accepted by the agent's writer as well
            let is_rem = line.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("rem"))
                && line[3..].starts_with(char::is_whitespace);
            if is_rem {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let (Some(sect), Some(opt)) = (&section, &last_option) {
                    // Continuation text is kept verbatim, comments included
                    let value = line.trim();
                    if !value.is_empty() {
                        if let Some(existing) = doc
                            .sections
                            .get_mut(sect)
                            .and_then(|options| options.get_mut(opt))
                        {
                            existing.push('\n');
                            existing.push_str(value);
                        }
                    }
                    continue;
                }
            }

            if let Some(name) = parse_header(line) {
                doc.sections.entry(name.to_string()).or_default();
                section = Some(name.to_string());
                last_option = None;
                continue;
            }

            let Some(sect) = &section else {
                return Err(CleanupError::ManifestParse {
                    line: line_no,
                    message: "option found before any section header".to_string(),
                });
            };

            match parse_option(line) {
                Some((key, value)) => {
                    let key = key.to_lowercase();
                    doc.sections
                        .entry(sect.clone())
                        .or_default()
                        .insert(key.clone(), value.to_string());
                    last_option = Some(key);
                }
                None => {
                    return Err(CleanupError::ManifestParse {
                        line: line_no,
                        message: format!("unrecognized line: {}", line.trim()),
                    });
                }
            }
        }

        Ok(doc)
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|options| options.get(&option.to_lowercase()))
            .map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// `[name]` at the start of the line; anything after `]` is ignored
fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Split on the first `=` or `:`; the key must be non-empty
fn parse_option(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(['=', ':'])?;
    let key = line[..sep].trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_inline_comment(line[sep + 1..].trim());
    Some((key, value))
}

/// Drop a trailing ` ;comment`; a `;` without leading whitespace is data
fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b';' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return value[..i].trim_end();
        }
    }
    value
}
