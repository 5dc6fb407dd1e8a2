//! Country names accepted by the outline endpoint.
//!
//! The allow-list (ASCII letters, whitespace, hyphens) keeps the value safe to
//! splice into an article URL. It does not check that the country exists.

use std::fmt;

use super::error::DomainError;

/// A country name that passed the character allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryName(String);

impl CountryName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::validation("country name is empty"));
        }

        if let Some(rejected) = raw.chars().find(|ch| !is_allowed(*ch)) {
            return Err(DomainError::validation(format!(
                "character {rejected:?} is not allowed in a country name"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphabetic() || is_separator_space(ch) || ch == '-'
}

/// Unicode `White_Space` plus the byte order mark, minus NEL (U+0085).
fn is_separator_space(ch: char) -> bool {
    match ch {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => ch.is_whitespace(),
    }
}

impl AsRef<str> for CountryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
