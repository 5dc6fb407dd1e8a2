//! Heading outlines and their Markdown rendering.

use std::fmt;

use super::error::DomainError;

/// First line of every rendered outline.
pub const CONTENTS_HEADER: &str = "## Contents";

const MARKERS: &str = "######";

/// Nesting depth of a heading, `1` for `h1` through `6` for `h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DomainError::validation(format!(
                "heading level {level} is outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Level for an HTML tag name such as `h3`; `None` for anything else.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        let digits = name
            .strip_prefix('h')
            .or_else(|| name.strip_prefix('H'))?;
        if digits.len() != 1 {
            return None;
        }
        let level = digits.parse::<u8>().ok()?;
        Self::new(level).ok()
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn marker(self) -> &'static str {
        &MARKERS[..usize::from(self.0)]
    }
}

/// A section title with non-empty, trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    level: HeadingLevel,
    text: String,
}

impl Heading {
    /// Returns `None` when the text is blank once trimmed.
    pub fn new(level: HeadingLevel, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            level,
            text: trimmed.to_string(),
        })
    }

    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Headings of one article in document order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    headings: Vec<Heading>,
}

impl Outline {
    pub fn new(headings: Vec<Heading>) -> Option<Self> {
        (!headings.is_empty()).then_some(Self { headings })
    }

    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CONTENTS_HEADER}\n\n")?;
        for heading in &self.headings {
            write!(f, "{} {}\n\n", heading.level.marker(), heading.text)?;
        }
        Ok(())
    }
}
