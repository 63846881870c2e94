//! Output descriptors: how a caller names the device it wants.

use regex::{Regex, RegexBuilder};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// Identifies an output device, either by position in the registry or by
/// matching its description.
///
/// Resolution always happens against the registry's current snapshot.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Position in the registry's enumeration order.
    Index(usize),
    /// Pattern text, compiled on each resolution.
    Pattern(String),
    /// A pattern compiled by the caller. Used as given.
    Compiled(Regex),
}

impl Descriptor {
    /// Compile this descriptor's pattern. `None` for an index.
    pub(crate) fn compile(&self, case_insensitive: bool) -> Result<Option<Regex>> {
        match self {
            Descriptor::Index(_) => Ok(None),
            Descriptor::Pattern(text) => {
                let regex = RegexBuilder::new(text)
                    .case_insensitive(case_insensitive)
                    .build()?;
                Ok(Some(regex))
            }
            Descriptor::Compiled(regex) => Ok(Some(regex.clone())),
        }
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Descriptor::Index(0)
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Descriptor::Index(a), Descriptor::Index(b)) => a == b,
            (Descriptor::Pattern(a), Descriptor::Pattern(b)) => a == b,
            (Descriptor::Compiled(a), Descriptor::Compiled(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Index(index) => write!(f, "#{}", index),
            Descriptor::Pattern(text) => write!(f, "matching '{}'", text),
            Descriptor::Compiled(regex) => write!(f, "matching /{}/", regex.as_str()),
        }
    }
}

/// Digits only is an index, anything else is pattern text.
impl FromStr for Descriptor {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = trimmed.parse() {
                return Ok(Descriptor::Index(index));
            }
        }
        Ok(Descriptor::Pattern(s.to_string()))
    }
}

impl From<usize> for Descriptor {
    fn from(index: usize) -> Self {
        Descriptor::Index(index)
    }
}

impl From<&str> for Descriptor {
    fn from(text: &str) -> Self {
        Descriptor::Pattern(text.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(text: String) -> Self {
        Descriptor::Pattern(text)
    }
}

impl From<Regex> for Descriptor {
    fn from(regex: Regex) -> Self {
        Descriptor::Compiled(regex)
    }
}

impl From<&Descriptor> for Descriptor {
    fn from(descriptor: &Descriptor) -> Self {
        descriptor.clone()
    }
}
