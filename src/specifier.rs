//! Specifier grammar for `brew:`, `cask:` and `system:` dependencies.
//!
//! A specifier is split on `:` with no escaping: `protocol:command:arg:arg`.
//! A colon inside an argument is indistinguishable from a separator, so
//! `system:tap:user/repo:extra` yields two arguments, never one. There is no
//! quoting.

use std::fmt;

/// Prefixes that route a dependency to the system package manager
pub const CLAIMED_PREFIXES: [&str; 3] = ["brew:", "cask:", "system:"];

/// Whether a dependency specifier belongs to this bridge
pub fn claims(specifier: &str) -> bool {
    CLAIMED_PREFIXES
        .iter()
        .any(|prefix| specifier.starts_with(prefix))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Brew,
    Cask,
    System,
    Other(String),
}

impl Protocol {
    fn from_segment(segment: &str) -> Self {
        match segment {
            "brew" => Self::Brew,
            "cask" => Self::Cask,
            "system" => Self::System,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brew => write!(f, "brew"),
            Self::Cask => write!(f, "cask"),
            Self::System => write!(f, "system"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A parsed `protocol:command:args...` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub protocol: Protocol,
    /// Empty when the specifier has no second segment
    pub command: String,
    pub args: Vec<String>,
}

impl Specifier {
    /// Split a specifier on `:`. Accepts any string; unclaimed input simply
    /// produces [`Protocol::Other`].
    pub fn parse(specifier: &str) -> Self {
        let mut segments = specifier.split(':');
        let protocol = Protocol::from_segment(segments.next().unwrap_or_default());
        let command = segments.next().unwrap_or_default().to_string();
        let args = segments.map(str::to_string).collect();

        Self {
            protocol,
            command,
            args,
        }
    }

    /// Install target for `brew:`/`cask:`: the command, or the caller's
    /// package name when the command is empty
    pub fn target<'a>(&'a self, package_name: &'a str) -> &'a str {
        if self.command.is_empty() {
            package_name
        } else {
            &self.command
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.command)?;
        for arg in &self.args {
            write!(f, ":{}", arg)?;
        }
        Ok(())
    }
}
