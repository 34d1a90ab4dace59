// codegen-preview: Target code formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code flavor requested from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Curl,
    Python,
    Js,
    Ts,
}

impl Format {
    /// Tab order.
    pub const ALL: [Format; 4] = [Format::Curl, Format::Python, Format::Js, Format::Ts];

    /// Identifier sent as `language` on the wire.
    pub fn id(self) -> &'static str {
        match self {
            Format::Curl => "curl",
            Format::Python => "python",
            Format::Js => "js",
            Format::Ts => "ts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::Curl => "cURL",
            Format::Python => "Python API",
            Format::Js => "JS API",
            Format::Ts => "TS API",
        }
    }

    /// Language tag handed to the syntax highlighter.
    pub fn highlight_tag(self) -> &'static str {
        match self {
            Format::Curl => "bash",
            Format::Python => "python",
            Format::Js => "javascript",
            Format::Ts => "typescript",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported format '{0}' (expected one of: curl, python, js, ts)")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
