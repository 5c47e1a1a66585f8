use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A subject offered on the home menu.
///
/// Parsing never fails: anything that is not a known subject becomes `Unknown`,
/// which catalogs answer with empty content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Plant,
    Animal,
    Physics,
    Unknown,
}

impl Subject {
    /// All subjects with content, in menu order.
    pub const KNOWN: [Subject; 3] = [Subject::Plant, Subject::Animal, Subject::Physics];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Plant => "plant",
            Subject::Animal => "animal",
            Subject::Physics => "physics",
            Subject::Unknown => "unknown",
        }
    }

    /// Parse an optional raw value, e.g. a route argument that may be missing.
    #[must_use]
    pub fn from_optional(value: Option<&str>) -> Self {
        value.map_or(Subject::Unknown, Subject::from)
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        !matches!(self, Subject::Unknown)
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        let value = value.trim();
        Subject::KNOWN
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Subject::Unknown)
    }
}

impl FromStr for Subject {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Subject::from(s))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── GRADE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("invalid grade: {raw:?}")]
    Invalid { raw: String },
}

/// School grade the content is written for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map(Grade)
            .map_err(|_| GradeError::Invalid { raw: s.to_string() })
    }
}

impl fmt::Debug for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade({})", self.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
