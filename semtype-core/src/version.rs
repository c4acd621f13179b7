//! Version triples and the bump rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::differ::Classification;

/// A `Major.Minor.Patch` version, ordered lexicographically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// A version string that is not exactly three dot-separated integers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version '{input}': expected MAJOR.MINOR.PATCH")]
pub struct ParseVersionError {
    pub input: String,
}

/// A bump that would push a component to `u64::MAX`, which no longer parses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("version {version} cannot take a {classification} bump without overflowing")]
pub struct VersionOverflow {
    pub version: Version,
    pub classification: Classification,
}

/// Largest value a component may hold after a bump.
const MAX_COMPONENT: u64 = u64::MAX - 1;

fn increment(component: u64) -> Option<u64> {
    component.checked_add(1).filter(|&n| n <= MAX_COMPONENT)
}

impl Version {
    /// The starting point when no usable state exists.
    pub const BASELINE: Version = Version::new(0, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The next version for a given classification.
    ///
    /// The result is always strictly greater than `self`, and always
    /// parses back. A bump that cannot satisfy both is refused.
    pub fn bump(self, classification: Classification) -> Result<Version, VersionOverflow> {
        let overflow = || VersionOverflow {
            version: self,
            classification,
        };
        let next = match classification {
            Classification::Breaking => {
                Version::new(increment(self.major).ok_or_else(overflow)?, 0, 0)
            }
            Classification::Additive => {
                Version::new(self.major, increment(self.minor).ok_or_else(overflow)?, 0)
            }
            Classification::NoChange => Version::new(
                self.major,
                self.minor,
                increment(self.patch).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }

    /// Parse a persisted version, falling back to the baseline.
    ///
    /// Returns the parse error alongside so the caller can report it.
    pub fn parse_or_baseline(input: &str) -> (Version, Option<ParseVersionError>) {
        match input.parse() {
            Ok(version) => (version, None),
            Err(e) => (Version::BASELINE, Some(e)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(err());
        }

        let major = parse_component(parts[0]).ok_or_else(err)?;
        let minor = parse_component(parts[1]).ok_or_else(err)?;
        let patch = parse_component(parts[2]).ok_or_else(err)?;
        if major > MAX_COMPONENT || minor > MAX_COMPONENT || patch > MAX_COMPONENT {
            return Err(err());
        }

        Ok(Version::new(major, minor, patch))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
