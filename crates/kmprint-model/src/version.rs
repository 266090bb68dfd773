//! Metadata format versions
//!
//! A `VersionTag` is the `MAJOR.MINOR.PATCH` triple stamped on every metadata
//! record. Ordering is lexicographic over the three components.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Metadata format version (MAJOR.MINOR.PATCH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTag {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTag {
    /// Create a new version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        VersionTag { major, minor, patch }
    }

    /// Parse a version string such as `1.8.0`
    pub fn parse(s: &str) -> ModelResult<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(ModelError::InvalidVersion(format!(
                "expected MAJOR.MINOR.PATCH, got '{}'",
                s
            )));
        }

        let component = |label: &str, text: &str| -> ModelResult<u32> {
            text.parse()
                .map_err(|_| ModelError::InvalidVersion(format!("invalid {} version: {}", label, text)))
        };

        Ok(VersionTag {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Build a version from the integer array form used by decoders
    pub fn from_array(parts: &[u32]) -> Self {
        let at = |i: usize| parts.get(i).copied().unwrap_or(0);
        VersionTag::new(at(0), at(1), at(2))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionTag::parse(s)
    }
}

impl TryFrom<String> for VersionTag {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VersionTag::parse(&value)
    }
}

impl From<VersionTag> for String {
    fn from(value: VersionTag) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let v = VersionTag::parse("1.8.0").unwrap();
        assert_eq!(v, VersionTag::new(1, 8, 0));
        assert_eq!(v.to_string(), "1.8.0");
    }

    #[test]
    fn test_parse_rejects_short_versions() {
        assert!(VersionTag::parse("1.8").is_err());
        assert!(VersionTag::parse("1.x.0").is_err());
        assert!(VersionTag::parse("").is_err());
    }

    #[test]
    fn test_version_ordering() {
        let v = |s: &str| VersionTag::parse(s).unwrap();
        assert!(v("1.7.1") < v("1.8.0"));
        assert!(v("2.0.0") > v("1.9.99"));
        assert!(v("2.1.0") < v("2.1.1"));
        assert_eq!(v("2.2.0"), VersionTag::new(2, 2, 0));
    }

    #[test]
    fn test_from_array_pads_missing_components() {
        assert_eq!(VersionTag::from_array(&[1, 4]), VersionTag::new(1, 4, 0));
        assert_eq!(VersionTag::from_array(&[2, 1, 0, 9]), VersionTag::new(2, 1, 0));
    }

    #[test]
    fn test_serde_string_form() {
        let v: VersionTag = serde_json::from_str("\"2.1.0\"").unwrap();
        assert_eq!(v, VersionTag::new(2, 1, 0));
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2.1.0\"");
        assert!(serde_json::from_str::<VersionTag>("\"two\"").is_err());
    }
}
