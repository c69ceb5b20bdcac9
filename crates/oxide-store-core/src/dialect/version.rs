//! Datastore product versions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A `(major, minor, revision)` product version, totally ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Revision.
    pub revision: u32,
}

impl Version {
    /// Creates a new version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Returns whether this version is at least `major.minor`.
    #[must_use]
    pub const fn at_least(&self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    /// Returns whether this version is at least `major.minor.revision`.
    #[must_use]
    pub fn at_least_revision(&self, major: u32, minor: u32, revision: u32) -> bool {
        *self >= Self::new(major, minor, revision)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    /// Parses the leading numeric components of a version string.
    ///
    /// Accepts `"15"`, `"15.4"`, `"15.4.2"` and driver-reported strings
    /// such as `"8.0.33-log"` or `"10.14.2.0 - (1828579)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = [0_u32; 3];
        let mut seen = 0;
        for component in trimmed.split('.') {
            if seen == parts.len() {
                break;
            }
            let digits: String = component.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                break;
            }
            parts[seen] = digits
                .parse()
                .map_err(|_| CoreError::InvalidVersion(s.to_string()))?;
            seen += 1;
            if digits.len() != component.len() {
                break;
            }
        }
        if seen == 0 {
            return Err(CoreError::InvalidVersion(s.to_string()));
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!("15".parse::<Version>().unwrap(), Version::new(15, 0, 0));
        assert_eq!("15.4".parse::<Version>().unwrap(), Version::new(15, 4, 0));
        assert_eq!("15.4.2".parse::<Version>().unwrap(), Version::new(15, 4, 2));
    }

    #[test]
    fn test_parse_driver_strings() {
        assert_eq!(
            "8.0.33-log".parse::<Version>().unwrap(),
            Version::new(8, 0, 33)
        );
        assert_eq!(
            "10.14.2.0 - (1828579)".parse::<Version>().unwrap(),
            Version::new(10, 14, 2)
        );
        assert_eq!("12c".parse::<Version>().unwrap(), Version::new(12, 0, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "beta".parse::<Version>(),
            Err(CoreError::InvalidVersion(_))
        ));
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_ordering() {
        let v = Version::new(8, 0, 16);
        assert!(v.at_least(8, 0));
        assert!(!v.at_least(8, 1));
        assert!(v.at_least_revision(8, 0, 16));
        assert!(!Version::new(8, 0, 15).at_least_revision(8, 0, 16));
        assert!(Version::new(11, 0, 0) > Version::new(10, 50, 99));
    }
}
