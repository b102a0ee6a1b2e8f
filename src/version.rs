use regex::Regex;

use crate::error::{InitError, Result};

/// Version triple parsed from a development branch name.
///
/// Only lives for one invocation; the branch name itself is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionTag {
    pub major: u64,
    pub minor: u64,
    pub revision: u64,
}

impl VersionTag {
    /// Creates a new VersionTag with the specified components.
    pub fn new(major: u64, minor: u64, revision: u64) -> Self {
        VersionTag {
            major,
            minor,
            revision,
        }
    }

    /// Parses a development branch name of the form `Major.Minor.Revision_Dev`.
    ///
    /// Components are ASCII digits only. A component that does not fit in a
    /// `u64` is rejected the same way as a malformed name.
    ///
    /// # Arguments
    /// * `raw` - Branch name exactly as given on the command line
    ///
    /// # Returns
    /// * `Ok(VersionTag)` - Successfully parsed version
    /// * `Err(InitError::InvalidFormat)` - If the name does not match
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(VersionTag::parse("1.0.1_Dev").unwrap(), VersionTag::new(1, 0, 1));
    /// assert!(VersionTag::parse("1.0.1").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || InitError::InvalidFormat {
            name: raw.to_string(),
        };

        let captures = Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)_Dev$")
            .ok()
            .and_then(|re| re.captures(raw))
            .ok_or_else(invalid)?;

        let component = |idx: usize| -> Result<u64> {
            captures
                .get(idx)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(invalid)
        };

        Ok(VersionTag::new(component(1)?, component(2)?, component(3)?))
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}
