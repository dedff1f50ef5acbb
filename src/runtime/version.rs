//! Host build identification and version-dependent code translation
//!
//! Several host enumerations are flat integers on the wire. When a host
//! release inserts members in the middle of such an enumeration, every code
//! after the insertion point shifts. Scripts always speak the canonical
//! (latest) numbering; [`OrdinalTranslator`] corrects it for the detected
//! build using a table of [`InsertionPoint`] rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{VersionError, VersionResult};

/// Known host builds, in release order
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HostVersion {
    V1_0_335_2,
    V1_0_350_1,
    V1_0_372_2,
    V1_0_393_2,
    V1_0_463_1,
    V1_0_505_2,
    V1_0_573_1,
    V1_0_617_1,
    V1_0_678_1,
    V1_0_757_2,
    V1_0_791_2,
    V1_0_877_1,
    V1_0_944_2,
    V1_0_1011_1,
    V1_0_1032_1,
    V1_0_1103_2,
    V1_0_1180_2,
    V1_0_1290_1,
    V1_0_1365_1,
    V1_0_1493_0,
    V1_0_1604_0,
    V1_0_1737_0,
    V1_0_1868_0,
    V1_0_2060_0,
    V1_0_2189_0,
    V1_0_2372_0,
    V1_0_2545_0,
    V1_0_2699_0,
    V1_0_2802_0,
    V1_0_2944_0,
    V1_0_3095_0,
}

impl HostVersion {
    /// Every known build, oldest first
    pub const ALL: &'static [HostVersion] = &[
        HostVersion::V1_0_335_2,
        HostVersion::V1_0_350_1,
        HostVersion::V1_0_372_2,
        HostVersion::V1_0_393_2,
        HostVersion::V1_0_463_1,
        HostVersion::V1_0_505_2,
        HostVersion::V1_0_573_1,
        HostVersion::V1_0_617_1,
        HostVersion::V1_0_678_1,
        HostVersion::V1_0_757_2,
        HostVersion::V1_0_791_2,
        HostVersion::V1_0_877_1,
        HostVersion::V1_0_944_2,
        HostVersion::V1_0_1011_1,
        HostVersion::V1_0_1032_1,
        HostVersion::V1_0_1103_2,
        HostVersion::V1_0_1180_2,
        HostVersion::V1_0_1290_1,
        HostVersion::V1_0_1365_1,
        HostVersion::V1_0_1493_0,
        HostVersion::V1_0_1604_0,
        HostVersion::V1_0_1737_0,
        HostVersion::V1_0_1868_0,
        HostVersion::V1_0_2060_0,
        HostVersion::V1_0_2189_0,
        HostVersion::V1_0_2372_0,
        HostVersion::V1_0_2545_0,
        HostVersion::V1_0_2699_0,
        HostVersion::V1_0_2802_0,
        HostVersion::V1_0_2944_0,
        HostVersion::V1_0_3095_0,
    ];

    /// The newest build this crate knows about
    pub fn latest() -> Self {
        HostVersion::V1_0_3095_0
    }

    /// Dotted build string, e.g. `1.0.877.1`
    pub fn as_str(self) -> &'static str {
        match self {
            HostVersion::V1_0_335_2 => "1.0.335.2",
            HostVersion::V1_0_350_1 => "1.0.350.1",
            HostVersion::V1_0_372_2 => "1.0.372.2",
            HostVersion::V1_0_393_2 => "1.0.393.2",
            HostVersion::V1_0_463_1 => "1.0.463.1",
            HostVersion::V1_0_505_2 => "1.0.505.2",
            HostVersion::V1_0_573_1 => "1.0.573.1",
            HostVersion::V1_0_617_1 => "1.0.617.1",
            HostVersion::V1_0_678_1 => "1.0.678.1",
            HostVersion::V1_0_757_2 => "1.0.757.2",
            HostVersion::V1_0_791_2 => "1.0.791.2",
            HostVersion::V1_0_877_1 => "1.0.877.1",
            HostVersion::V1_0_944_2 => "1.0.944.2",
            HostVersion::V1_0_1011_1 => "1.0.1011.1",
            HostVersion::V1_0_1032_1 => "1.0.1032.1",
            HostVersion::V1_0_1103_2 => "1.0.1103.2",
            HostVersion::V1_0_1180_2 => "1.0.1180.2",
            HostVersion::V1_0_1290_1 => "1.0.1290.1",
            HostVersion::V1_0_1365_1 => "1.0.1365.1",
            HostVersion::V1_0_1493_0 => "1.0.1493.0",
            HostVersion::V1_0_1604_0 => "1.0.1604.0",
            HostVersion::V1_0_1737_0 => "1.0.1737.0",
            HostVersion::V1_0_1868_0 => "1.0.1868.0",
            HostVersion::V1_0_2060_0 => "1.0.2060.0",
            HostVersion::V1_0_2189_0 => "1.0.2189.0",
            HostVersion::V1_0_2372_0 => "1.0.2372.0",
            HostVersion::V1_0_2545_0 => "1.0.2545.0",
            HostVersion::V1_0_2699_0 => "1.0.2699.0",
            HostVersion::V1_0_2802_0 => "1.0.2802.0",
            HostVersion::V1_0_2944_0 => "1.0.2944.0",
            HostVersion::V1_0_3095_0 => "1.0.3095.0",
        }
    }

    /// Fail with `UnsupportedInVersion` unless this build is at least `since`
    pub fn require(self, item: impl Into<String>, since: HostVersion) -> VersionResult<()> {
        if self >= since {
            Ok(())
        } else {
            Err(VersionError::UnsupportedInVersion {
                item: item.into(),
                version: self,
                since,
            })
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('v');
        HostVersion::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == trimmed)
            .ok_or_else(|| VersionError::UnknownVersion(s.to_string()))
    }
}

impl TryFrom<String> for HostVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostVersion> for String {
    fn from(value: HostVersion) -> Self {
        value.as_str().to_string()
    }
}

/// One row of an insertion table: `count` members were inserted at canonical
/// position `ordinal` by build `since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Canonical ordinal of the first inserted member
    pub ordinal: i32,
    /// Number of members inserted there
    pub count: i32,
    /// First build that contains the inserted members
    pub since: HostVersion,
}

/// Translates canonical ordinals of one enumeration to and from the numbering
/// a given host build uses.
///
/// Rows must not overlap in canonical space. An append is just an insertion
/// at the end of the enumeration: it never shifts existing members, but the
/// appended member is still rejected on builds that predate it.
#[derive(Debug, Clone, Copy)]
pub struct OrdinalTranslator {
    name: &'static str,
    len: i32,
    insertions: &'static [InsertionPoint],
}

impl OrdinalTranslator {
    /// Create a translator for an enumeration of `len` canonical members
    pub const fn new(name: &'static str, len: i32, insertions: &'static [InsertionPoint]) -> Self {
        Self {
            name,
            len,
            insertions,
        }
    }

    /// Enumeration name (for diagnostics)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of canonical members
    pub fn len(&self) -> i32 {
        self.len
    }

    /// Insertion rows whose members are missing on `version`, highest ordinal first
    fn missing_on(&self, version: HostVersion) -> Vec<InsertionPoint> {
        let mut missing: Vec<InsertionPoint> = self
            .insertions
            .iter()
            .copied()
            .filter(|point| version < point.since)
            .collect();
        missing.sort_by(|a, b| b.ordinal.cmp(&a.ordinal));
        missing
    }

    /// Map a canonical value to the code `version` expects
    pub fn to_host(&self, canonical: i32, version: HostVersion) -> VersionResult<i32> {
        if canonical < 0 || canonical >= self.len {
            return Err(VersionError::OrdinalOutOfRange {
                enumeration: self.name,
                value: canonical,
            });
        }

        let mut value = canonical;
        for point in self.missing_on(version) {
            if canonical >= point.ordinal && canonical < point.ordinal + point.count {
                return Err(VersionError::UnsupportedInVersion {
                    item: format!("{} member {}", self.name, canonical),
                    version,
                    since: point.since,
                });
            }
            if canonical >= point.ordinal + point.count {
                value -= point.count;
            }
        }

        Ok(value)
    }

    /// Map a code reported by `version` back to its canonical value.
    ///
    /// Returns `None` for codes the canonical enumeration does not cover.
    pub fn to_canonical(&self, host: i32, version: HostVersion) -> Option<i32> {
        if host < 0 {
            return None;
        }

        let mut value = host;
        let mut missing = self.missing_on(version);
        missing.reverse();
        for point in missing {
            if value >= point.ordinal {
                value += point.count;
            }
        }

        if value < self.len { Some(value) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[InsertionPoint] = &[
        InsertionPoint {
            ordinal: 3,
            count: 1,
            since: HostVersion::V1_0_877_1,
        },
        InsertionPoint {
            ordinal: 7,
            count: 2,
            since: HostVersion::V1_0_1011_1,
        },
    ];

    const SAMPLE: OrdinalTranslator = OrdinalTranslator::new("Sample", 12, TABLE);

    #[test]
    fn test_version_parse_and_display() {
        let v: HostVersion = "1.0.877.1".parse().unwrap();
        assert_eq!(v, HostVersion::V1_0_877_1);
        assert_eq!(v.to_string(), "1.0.877.1");
        assert!("9.9.9.9".parse::<HostVersion>().is_err());
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(HostVersion::V1_0_335_2 < HostVersion::V1_0_877_1);
        assert_eq!(HostVersion::ALL.last().copied(), Some(HostVersion::latest()));
    }

    #[test]
    fn test_latest_build_is_identity() {
        for value in 0..SAMPLE.len() {
            assert_eq!(SAMPLE.to_host(value, HostVersion::latest()).unwrap(), value);
        }
    }

    #[test]
    fn test_multiple_insertions_compose() {
        let old = HostVersion::V1_0_335_2;
        assert_eq!(SAMPLE.to_host(2, old).unwrap(), 2);
        assert!(SAMPLE.to_host(3, old).is_err());
        assert_eq!(SAMPLE.to_host(4, old).unwrap(), 3);
        assert!(SAMPLE.to_host(7, old).is_err());
        assert!(SAMPLE.to_host(8, old).is_err());
        assert_eq!(SAMPLE.to_host(9, old).unwrap(), 6);
        assert_eq!(SAMPLE.to_host(11, old).unwrap(), 8);
    }

    #[test]
    fn test_partial_insertion_history() {
        // Between the two releases only the second row is missing
        let mid = HostVersion::V1_0_944_2;
        assert_eq!(SAMPLE.to_host(3, mid).unwrap(), 3);
        assert_eq!(SAMPLE.to_host(6, mid).unwrap(), 6);
        assert_eq!(SAMPLE.to_host(9, mid).unwrap(), 7);
    }

    #[test]
    fn test_to_canonical_inverts_to_host() {
        for version in [HostVersion::V1_0_335_2, HostVersion::V1_0_944_2, HostVersion::latest()] {
            for canonical in 0..SAMPLE.len() {
                if let Ok(host) = SAMPLE.to_host(canonical, version) {
                    assert_eq!(SAMPLE.to_canonical(host, version), Some(canonical));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            SAMPLE.to_host(12, HostVersion::latest()),
            Err(VersionError::OrdinalOutOfRange { .. })
        ));
        assert_eq!(SAMPLE.to_canonical(-1, HostVersion::latest()), None);
        assert_eq!(SAMPLE.to_canonical(12, HostVersion::latest()), None);
    }
}
