//! Region identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Highest supported hierarchical level.
///
/// Levels are single decimal digits, so the textual form of a [`RegionId`]
/// (`level` immediately followed by `community_id`) can always be split back
/// into its two parts.
pub const MAX_LEVEL: u8 = 9;

/// Identity of a region: its hierarchical level and the community it was built from.
///
/// Displayed as the level digit concatenated with the community id, e.g.
/// level 3 community 154 is `"3154"`.
///
/// # Examples
///
/// ```
/// use travel_regions_types::id::RegionId;
///
/// let id = RegionId::new(3, 154).unwrap();
/// assert_eq!(id.to_string(), "3154");
/// assert_eq!("3154".parse::<RegionId>().unwrap(), id);
/// assert!(RegionId::new(10, 1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId {
    level: u8,
    community_id: i64,
}

impl RegionId {
    /// Returns `None` when `level` is outside `1..=MAX_LEVEL`.
    pub fn new(level: u8, community_id: i64) -> Option<Self> {
        is_valid_level(level).then_some(Self {
            level,
            community_id,
        })
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn community_id(&self) -> i64 {
        self.community_id
    }
}

/// True for levels in `1..=MAX_LEVEL`.
#[inline]
pub fn is_valid_level(level: u8) -> bool {
    (1..=MAX_LEVEL).contains(&level)
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level, self.community_id)
    }
}

/// Error returned when a string is not a valid region id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRegionIdError(String);

impl fmt::Display for ParseRegionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid region id {:?}", self.0)
    }
}

impl std::error::Error for ParseRegionIdError {}

impl FromStr for RegionId {
    type Err = ParseRegionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRegionIdError(s.to_string());

        let mut chars = s.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(invalid)?;
        let community_id = chars.as_str().parse::<i64>().map_err(|_| invalid())?;

        // Only the canonical form names a region: no leading zeros or signs.
        Self::new(level, community_id)
            .filter(|id| id.to_string() == s)
            .ok_or_else(invalid)
    }
}

impl Serialize for RegionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
