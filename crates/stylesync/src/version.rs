//! Style-set versions and the bump policy.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::projection::ReplaceableStyle;

/// A `major.minor` style-set version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The version of a first export.
    pub const INITIAL: Version = Version { major: 1, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn incrementing_major(self) -> Self {
        Self {
            major: self.major.saturating_add(1),
            minor: 0,
        }
    }

    pub fn incrementing_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A string that is not `major.minor`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{0}', expected <major>.<minor>")]
pub struct VersionParseError(pub String);

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionParseError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Projected style lists of one export, by category.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedStyles<'a> {
    pub colors: &'a [ReplaceableStyle],
    pub text_styles: &'a [ReplaceableStyle],
}

/// Computes the version of a new export.
///
/// Checked in order, first match wins:
///
/// 1. No previous version: [`Version::INITIAL`].
/// 2. In either category, some previous identifier is missing from the new
///    set, or a style that was active before is now deprecated: major bump.
/// 3. The projected lists differ in any other way: minor bump.
/// 4. Otherwise the previous version is kept.
pub fn calculate_version(
    old: ProjectedStyles<'_>,
    new: ProjectedStyles<'_>,
    previous: Option<Version>,
) -> Version {
    let Some(previous) = previous else {
        return Version::INITIAL;
    };

    if did_remove_style(old.colors, new.colors) || did_remove_style(old.text_styles, new.text_styles)
    {
        previous.incrementing_major()
    } else if old.colors != new.colors || old.text_styles != new.text_styles {
        previous.incrementing_minor()
    } else {
        previous
    }
}

/// Whether some old identifier is gone from the new set, or an old active
/// style is missing or deprecated there.
fn did_remove_style(old: &[ReplaceableStyle], new: &[ReplaceableStyle]) -> bool {
    let old_ids: HashSet<&str> = old.iter().map(ReplaceableStyle::identifier).collect();
    let new_ids: HashSet<&str> = new.iter().map(ReplaceableStyle::identifier).collect();
    if old_ids.intersection(&new_ids).count() < old_ids.len() {
        return true;
    }

    let new_active: HashSet<&str> = active_identifiers(new).collect();
    active_identifiers(old).any(|id| !new_active.contains(id))
}

fn active_identifiers(styles: &[ReplaceableStyle]) -> impl Iterator<Item = &str> {
    styles
        .iter()
        .filter(|s| !s.is_deprecated())
        .map(ReplaceableStyle::identifier)
}
