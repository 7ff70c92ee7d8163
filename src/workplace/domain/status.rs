//! Administrative workplace status.

use super::ParseWorkplaceStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative status of a workplace.
///
/// The status is a label maintained by administrators. It is independent of
/// seat occupancy: an `Occupied` workplace may have free seats and a
/// `Maintenance` workplace still accepts seat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkplaceStatus {
    /// Ready for use.
    #[default]
    Available,
    /// Marked as occupied by an administrator.
    Occupied,
    /// Under maintenance.
    Maintenance,
    /// Taken out of service.
    Inactive,
}

impl WorkplaceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for WorkplaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkplaceStatus {
    type Error = ParseWorkplaceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseWorkplaceStatusError(value.to_owned())),
        }
    }
}
