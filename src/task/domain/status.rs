//! Task lifecycle status and its display color.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color shown for statuses that are not recognised.
const FALLBACK_COLOR: u8 = 3;

/// Task lifecycle status.
///
/// Declaration order is the fixed dashboard order used by
/// [`super::group_by_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created and waiting for an operator.
    #[default]
    Ready,
    /// At least one operator started work.
    InProgress,
    /// Work finished.
    Completed,
    /// Work stopped because of a defect.
    Defect,
    /// Work abandoned by the operator working it.
    Cancelled,
}

impl TaskStatus {
    /// Every status in dashboard order.
    pub const ALL: [Self; 5] = [
        Self::Ready,
        Self::InProgress,
        Self::Completed,
        Self::Defect,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Defect => "defect",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready to Work",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Defect => "Defect",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns the kanban color index for the status.
    #[must_use]
    pub const fn color(self) -> u8 {
        match self {
            Self::Ready => 0,
            Self::InProgress => 1,
            Self::Completed => 10,
            Self::Defect => 2,
            Self::Cancelled => FALLBACK_COLOR,
        }
    }

    /// Returns `true` for statuses no operator can resume work from.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Defect | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "ready" => Ok(Self::Ready),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "defect" => Ok(Self::Defect),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Returns the color for a raw stored status, falling back to the cancelled
/// color for values this build does not know.
#[must_use]
pub fn color_for_stored_status(value: &str) -> u8 {
    TaskStatus::try_from(value).map_or(FALLBACK_COLOR, TaskStatus::color)
}
