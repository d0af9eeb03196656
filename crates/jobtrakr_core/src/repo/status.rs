//! Three-valued outcome shared by every repository operation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed status vocabulary returned to store callers.
///
/// Storage failures never escape repository operations as errors; callers
/// branch on this value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbStatus {
    /// Statement ran and, for update/delete, touched at least one row.
    Success,
    /// Preparation, execution, id allocation or commit failed.
    Error,
    /// Statement ran but matched zero rows.
    NoChanges,
}

impl DbStatus {
    /// Classifies an affected-row count from an update or delete.
    pub fn from_changes(changed: usize) -> Self {
        if changed > 0 {
            Self::Success
        } else {
            Self::NoChanges
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::NoChanges => "NoChanges",
        }
    }
}

impl Display for DbStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DbStatus;

    #[test]
    fn zero_changes_is_not_success() {
        assert_eq!(DbStatus::from_changes(0), DbStatus::NoChanges);
        assert_eq!(DbStatus::from_changes(3), DbStatus::Success);
    }

    #[test]
    fn serializes_with_vocabulary_names() {
        let json = serde_json::to_string(&DbStatus::NoChanges).unwrap();
        assert_eq!(json, "\"NoChanges\"");
        assert_eq!(DbStatus::Error.to_string(), "Error");
    }
}
