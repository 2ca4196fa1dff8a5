use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::str::FromStr;

/// Grievance status enum matching database enum
///
/// Every status may move to every other status; none is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "grievance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GrievanceStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl GrievanceStatus {
    pub const ALL: [GrievanceStatus; 4] = [
        GrievanceStatus::Pending,
        GrievanceStatus::InProgress,
        GrievanceStatus::Resolved,
        GrievanceStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrievanceStatus::Pending => "pending",
            GrievanceStatus::InProgress => "in_progress",
            GrievanceStatus::Resolved => "resolved",
            GrievanceStatus::Rejected => "rejected",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            GrievanceStatus::Pending => "Pending",
            GrievanceStatus::InProgress => "In Progress",
            GrievanceStatus::Resolved => "Resolved",
            GrievanceStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrievanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrievanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown grievance status '{}'", s))
    }
}

/// Status choice for `<select>` elements
#[derive(Debug, Clone, Serialize)]
pub struct StatusChoice {
    pub value: &'static str,
    pub label: &'static str,
}

impl GrievanceStatus {
    pub fn choices() -> Vec<StatusChoice> {
        Self::ALL
            .iter()
            .map(|s| StatusChoice {
                value: s.as_str(),
                label: s.label(),
            })
            .collect()
    }
}
