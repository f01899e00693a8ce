//! Closed string enumerations stored on purchase requests.
//!
//! Both enums persist as their canonical string form so the database stays
//! readable by other tools:
//! - `RequestStatus`: `TO_DO`, `IN_APPROVAL`, `APPROVED`, `REJECTED`, `PURCHASED`
//! - `Priority`: `Low`, `Normal`, `High`

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A string that does not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lifecycle status of a purchase request.
///
/// Any status may be written at any time; no transition rules exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    ToDo,
    InApproval,
    Approved,
    Rejected,
    Purchased,
}

impl RequestStatus {
    /// Canonical stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::ToDo => "TO_DO",
            RequestStatus::InApproval => "IN_APPROVAL",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Purchased => "PURCHASED",
        }
    }

    /// Every status, in lifecycle order.
    pub fn all() -> &'static [RequestStatus] {
        &[
            RequestStatus::ToDo,
            RequestStatus::InApproval,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Purchased,
        ]
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "in approval", "in-approval" and "IN_APPROVAL" alike.
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "TO_DO" | "TODO" => Ok(RequestStatus::ToDo),
            "IN_APPROVAL" => Ok(RequestStatus::InApproval),
            "APPROVED" => Ok(RequestStatus::Approved),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "PURCHASED" => Ok(RequestStatus::Purchased),
            _ => Err(UnknownVariant {
                kind: "request status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Canonical stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Normal, Priority::High]
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for RequestStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RequestStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Self>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Self>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RequestStatus::default(), RequestStatus::ToDo);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!("TO_DO".parse::<RequestStatus>().unwrap(), RequestStatus::ToDo);
        assert_eq!(
            "in approval".parse::<RequestStatus>().unwrap(),
            RequestStatus::InApproval
        );
        assert_eq!(
            "purchased".parse::<RequestStatus>().unwrap(),
            RequestStatus::Purchased
        );
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let err = "CANCELLED".parse::<RequestStatus>().unwrap_err();
        assert_eq!(err.kind, "request status");
        assert_eq!(err.to_string(), "unknown request status: \"CANCELLED\"");

        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_stored_form_matches_display() {
        for status in RequestStatus::all() {
            assert_eq!(status.to_string(), status.as_str());
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), *status);
        }
        for priority in Priority::all() {
            assert_eq!(priority.as_str().parse::<Priority>().unwrap(), *priority);
        }
    }

    #[test]
    fn test_serde_uses_stored_form() {
        let json = serde_json::to_string(&RequestStatus::InApproval).unwrap();
        assert_eq!(json, "\"IN_APPROVAL\"");
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"High\"");
    }
}
