use serde::{Deserialize, Serialize};
use std::fmt;

/// One submitted traffic-violation report with its metadata and lifecycle
/// status. A row is created exactly once by the intake endpoint; afterwards
/// only `status` ever changes, and rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// UUID assigned at intake. Immutable, unique, the primary lookup key.
    pub complaint_id: String,
    /// Free-text identifier of the offending vehicle. Always present.
    pub vehicle_no: String,
    pub violation_type: Option<String>,
    pub location: Option<String>,
    /// Either both coordinates are present or both are absent when the
    /// client supplied unparsable values.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Incident date in `DD-MM-YYYY` display form, or the client's raw
    /// string when it was not parseable.
    pub date: String,
    /// Incident clock time, `HH:MM`.
    pub time: String,
    pub state: Option<String>,
    pub comment: Option<String>,
    /// Uploaded media path relative to the public static root, absent when
    /// no file was sent or the save failed.
    pub file_path: Option<String>,
    pub status: Status,
}

/// Triage state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Hold,
    Rejected,
    Completed,
}

impl Status {
    pub const NAMES: [&'static str; 4] = ["open", "hold", "rejected", "completed"];

    /// Case-insensitive parse. Anything outside the four values is `None`.
    pub fn parse(value: &str) -> Option<Status> {
        match value.to_ascii_lowercase().as_str() {
            "open" => Some(Status::Open),
            "hold" => Some(Status::Hold),
            "rejected" => Some(Status::Rejected),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Hold => "hold",
            Status::Rejected => "rejected",
            Status::Completed => "completed",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Open
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_casing() {
        assert_eq!(Status::parse("open"), Some(Status::Open));
        assert_eq!(Status::parse("HOLD"), Some(Status::Hold));
        assert_eq!(Status::parse("Rejected"), Some(Status::Rejected));
        assert_eq!(Status::parse("cOmPlEtEd"), Some(Status::Completed));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(Status::parse("closed"), None);
        assert_eq!(Status::parse(""), None);
        assert_eq!(Status::parse("open "), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }
}
