//! Student rows as delivered by the waiting step endpoint.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One learner currently sitting in the peer waiting step.
///
/// Rows are immutable once received. Anything derived for display (such as
/// the relative "time spent" string) is computed at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    /// Learner username; unique within a single list.
    pub username: String,
    /// Number of peers this learner has assessed (or a plain flag on older payloads).
    #[serde(default)]
    pub graded: GradeTally,
    /// Number of peer responses this learner has received.
    #[serde(default)]
    pub graded_by: GradeTally,
    /// When the learner entered the current step.
    pub created_at: Timestamp,
    /// Staff assessment status (e.g. "waiting", "submitted").
    #[serde(default)]
    pub staff_grade_status: String,
    /// Workflow status of the learner's submission.
    #[serde(default)]
    pub workflow_status: String,
}

/// A count that the upstream API may send as a boolean, an integer or a
/// numeric string depending on the field and server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradeTally {
    Flag(bool),
    Count(u64),
    Text(String),
}

impl Default for GradeTally {
    fn default() -> Self {
        GradeTally::Text(String::new())
    }
}

impl GradeTally {
    /// Numeric view of the tally when one exists.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            GradeTally::Count(count) => Some(*count),
            GradeTally::Text(text) => text.trim().parse().ok(),
            GradeTally::Flag(_) => None,
        }
    }
}

impl fmt::Display for GradeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeTally::Flag(true) => f.write_str("yes"),
            GradeTally::Flag(false) => f.write_str("no"),
            GradeTally::Count(count) => write!(f, "{count}"),
            GradeTally::Text(text) => f.write_str(text),
        }
    }
}

/// Point in time accepted either as epoch milliseconds or as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Timestamp)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(millis) => {
                Timestamp::from_millis(millis).ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
            }
            RawTimestamp::FractionalMillis(millis) => Timestamp::from_millis(millis.round() as i64)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}"))),
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|parsed| Timestamp(parsed.with_timezone(&Utc)))
                .map_err(|error| D::Error::custom(format!("invalid timestamp '{text}': {error}"))),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_row_accepts_mixed_tally_shapes() {
        let row: StudentRow = serde_json::from_value(json!({
            "username": "myusername",
            "graded": false,
            "graded_by": "2",
            "created_at": 1_700_000_000_000_i64,
            "staff_grade_status": "waiting",
            "workflow_status": ""
        }))
        .expect("row");

        assert_eq!(row.graded, GradeTally::Flag(false));
        assert_eq!(row.graded_by.as_count(), Some(2));
        assert_eq!(row.created_at, Timestamp::from_millis(1_700_000_000_000).expect("in range"));
    }

    #[test]
    fn timestamp_parses_rfc3339_strings() {
        let row: StudentRow = serde_json::from_value(json!({
            "username": "timmy_turner",
            "graded": 3,
            "graded_by": 1,
            "created_at": "2024-02-01T12:00:00+00:00"
        }))
        .expect("row");

        assert_eq!(row.created_at.as_datetime().to_rfc3339(), "2024-02-01T12:00:00+00:00");
        assert_eq!(row.graded.as_count(), Some(3));
        assert_eq!(row.staff_grade_status, "");
    }

    #[test]
    fn timestamp_rejects_garbage() {
        let result: Result<Timestamp, _> = serde_json::from_value(json!("yesterday"));
        assert!(result.is_err());
    }

    #[test]
    fn tally_display_matches_wire_value() {
        assert_eq!(GradeTally::Count(4).to_string(), "4");
        assert_eq!(GradeTally::Text("2".into()).to_string(), "2");
        assert_eq!(GradeTally::Flag(true).to_string(), "yes");
        assert_eq!(GradeTally::default().to_string(), "");
    }
}
