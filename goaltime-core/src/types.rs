//! Core types for the goal time attribution library
//!
//! This module defines the fundamental types shared by the timeline,
//! attribution and propagation stages, together with the library error type.
//! The core is purely computational - it never touches the network or the
//! environment; raw data enters through the collaborator traits in
//! [`crate::directory`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Bucket id for time during which no goal was active
pub const UNTRACKED_ID: &str = "Untracked";

/// Whether an event opens or closes a tracking interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The goal began running at this instant
    Started,
    /// The goal stopped running at this instant
    Stopped,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Started => write!(f, "Started"),
            EventKind::Stopped => write!(f, "Stopped"),
        }
    }
}

/// A single start/stop marker tied to one goal
///
/// Multiple events may share an identical timestamp (e.g. one goal stopping
/// exactly when another starts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Absolute instant of the marker
    pub timestamp: Timestamp,
    /// Started or Stopped
    pub kind: EventKind,
    /// Identifier of the goal this marker belongs to
    pub goal_id: String,
}

impl Event {
    /// Create an event for the given goal
    pub fn new(timestamp: Timestamp, kind: EventKind, goal_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            goal_id: goal_id.into(),
        }
    }
}

/// A raw wire record as produced by an event source, before parsing
///
/// `date` is an ISO-8601 instant string, `kind` is `"Started"`, `"Stopped"`
/// or some other marker type (ignored), and `text` carries the goal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 instant string (e.g. `2024-01-15T10:30:00Z`)
    pub date: String,
    /// Marker type; anything other than Started/Stopped is skipped
    #[serde(rename = "type")]
    pub kind: String,
    /// Goal identifier the marker refers to
    pub text: String,
}

/// A trackable activity node in the goal graph
///
/// Goals form a DAG, not a tree: a goal may have zero parents (a root), one,
/// or several. Goals are read-only for this library; ownership belongs to
/// the external goal directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal identifier
    pub id: String,
    /// Human-readable goal name
    pub name: String,
    /// Identifiers of this goal's parents (empty for a root)
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

/// Accumulated seconds per goal id, the sole output of the walk
///
/// Includes ancestor ids reached through propagation and the
/// [`UNTRACKED_ID`] sentinel.
pub type DurationTotals = HashMap<String, f64>;

/// One presentation bucket of the final result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDuration {
    /// Display name (the goal's name, or the id when unresolvable)
    pub name: String,
    /// Accumulated seconds attributed to this goal
    pub seconds: f64,
}

/// Errors that can occur during attribution
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A goal received two Started events with no intervening Stopped.
    /// Signals overlapping/duplicate tracking entries upstream; we abort
    /// rather than guess which entry is authoritative.
    #[error("goal {goal_id} started at {at} but is already active")]
    InconsistentState { goal_id: String, at: Timestamp },

    /// A computed interval duration came out negative, meaning events were
    /// not properly time-ordered after normalization.
    #[error("negative interval between {previous} and {current}")]
    NegativeInterval {
        previous: Timestamp,
        current: Timestamp,
    },

    /// The goal graph contains a cycle; propagation revisited a goal on its
    /// own path.
    #[error("goal graph cycle detected at {goal_id}")]
    CyclicGoalGraph { goal_id: String },

    /// A calendar date string could not be interpreted
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),

    /// A wire timestamp could not be parsed
    #[error("invalid timestamp: {raw}")]
    TimestampParse {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A collaborator (event source or goal directory) failed; surfaced
    /// unmodified, no retry is attempted
    #[error("source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TrackerError {
    /// Wrap a collaborator failure
    pub fn source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        TrackerError::Source(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_display() {
        assert_eq!(format!("{}", EventKind::Started), "Started");
        assert_eq!(format!("{}", EventKind::Stopped), "Stopped");
    }

    #[test]
    fn test_log_entry_wire_format() {
        let json = r#"{"date":"2024-01-15T10:30:00Z","type":"Started","text":"goal-1"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, "Started");
        assert_eq!(entry.text, "goal-1");
    }

    #[test]
    fn test_goal_defaults_to_no_parents() {
        let json = r#"{"id":"g1","name":"Reading"}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert!(goal.parent_ids.is_empty());
    }
}
