//! Goal Time Attribution Library
//!
//! Attributes elapsed wall-clock time, recorded as a stream of start/stop
//! events tagged with a goal id, to a hierarchy of goals over a date range.
//! Goals form a DAG rather than a tree: a goal may have zero, one or many
//! parents, and time credited to a goal is also credited fractionally to
//! every ancestor, divided evenly across the parents at each level.
//!
//! # Architecture
//!
//! The library is intentionally minimal and focused on attribution:
//! - Reconstructs well-formed intervals from possibly-unbalanced events,
//!   clipped to the requested window
//! - Walks the intervals chronologically, splitting overlapping activity
//!   fairly (or double-counting on request)
//! - Propagates each credited duration up the goal DAG
//! - Buckets uncovered time as "Untracked"
//!
//! The library does NOT:
//! - Talk to the network or read the environment
//! - Persist anything
//! - Mutate the goal graph
//! - Format reports
//!
//! Data enters through two collaborator traits ([`EventSource`] and
//! [`GoalSource`]); the application layer (goaltime-cli) implements them
//! against a remote goal-tracking server.
//!
//! # Example Usage
//!
//! ```no_run
//! use goaltime_core::{AttributionConfig, EventSource, GoalSource, Tracker};
//! use goaltime_core::{Goal, LogEntry, Result};
//!
//! struct MyEvents;
//! impl EventSource for MyEvents {
//!     fn fetch_events(&self, _lookback_days: i64) -> Result<Vec<LogEntry>> {
//!         Ok(vec![]) // fetch from wherever events live
//!     }
//! }
//!
//! struct MyGoals;
//! impl GoalSource for MyGoals {
//!     fn fetch_goal(&self, _id: &str) -> Result<Option<Goal>> { Ok(None) }
//!     fn fetch_goals_by_name(&self, _name: &str) -> Result<Vec<Goal>> { Ok(vec![]) }
//! }
//!
//! let tracker = Tracker::new(MyEvents, MyGoals);
//! let durations = tracker
//!     .goal_durations("2024-01-01", "2024-01-07", AttributionConfig::new())
//!     .unwrap();
//!
//! for (goal_id, bucket) in &durations {
//!     println!("{}: {}s ({})", goal_id, bucket.seconds, bucket.name);
//! }
//! ```

// Public modules
pub mod attribution;
pub mod directory;
pub mod time;
pub mod timeline;
pub mod tracker;
pub mod types;

// Internal modules (not exposed in public API)
mod propagate;

// Re-export main types for convenience
pub use attribution::{attribute_durations, AttributionConfig};
pub use directory::{EventSource, GoalDirectory, GoalSource};
pub use timeline::Timeline;
pub use tracker::Tracker;
pub use types::{
    DurationTotals, Event, EventKind, Goal, GoalDuration, LogEntry, Result, Timestamp,
    TrackerError, UNTRACKED_ID,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
