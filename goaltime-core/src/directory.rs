//! Collaborator interfaces and the goal directory cache
//!
//! The library depends on two external read-only collaborators: an event
//! source that yields raw start/stop log entries, and a goal source that
//! resolves goal metadata. Both are traits so the application layer can
//! plug in an HTTP client and tests can plug in fixtures.
//!
//! [`GoalDirectory`] wraps a [`GoalSource`] with a read-through memoizing
//! cache. The cache is an explicit object owned by the computation context
//! rather than process-wide state, and its interior mutexes make it safe to
//! share across concurrent attribution runs. Goal metadata is assumed
//! immutable for the lifetime of the directory; there is no invalidation.

use crate::types::{Goal, LogEntry, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Source of raw start/stop log entries
pub trait EventSource {
    /// Fetch all log entries from the last `lookback_days` days
    ///
    /// Entries may include marker types other than Started/Stopped and may
    /// fall outside the requested window; the caller filters. Failures are
    /// surfaced unmodified, no retry is attempted here.
    fn fetch_events(&self, lookback_days: i64) -> Result<Vec<LogEntry>>;
}

/// Source of goal metadata
pub trait GoalSource {
    /// Resolve a goal by id; `None` when no such goal exists
    fn fetch_goal(&self, id: &str) -> Result<Option<Goal>>;

    /// Resolve goals by name; empty when no goal matches
    fn fetch_goals_by_name(&self, name: &str) -> Result<Vec<Goal>>;
}

/// Read-through memoizing cache over a [`GoalSource`]
///
/// Lookups that hit the source are cached by id and by name; misses are not
/// cached and will be retried on the next lookup.
pub struct GoalDirectory<S> {
    source: S,
    by_id: Mutex<HashMap<String, Goal>>,
    by_name: Mutex<HashMap<String, Vec<Goal>>>,
}

impl<S: GoalSource> GoalDirectory<S> {
    /// Create a directory backed by the given source
    pub fn new(source: S) -> Self {
        Self {
            source,
            by_id: Mutex::new(HashMap::new()),
            by_name: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a goal by id, memoized
    pub fn goal(&self, id: &str) -> Result<Option<Goal>> {
        if let Some(goal) = self.by_id.lock().unwrap().get(id) {
            return Ok(Some(goal.clone()));
        }

        let fetched = self.source.fetch_goal(id)?;

        if let Some(goal) = &fetched {
            self.by_id
                .lock()
                .unwrap()
                .insert(id.to_string(), goal.clone());
        }

        Ok(fetched)
    }

    /// Look up goals by name, memoized
    ///
    /// More than one match is unusual but not fatal: a warning is logged and
    /// all matches are returned for the caller to disambiguate.
    pub fn goals_by_name(&self, name: &str) -> Result<Vec<Goal>> {
        if let Some(goals) = self.by_name.lock().unwrap().get(name) {
            return Ok(goals.clone());
        }

        let fetched = self.source.fetch_goals_by_name(name)?;

        if fetched.len() > 1 {
            log::warn!("More than one goal with name {:?} found", name);
        }

        if !fetched.is_empty() {
            self.by_name
                .lock()
                .unwrap()
                .insert(name.to_string(), fetched.clone());
        }

        Ok(fetched)
    }
}
