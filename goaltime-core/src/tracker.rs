//! Main tracker API
//!
//! [`Tracker`] is the entry point of the library: it owns the event source
//! and the goal directory, and exposes the one exported operation -
//! computing accumulated goal durations over an inclusive calendar date
//! range.

use crate::attribution::{attribute_durations, AttributionConfig};
use crate::directory::{EventSource, GoalDirectory, GoalSource};
use crate::time::{lookback_days, window_from_dates};
use crate::timeline::Timeline;
use crate::types::{GoalDuration, Result, UNTRACKED_ID};
use chrono::Utc;
use std::collections::BTreeMap;

/// The main tracker struct - entry point for duration attribution
///
/// Generic over its two collaborators so the application layer can supply
/// an HTTP-backed client and tests can supply in-memory fixtures. The goal
/// directory cache lives for the lifetime of the tracker and is shared
/// across invocations.
pub struct Tracker<E, S> {
    events: E,
    directory: GoalDirectory<S>,
}

impl<E: EventSource, S: GoalSource> Tracker<E, S> {
    /// Create a tracker from an event source and a goal source
    pub fn new(events: E, goals: S) -> Self {
        Self {
            events,
            directory: GoalDirectory::new(goals),
        }
    }

    /// The goal directory, for ad-hoc metadata lookups
    pub fn directory(&self) -> &GoalDirectory<S> {
        &self.directory
    }

    /// Attribute tracked time to goals over an inclusive date range
    ///
    /// Both dates are `YYYY-MM-DD` strings interpreted at local midnight;
    /// `end_date` is inclusive. Enough lookback is requested from the event
    /// source to cover the window start, events are filtered to the window,
    /// the timeline is normalized and walked, and every interval's seconds
    /// are credited to the active goals and their ancestors. Time with no
    /// active goal lands in the `"Untracked"` bucket.
    ///
    /// # Arguments
    /// * `start_date` - first day of the window
    /// * `end_date` - last day of the window (inclusive)
    /// * `config` - overlap-splitting policy
    ///
    /// # Returns
    /// Map from goal id (or `"Untracked"`) to display name and accumulated
    /// seconds.
    pub fn goal_durations(
        &self,
        start_date: &str,
        end_date: &str,
        config: AttributionConfig,
    ) -> Result<BTreeMap<String, GoalDuration>> {
        log::info!("Computing goal durations from {} to {}", start_date, end_date);

        let (start_time, end_time) = window_from_dates(start_date, end_date)?;
        log::debug!("Window resolved to [{}, {})", start_time, end_time);

        let lookback = lookback_days(Utc::now(), start_time);
        let entries = self.events.fetch_events(lookback)?;
        log::debug!(
            "Fetched {} log entries over a {}-day lookback",
            entries.len(),
            lookback
        );

        let mut timeline = Timeline::from_entries(&entries, start_time, end_time)?;
        timeline.cap_and_clean(start_time, end_time)?;

        let totals = attribute_durations(&timeline, start_time, &self.directory, config)?;

        // Merge totals with display names for presentation
        let mut durations = BTreeMap::new();

        for (goal_id, seconds) in totals {
            let name = if goal_id == UNTRACKED_ID {
                UNTRACKED_ID.to_string()
            } else {
                match self.directory.goal(&goal_id)? {
                    Some(goal) => goal.name,
                    None => {
                        log::warn!("No metadata for goal {}; using its id as name", goal_id);
                        goal_id.clone()
                    }
                }
            };

            durations.insert(goal_id, GoalDuration { name, seconds });
        }

        Ok(durations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Goal, LogEntry};
    use std::collections::HashMap;

    struct FixtureEvents(Vec<LogEntry>);

    impl EventSource for FixtureEvents {
        fn fetch_events(&self, _lookback_days: i64) -> Result<Vec<LogEntry>> {
            Ok(self.0.clone())
        }
    }

    struct FixtureGoals(HashMap<String, Goal>);

    impl GoalSource for FixtureGoals {
        fn fetch_goal(&self, id: &str) -> Result<Option<Goal>> {
            Ok(self.0.get(id).cloned())
        }

        fn fetch_goals_by_name(&self, name: &str) -> Result<Vec<Goal>> {
            Ok(self.0.values().filter(|g| g.name == name).cloned().collect())
        }
    }

    fn entry(date: &str, kind: &str, text: &str) -> LogEntry {
        LogEntry {
            date: date.to_string(),
            kind: kind.to_string(),
            text: text.to_string(),
        }
    }

    fn goal(id: &str, name: &str, parents: &[&str]) -> (String, Goal) {
        (
            id.to_string(),
            Goal {
                id: id.to_string(),
                name: name.to_string(),
                parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    // Test events sit in the middle of a three-day window so they stay
    // inside it for any local timezone offset.

    #[test]
    fn test_unknown_goal_falls_back_to_id() {
        let tracker = Tracker::new(
            FixtureEvents(vec![
                entry("2024-01-02T12:00:00Z", "Started", "mystery"),
                entry("2024-01-02T13:00:00Z", "Stopped", "mystery"),
            ]),
            FixtureGoals(HashMap::new()),
        );

        let durations = tracker
            .goal_durations("2024-01-01", "2024-01-03", AttributionConfig::new())
            .unwrap();

        assert_eq!(durations["mystery"].name, "mystery");
        assert_eq!(durations["mystery"].seconds, 3_600.0);
    }

    #[test]
    fn test_names_resolved_through_directory() {
        let tracker = Tracker::new(
            FixtureEvents(vec![
                entry("2024-01-02T12:00:00Z", "Started", "g1"),
                entry("2024-01-02T14:00:00Z", "Stopped", "g1"),
            ]),
            FixtureGoals(HashMap::from([goal("g1", "Reading", &[])])),
        );

        let durations = tracker
            .goal_durations("2024-01-01", "2024-01-03", AttributionConfig::new())
            .unwrap();

        assert_eq!(durations["g1"].name, "Reading");
        assert_eq!(durations["g1"].seconds, 7_200.0);
        assert_eq!(durations[UNTRACKED_ID].name, UNTRACKED_ID);
    }

    #[test]
    fn test_bad_date_surfaces() {
        let tracker = Tracker::new(FixtureEvents(vec![]), FixtureGoals(HashMap::new()));
        assert!(tracker
            .goal_durations("01/01/2024", "2024-01-02", AttributionConfig::new())
            .is_err());
    }
}
