//! Chronological walk of a normalized timeline
//!
//! Steps through the distinct instants of a boundary-complete timeline,
//! maintains the set of currently active goals, and attributes each
//! interval's seconds to the active goals (propagating up the goal DAG) or
//! to the Untracked bucket when nothing is running.

use crate::directory::{GoalDirectory, GoalSource};
use crate::propagate::add_goal_durations;
use crate::timeline::Timeline;
use crate::types::{DurationTotals, EventKind, Result, Timestamp, TrackerError, UNTRACKED_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for the duration walk
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// How concurrently active goals share an interval.
    ///
    /// With `true` (the default) the interval is divided evenly so total
    /// tracked time never exceeds elapsed wall-clock time. With `false`
    /// every active goal receives full credit - deliberate double counting,
    /// useful for "time goal X was running" regardless of what else ran.
    #[serde(default = "default_true")]
    pub split_overlapping: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            split_overlapping: true,
        }
    }
}

impl AttributionConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable overlap splitting
    pub fn with_split_overlapping(mut self, enabled: bool) -> Self {
        self.split_overlapping = enabled;
        self
    }
}

/// Walk a normalized timeline and attribute every interval's duration
///
/// The timeline must be boundary-complete (see
/// [`Timeline::cap_and_clean`]): every instant lies in
/// `[start_time, end_time]` and every start has a matching stop. Each
/// interval between consecutive instants is credited to the goals active
/// during it, propagated up the DAG via the directory's parent links; time
/// with no active goal accumulates under [`UNTRACKED_ID`].
///
/// # Errors
/// [`TrackerError::NegativeInterval`] if instants are mis-ordered (cannot
/// happen after normalization and is treated as a fatal invariant
/// violation), plus any directory failure surfaced during propagation.
pub fn attribute_durations<S: GoalSource>(
    timeline: &Timeline,
    start_time: Timestamp,
    directory: &GoalDirectory<S>,
    config: AttributionConfig,
) -> Result<DurationTotals> {
    let mut totals = DurationTotals::new();
    totals.insert(UNTRACKED_ID.to_string(), 0.0);

    // Accumulated seconds per currently active goal
    let mut active: HashMap<String, f64> = HashMap::new();
    let mut previous_time = start_time;

    for current_time in timeline.times() {
        let num_active = active.len();

        let raw_duration = (current_time - previous_time)
            .to_std()
            .map_err(|_| TrackerError::NegativeInterval {
                previous: previous_time,
                current: current_time,
            })?
            .as_secs_f64();

        let effective_duration = if config.split_overlapping && num_active > 0 {
            raw_duration / num_active as f64
        } else {
            raw_duration
        };

        for (goal_id, accumulated) in active.iter_mut() {
            *accumulated += effective_duration;
            add_goal_durations(&mut totals, directory, goal_id, effective_duration)?;
        }

        if num_active == 0 {
            *totals.entry(UNTRACKED_ID.to_string()).or_insert(0.0) += raw_duration;
            log::trace!("Adding {}s to Untracked", raw_duration);
        }

        // Apply this instant's events before advancing
        for event in timeline.events_at(current_time) {
            match event.kind {
                EventKind::Started => {
                    log::debug!("Goal {} becomes active at {}", event.goal_id, current_time);
                    active.insert(event.goal_id.clone(), 0.0);
                }
                EventKind::Stopped => {
                    if let Some(seconds) = active.remove(&event.goal_id) {
                        log::debug!(
                            "Goal {} stops at {} after {}s of credit",
                            event.goal_id,
                            current_time,
                            seconds
                        );
                    }
                }
            }
        }

        previous_time = current_time;
    }

    Ok(totals)
}
