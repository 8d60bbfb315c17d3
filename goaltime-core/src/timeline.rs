//! Event timeline construction and interval normalization
//!
//! A [`Timeline`] groups events by instant in a sorted map, so "walk the
//! distinct timestamps in ascending order" is a property of the structure
//! rather than of insertion order. [`Timeline::cap_and_clean`] turns a raw
//! timeline into a boundary-complete one: after it returns, every goal that
//! starts inside the window also stops inside it, and vice versa.

use crate::time::parse_wire_timestamp;
use crate::types::{Event, EventKind, LogEntry, Result, Timestamp, TrackerError};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Events grouped by instant, ordered chronologically
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: BTreeMap<Timestamp, Vec<Event>>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from raw wire records
    ///
    /// Entries whose marker type is not Started/Stopped are skipped, as are
    /// entries outside `[start_time, end_time]`. Remaining entries are
    /// parsed and grouped by instant.
    pub fn from_entries(
        entries: &[LogEntry],
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> Result<Self> {
        let mut timeline = Self::new();

        for entry in entries {
            let kind = match entry.kind.as_str() {
                "Started" => EventKind::Started,
                "Stopped" => EventKind::Stopped,
                other => {
                    log::trace!("Skipping log entry of type {:?}", other);
                    continue;
                }
            };

            let timestamp = parse_wire_timestamp(&entry.date)?;

            if timestamp < start_time || timestamp > end_time {
                continue;
            }

            timeline.push(Event::new(timestamp, kind, entry.text.clone()));
        }

        log::debug!(
            "Built timeline with {} distinct instants between {} and {}",
            timeline.entries.len(),
            start_time,
            end_time
        );

        Ok(timeline)
    }

    /// Append an event at its own timestamp
    pub fn push(&mut self, event: Event) {
        self.entries.entry(event.timestamp).or_default().push(event);
    }

    /// All distinct instants in ascending order
    pub fn times(&self) -> Vec<Timestamp> {
        self.entries.keys().copied().collect()
    }

    /// Events scheduled at the given instant
    pub fn events_at(&self, time: Timestamp) -> &[Event] {
        self.entries.get(&time).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of events across all instants
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Normalize the timeline so every interval is fully bounded
    ///
    /// Steps:
    /// 1. Seed `start_time` and `end_time` as instants (possibly empty).
    /// 2. Discard Stopped events at `start_time` (their start lies before
    ///    the window, the stop itself contributes nothing) and Started
    ///    events at `end_time` (nothing can accrue after window close).
    /// 3. Walk the instants in order with a working active-set. A Stopped
    ///    event with no matching start means the goal began before the
    ///    window: synthesize a virtual Started at `start_time`.
    /// 4. Goals still active at the end get a virtual Stopped at `end_time`,
    ///    clipping them to the window.
    ///
    /// Fails with [`TrackerError::InconsistentState`] on a double start,
    /// which signals overlapping tracking entries upstream.
    pub fn cap_and_clean(&mut self, start_time: Timestamp, end_time: Timestamp) -> Result<()> {
        for boundary in [start_time, end_time] {
            if let Entry::Vacant(slot) = self.entries.entry(boundary) {
                slot.insert(Vec::new());
            }
        }

        if let Some(events) = self.entries.get_mut(&start_time) {
            events.retain(|e| e.kind != EventKind::Stopped);
        }

        if let Some(events) = self.entries.get_mut(&end_time) {
            events.retain(|e| e.kind != EventKind::Started);
        }

        let times = self.times();
        let mut active: HashMap<String, Event> = HashMap::new();

        for time in times {
            // The event list at start_time may grow below while a later
            // instant is being processed, but instants are visited once, so
            // a snapshot per instant is safe.
            let events = self.events_at(time).to_vec();

            for event in events {
                match event.kind {
                    EventKind::Started => {
                        if active.contains_key(&event.goal_id) {
                            return Err(TrackerError::InconsistentState {
                                goal_id: event.goal_id,
                                at: time,
                            });
                        }
                        active.insert(event.goal_id.clone(), event);
                    }
                    EventKind::Stopped => {
                        if active.remove(&event.goal_id).is_some() {
                            continue;
                        }

                        // No matching start inside the window: the goal was
                        // already running at window open
                        log::debug!(
                            "Goal {} stopped at {} without an in-window start; \
                             synthesizing a start at window open",
                            event.goal_id,
                            time
                        );
                        self.push(Event::new(start_time, EventKind::Started, event.goal_id));
                    }
                }
            }
        }

        // Anything still active never stopped before window close: cap it
        for (goal_id, event) in active {
            if event.kind == EventKind::Stopped {
                return Err(TrackerError::InconsistentState {
                    goal_id,
                    at: event.timestamp,
                });
            }

            log::debug!(
                "Goal {} still active at window close; synthesizing a stop",
                goal_id
            );
            self.push(Event::new(end_time, EventKind::Stopped, goal_id));
        }

        Ok(())
    }
}
