//! Upward duration propagation through the goal DAG
//!
//! A unit of time spent on a goal is credited in full to that goal and
//! fractionally to every ancestor: at each level the duration is divided
//! evenly across the goal's parents. A goal reachable through several
//! distinct parent chains accumulates a contribution from every chain -
//! multi-parent spreading is intentional, not a bug to deduplicate.

use crate::directory::{GoalDirectory, GoalSource};
use crate::types::{DurationTotals, Result, TrackerError};

/// One pending credit: a goal, the seconds it receives, and the chain of
/// goal ids that led here (for cycle detection)
struct Frame {
    goal_id: String,
    duration: f64,
    path: Vec<String>,
}

/// Credit `duration` seconds to `goal_id` and, fractionally, to all of its
/// ancestors
///
/// Uses an explicit work-stack so deep hierarchies cannot exhaust the call
/// stack. The directory is the source of parent links; a goal the directory
/// cannot resolve is treated as parentless (credited, but propagation stops
/// there). A goal revisited on its own ancestor chain means the graph has a
/// cycle, which fails with [`TrackerError::CyclicGoalGraph`] instead of
/// looping forever.
pub fn add_goal_durations<S: GoalSource>(
    totals: &mut DurationTotals,
    directory: &GoalDirectory<S>,
    goal_id: &str,
    duration: f64,
) -> Result<()> {
    let mut stack = vec![Frame {
        goal_id: goal_id.to_string(),
        duration,
        path: Vec::new(),
    }];

    while let Some(frame) = stack.pop() {
        if frame.path.iter().any(|id| id == &frame.goal_id) {
            return Err(TrackerError::CyclicGoalGraph {
                goal_id: frame.goal_id,
            });
        }

        *totals.entry(frame.goal_id.clone()).or_insert(0.0) += frame.duration;
        log::trace!("Adding {}s to {}", frame.duration, frame.goal_id);

        let parent_ids = match directory.goal(&frame.goal_id)? {
            Some(goal) => goal.parent_ids,
            None => {
                log::warn!(
                    "Goal {} not found in directory; treating as parentless",
                    frame.goal_id
                );
                continue;
            }
        };

        if parent_ids.is_empty() {
            continue;
        }

        let share = frame.duration / parent_ids.len() as f64;

        for parent_id in parent_ids {
            let mut path = frame.path.clone();
            path.push(frame.goal_id.clone());
            stack.push(Frame {
                goal_id: parent_id,
                duration: share,
                path,
            });
        }
    }

    Ok(())
}
