//! Report rendering for the duration map
//!
//! Either an aligned text table sorted by descending duration, or JSON for
//! piping into other tools.

use anyhow::Result;
use goaltime_core::{GoalDuration, UNTRACKED_ID};
use std::collections::BTreeMap;

/// Format seconds as `H:MM:SS` (hours unbounded)
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Render the duration map as an aligned table, longest duration first
///
/// The Untracked bucket always sorts last so the actual goals lead the
/// report.
pub fn render_table(durations: &BTreeMap<String, GoalDuration>) -> String {
    let mut rows: Vec<(&String, &GoalDuration)> = durations.iter().collect();
    rows.sort_by(|(a_id, a), (b_id, b)| {
        let a_untracked = a_id.as_str() == UNTRACKED_ID;
        let b_untracked = b_id.as_str() == UNTRACKED_ID;
        a_untracked
            .cmp(&b_untracked)
            .then(b.seconds.total_cmp(&a.seconds))
    });

    let name_width = rows
        .iter()
        .map(|(_, d)| d.name.len())
        .max()
        .unwrap_or(0)
        .max("Goal".len());

    let mut out = String::new();
    out.push_str(&format!("{:<name_width$}  {:>10}\n", "Goal", "Duration"));
    out.push_str(&format!("{}  {}\n", "-".repeat(name_width), "-".repeat(10)));

    for (_, duration) in rows {
        out.push_str(&format!(
            "{:<name_width$}  {:>10}\n",
            duration.name,
            format_duration(duration.seconds)
        ));
    }

    out
}

/// Render the duration map as pretty-printed JSON
pub fn render_json(durations: &BTreeMap<String, GoalDuration>) -> Result<String> {
    Ok(serde_json::to_string_pretty(durations)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(name: &str, seconds: f64) -> GoalDuration {
        GoalDuration {
            name: name.to_string(),
            seconds,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00:00");
        assert_eq!(format_duration(61.0), "0:01:01");
        assert_eq!(format_duration(43_200.0), "12:00:00");
        assert_eq!(format_duration(90_000.0), "25:00:00");
    }

    #[test]
    fn test_table_sorted_by_duration_with_untracked_last() {
        let durations = BTreeMap::from([
            (UNTRACKED_ID.to_string(), bucket(UNTRACKED_ID, 99_999.0)),
            ("g1".to_string(), bucket("Reading", 3_600.0)),
            ("g2".to_string(), bucket("Writing", 7_200.0)),
        ]);

        let table = render_table(&durations);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].starts_with("Writing"));
        assert!(lines[3].starts_with("Reading"));
        assert!(lines[4].starts_with(UNTRACKED_ID));
    }

    #[test]
    fn test_json_round_trips() {
        let durations = BTreeMap::from([("g1".to_string(), bucket("Reading", 3_600.0))]);
        let json = render_json(&durations).unwrap();
        assert!(json.contains("\"Reading\""));
        assert!(json.contains("3600.0"));
    }
}
