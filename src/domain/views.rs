use super::timer::{add_elapsed, TaskTimer, MAX_ELAPSED_SECONDS};
use chrono::Duration;

/// Format a duration as "hh:mm:ss" (hours keep counting past 24)
pub fn format_hms(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format whole seconds (as stored on disk) as "hh:mm:ss"
pub fn format_seconds(seconds: f64) -> String {
    let seconds = seconds.clamp(0.0, MAX_ELAPSED_SECONDS as f64);
    format_hms(Duration::milliseconds((seconds * 1000.0).round() as i64))
}

/// Sum of elapsed time over all tasks, as last refreshed
pub fn total_elapsed(tasks: &[TaskTimer]) -> Duration {
    tasks
        .iter()
        .map(|t| t.elapsed())
        .fold(Duration::zero(), add_elapsed)
}

/// Shorten a label to `max_chars`, ending with an ellipsis when cut
pub fn truncate_label(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Badge text for a task row
pub fn status_badge(task: &TaskTimer) -> &'static str {
    if task.is_running() {
        "⏱ RUNNING"
    } else {
        "⏸ STOPPED"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::zero()), "00:00:00");
        assert_eq!(format_hms(Duration::seconds(59)), "00:00:59");
        assert_eq!(format_hms(Duration::minutes(75)), "01:15:00");
        assert_eq!(format_hms(Duration::hours(3)), "03:00:00");
        // Does not wrap at a day
        assert_eq!(format_hms(Duration::hours(26) + Duration::seconds(5)), "26:00:05");
    }

    #[test]
    fn test_format_seconds_truncates_fraction() {
        assert_eq!(format_seconds(3600.4), "01:00:00");
        assert_eq!(format_seconds(-5.0), "00:00:00");
    }

    #[test]
    fn test_total_elapsed() {
        let tasks = vec![
            TaskTimer::with_elapsed("A", Duration::hours(1)),
            TaskTimer::with_elapsed("B", Duration::hours(2)),
        ];
        assert_eq!(total_elapsed(&tasks), Duration::hours(3));
        assert_eq!(total_elapsed(&[]), Duration::zero());
    }

    #[test]
    fn test_total_of_capped_tasks_does_not_overflow() {
        let huge = Duration::seconds(MAX_ELAPSED_SECONDS);
        let tasks = vec![
            TaskTimer::with_elapsed("A", huge),
            TaskTimer::with_elapsed("B", huge),
        ];
        assert_eq!(total_elapsed(&tasks), huge);
        assert_eq!(format_seconds(9e15), format_hms(huge));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 15), "short");
        assert_eq!(truncate_label("a very long task description", 15), "a very long ta…");
        assert_eq!(truncate_label("a very long ta…", 15), "a very long ta…");
    }

    #[test]
    fn test_status_badge() {
        let mut task = TaskTimer::new("Task");
        assert_eq!(status_badge(&task), "⏸ STOPPED");
        task.start_at(std::time::Instant::now());
        assert_eq!(status_badge(&task), "⏱ RUNNING");
    }
}
