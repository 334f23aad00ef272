use crate::domain::format_seconds;
use crate::persistence::PersistedTask;
use chrono::{DateTime, Local};

/// Width of the "=" and "-" rules
pub const RULE_WIDTH: usize = 40;

/// Column width the description is padded to
pub const DESCRIPTION_WIDTH: usize = 25;

/// Default export file name, e.g. time_tracking_20240501_173000.txt
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("time_tracking_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Render the plain-text time report.
///
/// Layout:
/// ```text
/// Work Time Tracker - 2024-05-01 17:30:00
/// ========================================
/// 1. Write proposal            01:00:00
/// ----------------------------------------
/// Total: 01:00:00
/// ```
pub fn render_export(tasks: &[PersistedTask], generated_at: DateTime<Local>) -> String {
    let mut report = String::new();

    report.push_str(&format!(
        "Work Time Tracker - {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str(&"=".repeat(RULE_WIDTH));
    report.push('\n');

    for (idx, task) in tasks.iter().enumerate() {
        report.push_str(&format!(
            "{}. {:<width$} {}\n",
            idx + 1,
            task.description,
            format_seconds(task.elapsed_seconds),
            width = DESCRIPTION_WIDTH
        ));
    }

    report.push_str(&"-".repeat(RULE_WIDTH));
    report.push('\n');

    let total: f64 = tasks.iter().map(|t| t.elapsed_seconds).sum();
    report.push_str(&format!("Total: {}\n", format_seconds(total)));

    report
}
