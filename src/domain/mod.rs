pub mod enums;
pub mod timer;
pub mod views;

pub use enums::{ChangeKind, UiMode};
pub use timer::{TaskId, TaskTimer, TimerHandle, MAX_ELAPSED_SECONDS};
pub use views::{format_hms, format_seconds, status_badge, total_elapsed, truncate_label};
