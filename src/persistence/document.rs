use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// Schema version written into every state file
pub const STATE_VERSION: &str = "2.0.0";

/// One task as stored on disk.
///
/// Running state never survives a save: `is_running` is written as false and
/// `start_time` as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersistedTask {
    #[serde(default, alias = "description")]
    pub description: String,
    #[serde(default, alias = "elapsedSeconds")]
    pub elapsed_seconds: f64,
    #[serde(default, alias = "isRunning")]
    pub is_running: bool,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<DateTime<Local>>,
    #[serde(default = "Local::now", alias = "lastModified")]
    pub last_modified: DateTime<Local>,
}

/// The whole saved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationState {
    #[serde(default, alias = "tasks", deserialize_with = "null_as_empty")]
    pub tasks: Vec<PersistedTask>,
    #[serde(default = "Local::now", alias = "savedAt")]
    pub saved_at: DateTime<Local>,
    #[serde(default = "default_version", alias = "version")]
    pub version: String,
}

impl ApplicationState {
    pub fn new(tasks: Vec<PersistedTask>, saved_at: DateTime<Local>) -> Self {
        Self {
            tasks,
            saved_at,
            version: STATE_VERSION.to_string(),
        }
    }

    /// Sum of stored elapsed seconds
    pub fn total_seconds(&self) -> f64 {
        self.tasks.iter().map(|t| t.elapsed_seconds).sum()
    }
}

fn default_version() -> String {
    STATE_VERSION.to_string()
}

/// `"Tasks": null` reads the same as an empty list
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PersistedTask>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PersistedTask>>::deserialize(deserializer)?.unwrap_or_default())
}
