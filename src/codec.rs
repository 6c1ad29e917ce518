// Serialized form of the task collection

use crate::error::PersistenceError;
use crate::task::Task;
use std::collections::HashSet;
use tracing::warn;

/// Serialize the full collection as a JSON array
pub fn encode(key: &str, tasks: &[Task]) -> Result<String, PersistenceError> {
    serde_json::to_string(tasks).map_err(|e| PersistenceError::write(key, e))
}

/// Parse a stored collection
///
/// Only a value that is not a JSON array of task objects is corrupt. Older
/// collections may repeat ids or carry blank text; those load as-is with a
/// warning so no saved task is dropped.
pub fn decode(key: &str, raw: &str) -> Result<Vec<Task>, PersistenceError> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(|e| PersistenceError::read(key, e))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if task.text.trim().is_empty() {
            warn!(key, id = %task.id, "Loaded task with empty text");
        }
        if !seen.insert(task.id.as_str()) {
            warn!(key, id = %task.id, "Loaded duplicate task id");
        }
    }

    Ok(tasks)
}
