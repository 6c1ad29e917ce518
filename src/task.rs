// Data model for a task list

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Ordered tasks, newest first
pub type TaskCollection = Vec<Task>;

/// A single user-entered item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Build a fresh, incomplete task from user input
    ///
    /// Returns `None` when the input is empty or whitespace-only. The stored
    /// text is trimmed.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self {
            id: new_id(),
            text: trimmed.to_string(),
            completed: false,
            created_at: now_iso(),
        })
    }

    /// Parsed creation time, if the stored timestamp is valid RFC 3339
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Generate a unique, time-ordered task id
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time as ISO-8601 with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_text() {
        let task = Task::new("  buy milk \n").unwrap();
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn test_new_rejects_blank() {
        assert!(Task::new("").is_none());
        assert!(Task::new("   ").is_none());
        assert!(Task::new("\t\n").is_none());
    }

    #[test]
    fn test_new_ids_are_unique() {
        let a = Task::new("a").unwrap();
        let b = Task::new("b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_now_iso_format() {
        let ts = now_iso();
        // 2024-05-01T10:00:00.000Z
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_created_at_utc() {
        let mut task = Task::new("walk dog").unwrap();
        assert!(task.created_at_utc().is_some());

        task.created_at = "not a date".to_string();
        assert!(task.created_at_utc().is_none());
    }

    #[test]
    fn test_task_serialization_field_names() {
        let task = Task {
            id: "1714557600000".to_string(),
            text: "buy milk".to_string(),
            completed: true,
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1714557600000","text":"buy milk","completed":true,"createdAt":"2024-05-01T10:00:00.000Z"}"#
        );
    }
}
