// Persistence error taxonomy

/// Failures reading or writing the persisted task collection.
///
/// Neither variant ever reaches the user: read failures fall back to an empty
/// collection and write failures leave the in-memory state authoritative.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The stored value is corrupt or the backend could not be read.
    #[error("Failed to read persisted tasks under `{key}`: {reason}")]
    Read { key: String, reason: String },

    /// The backend rejected the write (unavailable, quota exceeded, ...).
    #[error("Failed to persist tasks under `{key}`: {reason}")]
    Write { key: String, reason: String },
}

impl PersistenceError {
    pub fn read(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PersistenceError::read("todo:tasks", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Failed to read persisted tasks under `todo:tasks`: expected value at line 1 column 1"
        );

        let err = PersistenceError::write("todo:tasks", "quota exceeded");
        assert!(err.to_string().contains("quota exceeded"));
    }
}
