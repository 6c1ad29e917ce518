// Key-value persistence collaborator

use eyre::Result;
use std::collections::HashMap;

/// Whole-value key-value store used to persist the task collection
///
/// Values are replaced wholesale on `set`; there are no partial updates.
pub trait KvStore {
    /// Read the value stored under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    values: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, as if written by an earlier session
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get_missing() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("todo:tasks").unwrap(), None);
    }

    #[test]
    fn test_memory_set_replaces() {
        let mut kv = MemoryKv::new().with_value("todo:tasks", "[]");
        kv.set("todo:tasks", "[1]").unwrap();
        assert_eq!(kv.get("todo:tasks").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_boxed_store() {
        let mut kv: Box<dyn KvStore> = Box::new(MemoryKv::new());
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
    }
}
