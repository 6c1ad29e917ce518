// Task list state manager

use crate::codec;
use crate::error::PersistenceError;
use crate::filter::FilterMode;
use crate::kv::KvStore;
use crate::task::{Task, TaskCollection};
use tracing::{debug, warn};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "todo:tasks";

/// Owns the task collection, the active filter, and the persistence round-trip
///
/// Every mutating command writes the whole collection back to the injected
/// [`KvStore`]. Persistence failures are logged and otherwise ignored; the
/// in-memory collection stays authoritative for the rest of the session.
pub struct TaskStore<K: KvStore> {
    kv: K,
    key: String,
    tasks: TaskCollection,
    filter: FilterMode,
}

impl<K: KvStore> TaskStore<K> {
    /// Open a store under [`DEFAULT_KEY`]
    pub fn open(kv: K) -> Self {
        Self::open_with_key(kv, DEFAULT_KEY)
    }

    /// Open a store and populate it from whatever `kv` holds under `key`
    pub fn open_with_key(kv: K, key: &str) -> Self {
        let mut store = Self {
            kv,
            key: key.to_string(),
            tasks: Vec::new(),
            filter: FilterMode::default(),
        };
        store.tasks = store.load();
        store
    }

    /// Read the persisted collection
    ///
    /// A missing key yields an empty collection, and so does a corrupt or
    /// unreadable value.
    pub fn load(&self) -> TaskCollection {
        match self.try_load() {
            Ok(tasks) => {
                debug!(key = %self.key, count = tasks.len(), "Loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "Discarding persisted tasks");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<TaskCollection, PersistenceError> {
        let raw = self
            .kv
            .get(&self.key)
            .map_err(|e| PersistenceError::read(&self.key, format!("{:#}", e)))?;

        match raw {
            Some(raw) => codec::decode(&self.key, &raw),
            None => Ok(Vec::new()),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Prepend a new task; blank text is ignored
    ///
    /// Returns the created task, or `None` when nothing was added.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let task = Task::new(text)?;
        debug!(id = %task.id, "Adding task");

        self.tasks.insert(0, task);
        self.persist();
        self.tasks.first()
    }

    /// Flip `completed` on the task with `id`
    ///
    /// Returns the new completion state, or `None` if no task matched.
    pub fn toggle_complete(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;

        self.persist();
        Some(completed)
    }

    /// Remove the task with `id`, returning it if it existed
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);

        self.persist();
        Some(removed)
    }

    /// Remove every completed task, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        self.persist();
        removed
    }

    /// Remove every task, returning how many were removed
    pub fn clear_all(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();

        self.persist();
        removed
    }

    /// Change the active view; never persisted
    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full collection, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks matching the active filter, in collection order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Number of incomplete tasks, ignoring the filter
    pub fn incomplete_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Borrow the persistence backend
    pub fn kv(&self) -> &K {
        &self.kv
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!(error = %e, "Keeping unsaved tasks in memory");
        }
    }

    fn try_persist(&mut self) -> Result<(), PersistenceError> {
        let raw = codec::encode(&self.key, &self.tasks)?;
        self.kv
            .set(&self.key, &raw)
            .map_err(|e| PersistenceError::write(&self.key, format!("{:#}", e)))?;

        debug!(key = %self.key, count = self.tasks.len(), "Persisted tasks");
        Ok(())
    }
}
