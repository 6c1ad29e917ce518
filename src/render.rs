// Terminal rendering of the task list

use crate::filter::FilterMode;
use crate::kv::KvStore;
use crate::store::TaskStore;
use crate::task::Task;
use chrono::Local;
use colored::Colorize;

pub const EMPTY_MESSAGE: &str = "No tasks here - try adding one!";

/// Formats a [`TaskStore`] snapshot for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Header, visible tasks, and the incomplete-count footer
    ///
    /// Tasks are numbered by their position in the full collection so the
    /// numbers stay valid targets for `toggle` and `delete` under any filter.
    pub fn render<K: KvStore>(&self, store: &TaskStore<K>) -> String {
        let mut lines = vec![self.header(store.filter())];

        let visible = store.visible_tasks();
        if visible.is_empty() {
            lines.push(format!("  {}", self.muted(EMPTY_MESSAGE)));
        }

        for task in visible {
            let position = store
                .tasks()
                .iter()
                .position(|t| t.id == task.id)
                .map_or(0, |i| i + 1);
            lines.push(self.task_line(position, task));
        }

        lines.push(self.muted(&format!("{} incomplete", store.incomplete_count())));
        lines.join("\n")
    }

    fn header(&self, active: FilterMode) -> String {
        let title = if self.color {
            "To-Do List".bold().to_string()
        } else {
            "To-Do List".to_string()
        };

        let filters: Vec<String> = FilterMode::ALL_MODES
            .iter()
            .map(|mode| {
                let label = mode.to_string();
                match (*mode == active, self.color) {
                    (true, true) => format!("[{}]", label.cyan().bold()),
                    (true, false) => format!("[{}]", label),
                    (false, _) => label,
                }
            })
            .collect();

        format!("{}  {}", title, filters.join(" "))
    }

    fn task_line(&self, position: usize, task: &Task) -> String {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let text = match (task.completed, self.color) {
            (true, true) => task.text.dimmed().strikethrough().to_string(),
            (false, true) => task.text.normal().to_string(),
            (_, false) => task.text.clone(),
        };

        let created = task
            .created_at_utc()
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        if created.is_empty() {
            format!("{:>3}. {} {}", position, checkbox, text)
        } else {
            format!("{:>3}. {} {}  {}", position, checkbox, text, self.muted(&created))
        }
    }

    fn muted(&self, s: &str) -> String {
        if self.color { s.dimmed().to_string() } else { s.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    fn store_with(raw: &str) -> TaskStore<MemoryKv> {
        TaskStore::open(MemoryKv::new().with_value(crate::store::DEFAULT_KEY, raw))
    }

    const TWO_TASKS: &str = r#"[
        {"id":"2","text":"walk dog","completed":false,"createdAt":"2024-05-01T10:01:00.000Z"},
        {"id":"1","text":"buy milk","completed":true,"createdAt":"not a timestamp"}
    ]"#;

    #[test]
    fn test_render_empty() {
        let store = TaskStore::open(MemoryKv::new());
        let out = Renderer::new(false).render(&store);

        assert!(out.starts_with("To-Do List  [all] active completed"));
        assert!(out.contains(EMPTY_MESSAGE));
        assert!(out.ends_with("0 incomplete"));
    }

    #[test]
    fn test_render_empty_exact() {
        let store = TaskStore::open(MemoryKv::new());
        let out = Renderer::new(false).render(&store);

        assert_eq!(out, format!("To-Do List  [all] active completed\n  {}\n0 incomplete", EMPTY_MESSAGE));
    }

    #[test]
    fn test_render_all() {
        let store = store_with(TWO_TASKS);
        let out = Renderer::new(false).render(&store);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("  1. [ ] walk dog  "));
        assert_eq!(lines[2], "  2. [x] buy milk");
        assert_eq!(lines[3], "1 incomplete");
    }

    #[test]
    fn test_render_filtered_keeps_positions() {
        let mut store = store_with(TWO_TASKS);
        store.set_filter(FilterMode::Completed);
        let out = Renderer::new(false).render(&store);

        assert!(out.starts_with("To-Do List  all active [completed]"));
        assert!(out.contains("  2. [x] buy milk"));
        assert!(!out.contains("walk dog"));
        assert!(out.ends_with("1 incomplete"));
    }

    #[test]
    fn test_render_filter_with_no_matches() {
        let mut store = store_with(TWO_TASKS);
        store.clear_completed();
        store.set_filter(FilterMode::Completed);

        let out = Renderer::new(false).render(&store);
        assert!(out.contains(EMPTY_MESSAGE));
    }
}
