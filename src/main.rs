use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tasklist::{Backend, Config, FilterMode, KvStore, Renderer, TaskStore};
use tracing::debug;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - add, complete, delete, and filter short tasks that persist locally")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding persisted tasks (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Persistence backend (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark a task complete, or incomplete again
    Toggle {
        /// Position shown by `list`, or a task id
        target: String,
    },

    /// Delete a task
    Delete {
        /// Position shown by `list`, or a task id
        target: String,
    },

    /// Remove all completed tasks
    ClearCompleted,

    /// Remove every task
    ClearAll,

    /// Show tasks
    List {
        /// Which tasks to show (default from config)
        #[arg(short, long, value_enum)]
        filter: Option<FilterMode>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    init_logging(cli.verbose, config.log_level.as_deref())?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let backend = cli.backend.unwrap_or(config.backend);
    debug!(?data_dir, %backend, key = %config.key, "Opening task list");

    let kv = backend.open_or_memory(&data_dir);
    let mut store = TaskStore::open_with_key(kv, &config.key);
    store.set_filter(config.default_filter);

    match cli.command {
        Commands::Add { text } => {
            let text = text.join(" ");
            match store.add(&text) {
                Some(task) => println!("Added: {}", task.text),
                None => println!("Nothing to add"),
            }
        }
        Commands::Toggle { target } => match resolve_target(&store, &target) {
            Some(id) => {
                let text = store.get(&id).map(|t| t.text.clone()).unwrap_or_default();
                match store.toggle_complete(&id) {
                    Some(true) => println!("Completed: {}", text),
                    Some(false) => println!("Reopened: {}", text),
                    None => println!("No task matches {}", target),
                }
            }
            None => println!("No task matches {}", target),
        },
        Commands::Delete { target } => match resolve_target(&store, &target).and_then(|id| store.delete(&id)) {
            Some(task) => println!("Deleted: {}", task.text),
            None => println!("No task matches {}", target),
        },
        Commands::ClearCompleted => {
            let removed = store.clear_completed();
            println!("Removed {} completed task(s)", removed);
        }
        Commands::ClearAll => {
            let removed = store.clear_all();
            println!("Removed {} task(s)", removed);
        }
        Commands::List { filter } => {
            if let Some(filter) = filter {
                store.set_filter(filter);
            }
            println!("{}", Renderer::new(!cli.no_color).render(&store));
        }
    }

    Ok(())
}

/// Tracing to stderr; recovered persistence failures stay quiet unless asked for
fn init_logging(verbose: u8, configured: Option<&str>) -> Result<()> {
    let level = match verbose {
        0 => match configured {
            Some(level) => level.parse::<LevelFilter>()?,
            None => LevelFilter::ERROR,
        },
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Map a CLI target onto a task id
///
/// Exact ids win, so numeric ids from older data are never read as positions.
fn resolve_target<K: KvStore>(store: &TaskStore<K>, target: &str) -> Option<String> {
    if let Some(task) = store.get(target) {
        return Some(task.id.clone());
    }

    target
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .and_then(|n| store.tasks().get(n - 1))
        .map(|t| t.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist::{DEFAULT_KEY, MemoryKv};

    fn store() -> TaskStore<MemoryKv> {
        let raw = r#"[
            {"id":"2","text":"walk dog","completed":false,"createdAt":"2024-05-01T10:01:00.000Z"},
            {"id":"1714557600000","text":"buy milk","completed":false,"createdAt":"2024-05-01T10:00:00.000Z"}
        ]"#;
        TaskStore::open(MemoryKv::new().with_value(DEFAULT_KEY, raw))
    }

    #[test]
    fn test_resolve_by_position() {
        let store = store();
        assert_eq!(resolve_target(&store, "1").as_deref(), Some("2"));
    }

    #[test]
    fn test_resolve_by_id() {
        let store = store();
        assert_eq!(resolve_target(&store, "1714557600000").as_deref(), Some("1714557600000"));
    }

    #[test]
    fn test_resolve_exact_id_beats_position() {
        // "2" is both an id and a position
        let store = store();
        assert_eq!(resolve_target(&store, "2").as_deref(), Some("2"));
    }

    #[test]
    fn test_resolve_unknown() {
        let store = store();
        assert_eq!(resolve_target(&store, "0"), None);
        assert_eq!(resolve_target(&store, "3"), None);
        assert_eq!(resolve_target(&store, "nope"), None);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tasklist", "-b", "sqlite", "list", "--filter", "active"]).unwrap();
        assert_eq!(cli.backend, Some(Backend::Sqlite));
        assert!(matches!(cli.command, Commands::List { filter: Some(FilterMode::Active) }));

        let cli = Cli::try_parse_from(["tasklist", "add", "buy", "milk"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { ref text } if text == &["buy", "milk"]));

        assert!(Cli::try_parse_from(["tasklist", "add"]).is_err());
    }
}
