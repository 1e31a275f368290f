//! Terminal front end for the todo list.
//!
//! # Responsibility
//! - Resolve configuration, open the durable store and hydrate the list.
//! - Forward one user action per invocation to `TodoListManager`.
//! - Render notifications on stderr and the visible list on stdout.

use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    default_log_level, init_logging, Filter, ItemId, KeyValueStore, NotificationKind, Notifier,
    SqliteStore, TodoError, TodoListManager,
};

const DB_FILE_NAME: &str = "todos.sqlite3";
const DB_PATH_ENV: &str = "TODO_DB_PATH";
const LOG_DIR_ENV: &str = "TODO_LOG_DIR";

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Keep a short todo list in a local SQLite file")]
#[command(version)]
struct Cli {
    /// SQLite file holding the list (default: $TODO_DB_PATH or the temp dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rotating log files (default: $TODO_LOG_DIR, logging off when unset)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show todos
    List {
        #[arg(long, default_value = "all")]
        filter: Filter,
    },
    /// Add a todo
    Add { text: String },
    /// Flip a todo between active and completed
    Toggle {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },
    /// Delete a todo
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },
    /// Replace the text of a todo
    Edit {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
        text: String,
    },
    /// Delete every completed todo
    ClearCompleted,
}

/// Settings resolved from flags, then environment, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliConfig {
    db_path: PathBuf,
    log_dir: Option<PathBuf>,
    log_level: String,
}

impl CliConfig {
    fn resolve(cli: &Cli) -> Self {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    fn resolve_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = |key: &str| {
            env(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        let db_path = cli
            .db
            .clone()
            .or_else(|| from_env(DB_PATH_ENV))
            .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
        let log_dir = cli.log_dir.clone().or_else(|| from_env(LOG_DIR_ENV));
        let log_level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}

/// Prints notifications to stderr, one line each.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        eprintln!("[{}] {}", label(kind), message);
    }
}

fn label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "ok",
        NotificationKind::Warning => "warn",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
        NotificationKind::Neutral => "note",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::resolve(&cli);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut manager = TodoListManager::new(SqliteStore::new(&conn), ConsoleNotifier);
    if let Err(err) = manager.hydrate() {
        warn!("event=cli_hydrate module=cli status=error error={err}");
    }

    match run(&mut manager, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn run<S: KeyValueStore, N: Notifier>(
    manager: &mut TodoListManager<S, N>,
    command: Commands,
) -> Result<(), TodoError> {
    match command {
        Commands::List { filter } => {
            manager.set_filter(filter);
            print_list(manager);
        }
        Commands::Add { text } => {
            let id = manager.add(&text)?;
            println!("{id}");
        }
        Commands::Toggle { id } => {
            manager.toggle(id)?;
        }
        Commands::Remove { id } => {
            manager.remove(id)?;
        }
        Commands::Edit { id, text } => {
            let current = manager
                .items()
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.text.clone())
                .unwrap_or_default();
            manager.begin_edit(id, current)?;
            manager.update_edit_text(&text)?;
            manager.commit_edit(id)?;
        }
        Commands::ClearCompleted => {
            manager.clear_completed()?;
        }
    }
    Ok(())
}

fn print_list<S: KeyValueStore, N: Notifier>(manager: &TodoListManager<S, N>) {
    let visible = manager.visible_items();
    if visible.is_empty() {
        println!("No {} todos.", manager.filter());
        return;
    }
    for item in visible {
        let mark = if item.completed { 'x' } else { ' ' };
        println!("[{mark}] {} {}", item.id, item.text);
    }
    if manager.has_completed() {
        println!("(run `todo clear-completed` to remove completed todos)");
    }
}
