//! Core state management for a single todo list.
//! Presentation layers drive `TodoListManager` and render from its state.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{
    validate_todo_text, Filter, Item, ItemId, TodoValidationError, UnknownFilter, MAX_TODO_LENGTH,
};
pub use model::snapshot::{decode_items, encode_items, SnapshotError};
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier, RecordingNotifier};
pub use service::id_sequence::IdSequence;
pub use service::todo_service::{TodoError, TodoListManager, TodoResult};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult, TODOS_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
