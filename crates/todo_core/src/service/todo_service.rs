//! Todo list state manager.
//!
//! # Responsibility
//! - Own the in-memory list, active filter and edit session.
//! - Validate user input, apply mutations, persist snapshots and emit one
//!   notification per outcome.
//!
//! # Invariants
//! - No snapshot is written before `hydrate()` has run once.
//! - After hydration every successful mutation writes exactly one snapshot.
//! - `editing_id`, when set, refers to an item present in the list.
//! - Rejected input never mutates the list.
//! - Item text never reaches the log.

use crate::model::item::{
    check_max_length, validate_todo_text, Filter, Item, ItemId, TodoValidationError,
};
use crate::model::snapshot::{decode_items, encode_items};
use crate::notify::{NotificationKind, Notifier};
use crate::service::id_sequence::IdSequence;
use crate::store::{KeyValueStore, StoreError, TODOS_KEY};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ADDED_MESSAGE: &str = "Todo added successfully!";
const COMPLETED_MESSAGE: &str = "Todo marked as completed.";
const REOPENED_MESSAGE: &str = "Todo marked as active.";
const DELETED_MESSAGE: &str = "Todo deleted.";
const UPDATED_MESSAGE: &str = "Todo updated.";
const CLEARED_MESSAGE: &str = "Completed todos cleared.";
const NOT_FOUND_MESSAGE: &str = "Todo not found.";
const SAVE_FAILED_MESSAGE: &str = "Todo could not be saved.";
const IDS_EXHAUSTED_MESSAGE: &str = "No more todos can be added.";

pub type TodoResult<T> = Result<T, TodoError>;

/// Failure of one state-manager operation.
#[derive(Debug)]
pub enum TodoError {
    /// Text is empty after trimming.
    EmptyInput,
    /// Text exceeds the maximum length.
    TooLong { max: usize, actual: usize },
    /// No item with this id exists.
    NotFound(ItemId),
    /// The edit session is not open on this id.
    NotEditing(ItemId),
    /// `hydrate()` was already called on this manager.
    AlreadyHydrated,
    /// Every id above the largest known one is taken.
    IdsExhausted,
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
    /// Durable store rejected the snapshot write.
    Store(StoreError),
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "{}", TodoValidationError::Empty),
            Self::TooLong { max, actual } => write!(
                f,
                "{}",
                TodoValidationError::TooLong {
                    max: *max,
                    actual: *actual
                }
            ),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::NotEditing(id) => write!(f, "todo {id} is not being edited"),
            Self::AlreadyHydrated => write!(f, "todo list already hydrated"),
            Self::IdsExhausted => write!(f, "todo id space exhausted"),
            Self::Encode(err) => write!(f, "failed to encode todo snapshot: {err}"),
            Self::Store(err) => write!(f, "failed to persist todo snapshot: {err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoError {
    fn from(value: TodoValidationError) -> Self {
        match value {
            TodoValidationError::Empty => Self::EmptyInput,
            TodoValidationError::TooLong { max, actual } => Self::TooLong { max, actual },
        }
    }
}

/// Explicit, constructible todo list state.
///
/// The store and notifier are owned; pass `&mut` references to keep access
/// to them from the outside.
pub struct TodoListManager<S: KeyValueStore, N: Notifier> {
    store: S,
    notifier: N,
    items: Vec<Item>,
    filter: Filter,
    editing_id: Option<ItemId>,
    edit_text: String,
    hydrated: bool,
    ids: IdSequence,
}

impl<S: KeyValueStore, N: Notifier> TodoListManager<S, N> {
    /// Creates an empty, not yet hydrated manager.
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_id_sequence(store, notifier, IdSequence::new())
    }

    /// Creates a manager with a caller-provided id source.
    pub fn with_id_sequence(store: S, notifier: N, ids: IdSequence) -> Self {
        Self {
            store,
            notifier,
            items: Vec::new(),
            filter: Filter::default(),
            editing_id: None,
            edit_text: String::new(),
            hydrated: false,
            ids,
        }
    }

    /// Loads the stored snapshot and opens the persistence gate.
    ///
    /// Absent, unreadable or malformed snapshots leave the list as it is.
    /// Returns the number of items loaded from the store.
    ///
    /// # Errors
    /// - `AlreadyHydrated` on every call after the first.
    pub fn hydrate(&mut self) -> TodoResult<usize> {
        if self.hydrated {
            warn!("event=todo_hydrate module=service status=rejected reason=already_hydrated");
            return Err(TodoError::AlreadyHydrated);
        }
        self.hydrated = true;

        let loaded = match self.store.get(TODOS_KEY) {
            Ok(Some(raw)) => match decode_items(&raw) {
                Ok(items) => Some(items),
                Err(err) => {
                    warn!(
                        "event=todo_hydrate module=service status=discarded reason=malformed error={}",
                        err
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "event=todo_hydrate module=service status=discarded reason=store_read error={}",
                    err
                );
                None
            }
        };

        let count = match loaded {
            Some(items) => {
                for item in &items {
                    self.ids.observe(item.id);
                }
                let count = items.len();
                self.items = items;
                self.close_edit_if_missing();
                count
            }
            None => 0,
        };

        info!(
            "event=todo_hydrate module=service status=ok count={}",
            count
        );
        Ok(count)
    }

    /// Appends a new active item built from trimmed `raw_text`.
    ///
    /// Returns the id of the created item.
    ///
    /// # Errors
    /// - `EmptyInput` / `TooLong` for rejected text.
    /// - `IdsExhausted` when the list already holds `ItemId::MAX`.
    pub fn add(&mut self, raw_text: &str) -> TodoResult<ItemId> {
        let trimmed = raw_text.trim();
        self.validate_or_notify(trimmed, "todo_add")?;

        let Some(id) = self.ids.next_id() else {
            warn!("event=todo_add module=service status=rejected reason=ids_exhausted");
            self.notifier
                .notify(NotificationKind::Error, IDS_EXHAUSTED_MESSAGE);
            return Err(TodoError::IdsExhausted);
        };
        self.items.push(Item::new(id, trimmed));
        self.commit("todo_add", NotificationKind::Success, ADDED_MESSAGE)?;
        Ok(id)
    }

    /// Flips `completed` on one item.
    ///
    /// Returns the new completion state.
    pub fn toggle(&mut self, id: ItemId) -> TodoResult<bool> {
        let Some(position) = self.position(id) else {
            return Err(self.not_found(id, "todo_toggle"));
        };
        let item = &mut self.items[position];
        item.completed = !item.completed;
        let completed = item.completed;

        let message = if completed {
            COMPLETED_MESSAGE
        } else {
            REOPENED_MESSAGE
        };
        self.commit("todo_toggle", NotificationKind::Info, message)?;
        Ok(completed)
    }

    /// Deletes one item, closing the edit session if it targeted it.
    pub fn remove(&mut self, id: ItemId) -> TodoResult<()> {
        let Some(position) = self.position(id) else {
            return Err(self.not_found(id, "todo_remove"));
        };
        self.items.remove(position);
        if self.editing_id == Some(id) {
            self.clear_edit_session();
        }

        self.commit("todo_remove", NotificationKind::Success, DELETED_MESSAGE)
    }

    /// Opens the edit session on `id` seeded with `current_text`.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the list.
    pub fn begin_edit(&mut self, id: ItemId, current_text: impl Into<String>) -> TodoResult<()> {
        if !self.contains(id) {
            return Err(self.not_found(id, "todo_begin_edit"));
        }
        self.editing_id = Some(id);
        self.edit_text = current_text.into();
        debug!("event=todo_begin_edit module=service status=ok");
        Ok(())
    }

    /// Replaces the in-progress edit text when it fits the maximum length.
    pub fn update_edit_text(&mut self, candidate: &str) -> TodoResult<()> {
        if let Err(err) = check_max_length(candidate) {
            return Err(self.reject(err, "todo_update_edit_text"));
        }
        self.edit_text = candidate.to_string();
        Ok(())
    }

    /// Writes the trimmed edit text into the item being edited.
    ///
    /// Rejected text keeps the session open so the user can fix it.
    ///
    /// # Errors
    /// - `NotEditing` when the session is not open on `id`; no notification
    ///   is emitted because a repeated commit (Enter then blur) is benign.
    pub fn commit_edit(&mut self, id: ItemId) -> TodoResult<()> {
        if self.editing_id != Some(id) {
            debug!("event=todo_commit_edit module=service status=skipped reason=not_editing");
            return Err(TodoError::NotEditing(id));
        }

        let trimmed = self.edit_text.trim().to_string();
        self.validate_or_notify(&trimmed, "todo_commit_edit")?;

        let Some(position) = self.position(id) else {
            self.clear_edit_session();
            return Err(self.not_found(id, "todo_commit_edit"));
        };
        self.items[position].text = trimmed;
        self.clear_edit_session();

        self.commit("todo_commit_edit", NotificationKind::Success, UPDATED_MESSAGE)
    }

    /// Abandons the edit session without touching the list.
    pub fn cancel_edit(&mut self) {
        self.clear_edit_session();
    }

    /// Removes every completed item, keeping the order of the rest.
    ///
    /// Returns the number of removed items.
    pub fn clear_completed(&mut self) -> TodoResult<usize> {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        let removed = before - self.items.len();
        self.close_edit_if_missing();

        self.commit("todo_clear_completed", NotificationKind::Neutral, CLEARED_MESSAGE)?;
        Ok(removed)
    }

    /// Items visible under the current filter, in list order.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Full list in insertion order, ignoring the filter.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn editing_id(&self) -> Option<ItemId> {
        self.editing_id
    }

    pub fn edit_text(&self) -> &str {
        &self.edit_text
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Whether any item is completed; drives the "clear completed" control.
    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|item| item.completed)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Consumes the manager and returns its collaborators.
    pub fn into_parts(self) -> (S, N) {
        (self.store, self.notifier)
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    fn clear_edit_session(&mut self) {
        self.editing_id = None;
        self.edit_text.clear();
    }

    fn close_edit_if_missing(&mut self) {
        if let Some(id) = self.editing_id {
            if !self.contains(id) {
                self.clear_edit_session();
            }
        }
    }

    fn validate_or_notify(&mut self, trimmed: &str, event: &'static str) -> TodoResult<()> {
        validate_todo_text(trimmed).map_err(|err| self.reject(err, event))
    }

    fn reject(&mut self, err: TodoValidationError, event: &'static str) -> TodoError {
        let kind = match err {
            TodoValidationError::Empty => NotificationKind::Warning,
            TodoValidationError::TooLong { .. } => NotificationKind::Error,
        };
        debug!("event={event} module=service status=rejected reason={kind}");
        self.notifier.notify(kind, &err.to_string());
        err.into()
    }

    fn not_found(&mut self, id: ItemId, event: &'static str) -> TodoError {
        debug!("event={event} module=service status=rejected reason=not_found");
        self.notifier.notify(NotificationKind::Warning, NOT_FOUND_MESSAGE);
        TodoError::NotFound(id)
    }

    /// Persists the current list, then emits the outcome notification.
    ///
    /// A failed write keeps the in-memory mutation and emits an Error
    /// notification instead of the success one.
    fn commit(
        &mut self,
        event: &'static str,
        kind: NotificationKind,
        message: &str,
    ) -> TodoResult<()> {
        if let Err(err) = self.persist() {
            error!(
                "event={} module=service status=error error_code=persist_failed error={}",
                event, err
            );
            self.notifier
                .notify(NotificationKind::Error, SAVE_FAILED_MESSAGE);
            return Err(err);
        }

        info!(
            "event={} module=service status=ok count={} persisted={}",
            event,
            self.items.len(),
            self.hydrated
        );
        self.notifier.notify(kind, message);
        Ok(())
    }

    fn persist(&mut self) -> TodoResult<()> {
        if !self.hydrated {
            return Ok(());
        }
        let snapshot = encode_items(&self.items).map_err(TodoError::Encode)?;
        self.store
            .set(TODOS_KEY, &snapshot)
            .map_err(TodoError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoError, TodoListManager};
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    #[test]
    fn error_display_matches_notification_text() {
        assert_eq!(TodoError::EmptyInput.to_string(), "Todo cannot be empty!");
        assert_eq!(
            TodoError::TooLong {
                max: 20,
                actual: 30
            }
            .to_string(),
            "Todo cannot exceed 20 characters."
        );
    }

    #[test]
    fn new_manager_starts_unhydrated_with_default_filter() {
        let manager = TodoListManager::new(MemoryStore::new(), RecordingNotifier::new());
        assert!(!manager.is_hydrated());
        assert!(manager.items().is_empty());
        assert_eq!(manager.filter(), crate::model::item::Filter::All);
        assert_eq!(manager.editing_id(), None);
        assert_eq!(manager.edit_text(), "");
    }
}
