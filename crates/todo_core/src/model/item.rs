//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical record shown, edited and persisted by the list.
//! - Own the single text validation rule shared by every write path.
//!
//! # Invariants
//! - `text` is trimmed, non-empty and at most `MAX_TODO_LENGTH` characters.
//! - `id` is never reused for another item inside one list.
//! - Length is counted in Unicode scalar values, not bytes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Maximum number of characters allowed in one todo text.
pub const MAX_TODO_LENGTH: usize = 20;

/// Stable identifier of one todo item.
///
/// Serialized as a plain JSON number.
pub type ItemId = i64;

/// Validation failure for todo text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Text is empty after trimming.
    Empty,
    /// Text is longer than the allowed maximum.
    TooLong { max: usize, actual: usize },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Todo cannot be empty!"),
            Self::TooLong { max, .. } => write!(f, "Todo cannot exceed {max} characters."),
        }
    }
}

impl Error for TodoValidationError {}

/// Checks an already trimmed todo text against the length rule.
pub fn validate_todo_text(text: &str) -> Result<(), TodoValidationError> {
    let actual = text.chars().count();
    if actual == 0 {
        return Err(TodoValidationError::Empty);
    }
    check_max_length(text)?;
    Ok(())
}

/// Checks only the upper bound; used for in-progress edit text.
pub fn check_max_length(text: &str) -> Result<(), TodoValidationError> {
    let actual = text.chars().count();
    if actual > MAX_TODO_LENGTH {
        return Err(TodoValidationError::TooLong {
            max: MAX_TODO_LENGTH,
            actual,
        });
    }
    Ok(())
}

/// One entry of the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
}

impl Item {
    /// Creates an active item. Callers are expected to pass validated text.
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Validates item text exactly as stored.
    ///
    /// Surrounding whitespace counts towards the length; callers that accept
    /// untrimmed input trim it first (see `model::snapshot::decode_items`).
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_todo_text(&self.text)
    }
}

/// Visibility predicate for rendering the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Returns whether `item` is visible under this filter.
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failure for [`Filter`] names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl Display for UnknownFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilter {}

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_todo_text, Filter, Item, TodoValidationError, MAX_TODO_LENGTH};

    #[test]
    fn length_is_counted_in_chars() {
        let text = "é".repeat(MAX_TODO_LENGTH);
        assert!(text.len() > MAX_TODO_LENGTH);
        assert_eq!(validate_todo_text(&text), Ok(()));
    }

    #[test]
    fn too_long_reports_actual_length() {
        let err = validate_todo_text(&"x".repeat(21)).unwrap_err();
        assert_eq!(err, TodoValidationError::TooLong { max: 20, actual: 21 });
        assert_eq!(err.to_string(), "Todo cannot exceed 20 characters.");
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!(" Active ".parse::<Filter>().unwrap(), Filter::Active);
        assert!("pending".parse::<Filter>().is_err());
        assert!("done".parse::<Filter>().is_err());
    }

    #[test]
    fn validate_rejects_blank_text() {
        let item = Item::new(1, "");
        assert_eq!(item.validate(), Err(TodoValidationError::Empty));
    }

    #[test]
    fn validate_counts_surrounding_whitespace() {
        let item = Item::new(1, "   exactly twenty chars   ");
        assert_eq!(
            item.validate(),
            Err(TodoValidationError::TooLong { max: 20, actual: 26 })
        );
    }
}
