//! JSON snapshot codec for the persisted todo list.
//!
//! # Responsibility
//! - Encode the full list as a JSON array of `{id, text, completed}`.
//! - Decode stored snapshots, rejecting anything that is not a valid list.
//!
//! # Invariants
//! - Encoding then decoding a valid list yields an equal list.
//! - Decoded lists never contain duplicate ids, untrimmed or invalid text.

use crate::model::item::{Item, ItemId, TodoValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decode failure for stored snapshots.
#[derive(Debug)]
pub enum SnapshotError {
    /// Stored value is not a JSON array of items.
    Json(serde_json::Error),
    /// One item violates the text rule.
    InvalidItem {
        id: ItemId,
        reason: TodoValidationError,
    },
    /// Two items share one id.
    DuplicateId(ItemId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed snapshot: {err}"),
            Self::InvalidItem { id, reason } => write!(f, "invalid item {id}: {reason}"),
            Self::DuplicateId(id) => write!(f, "duplicate item id {id}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidItem { reason, .. } => Some(reason),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes the list in storage order.
pub fn encode_items(items: &[Item]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parses a stored snapshot into a validated list.
///
/// Item text is trimmed before validation, so decoded items always hold
/// trimmed text.
pub fn decode_items(raw: &str) -> Result<Vec<Item>, SnapshotError> {
    let mut items: Vec<Item> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &mut items {
        let trimmed = item.text.trim();
        if trimmed.len() != item.text.len() {
            item.text = trimmed.to_string();
        }
        item.validate()
            .map_err(|reason| SnapshotError::InvalidItem {
                id: item.id,
                reason,
            })?;
        if !seen.insert(item.id) {
            return Err(SnapshotError::DuplicateId(item.id));
        }
    }

    Ok(items)
}
