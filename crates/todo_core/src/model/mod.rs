//! Todo domain model and persisted snapshot format.
//!
//! # Responsibility
//! - Define the item record, visibility filter and text validation rule.
//! - Keep the storage encoding next to the types it encodes.
//!
//! # Invariants
//! - Every item is identified by a unique `ItemId` within its list.
//! - Insertion order is the only ordering of a list.

pub mod item;
pub mod snapshot;
