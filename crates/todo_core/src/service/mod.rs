//! Todo list use-case layer.
//!
//! # Responsibility
//! - Orchestrate validation, mutation, persistence and notification.
//! - Keep presentation layers decoupled from storage details.

pub mod id_sequence;
pub mod todo_service;
