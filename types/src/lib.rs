//! Core domain types for rota.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.

use std::fmt;

/// Identifier assigned by the remote collection.
///
/// Tasks never carry a client-generated id: every `TaskId` in the process
/// came out of a server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task record as held by the remote collection.
///
/// The wire shape is `{id, title, completed}`; unknown fields on the
/// collection's records are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}
