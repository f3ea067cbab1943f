/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque document identifier.
///
/// Identity checks compare these values directly, never their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Mutating operations guarded by the ownership rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Update,
    Delete,
    AddMember,
    RemoveMember,
    EditComment,
    DeleteComment,
}

impl Operation {
    /// Client-facing refusal message for this operation on a `label` record
    pub fn refusal(&self, label: &str) -> String {
        match self {
            Operation::Update => format!("Not authorized to update this {}", label),
            Operation::Delete => format!("Not authorized to delete this {}", label),
            Operation::AddMember => "Not authorized to add members".to_string(),
            Operation::RemoveMember => "Not authorized to remove members".to_string(),
            Operation::EditComment => "Not authorized to edit this comment".to_string(),
            Operation::DeleteComment => "Not authorized to delete this comment".to_string(),
        }
    }
}
