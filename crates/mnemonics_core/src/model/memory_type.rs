//! Memory and recall type vocabularies.
//!
//! `remember` writes into a fixed set of category folders, while `recall`
//! filters on its own, older set of folder names. The two sets are kept
//! separate on purpose: they are different contracts of different commands.

use super::ModelError;
use serde::Serialize;

/// Category chosen when creating or updating a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Learning,
    Decision,
    Idea,
    Todo,
    Reference,
    Default,
}

impl MemoryType {
    /// Every memory type in display order.
    pub const ALL: [MemoryType; 6] = [
        MemoryType::Learning,
        MemoryType::Decision,
        MemoryType::Idea,
        MemoryType::Todo,
        MemoryType::Reference,
        MemoryType::Default,
    ];

    /// Stable command-line value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Decision => "decision",
            Self::Idea => "idea",
            Self::Todo => "todo",
            Self::Reference => "reference",
            Self::Default => "default",
        }
    }

    /// Category folder, relative to the store root.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Decision => "decision/architectural",
            Self::Idea => "ideas",
            Self::Todo => "todos",
            Self::Reference => "reference",
            Self::Default => "general",
        }
    }

    /// Template section heading that receives the note content.
    pub fn section(self) -> &'static str {
        match self {
            Self::Learning => "Examples",
            Self::Decision => "Context",
            Self::Idea => "Details",
            Self::Todo => "Tasks",
            Self::Reference => "Documentation",
            Self::Default => "Content",
        }
    }
}

/// Parses a `remember --type` value.
///
/// Matching is exact (lowercase), mirroring the command-line contract.
pub fn parse_memory_type(value: &str) -> Result<MemoryType, ModelError> {
    MemoryType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| ModelError::UnknownMemoryType(value.to_string()))
}

/// Category filter accepted by `recall --type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallType {
    Learning,
    Architectural,
    Decisions,
    Problems,
    Issues,
}

impl RecallType {
    /// The five accepted values, in the order they are listed to users.
    pub const ALL: [RecallType; 5] = [
        RecallType::Learning,
        RecallType::Architectural,
        RecallType::Decisions,
        RecallType::Problems,
        RecallType::Issues,
    ];

    /// Command-line value, which is also the folder name under the store root.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Architectural => "architectural",
            Self::Decisions => "decisions",
            Self::Problems => "problems",
            Self::Issues => "issues",
        }
    }
}

/// Parses a `recall --type` value; anything outside [`RecallType::ALL`] is rejected.
pub fn parse_recall_type(value: &str) -> Result<RecallType, ModelError> {
    RecallType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| ModelError::UnknownRecallType(value.to_string()))
}
