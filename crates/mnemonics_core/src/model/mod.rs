//! Domain model for the note store.
//!
//! # Responsibility
//! - Define the memory/recall type vocabularies and their folder mapping.
//! - Define note identity (category + identifier) and filename derivation.
//!
//! # Invariants
//! - Within one category an identifier is unique; identical titles map to
//!   the same file.
//! - Type parsing fails before any filesystem access happens.

pub mod memory_type;
pub mod note;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Argument validation errors raised by the model layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// `remember --type` value is not one of the known memory types.
    UnknownMemoryType(String),
    /// `recall --type` value is not one of the five recall types.
    UnknownRecallType(String),
    /// Title contains no alphanumeric characters, so no identifier can be derived.
    EmptyIdentifier(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMemoryType(value) => write!(
                f,
                "unknown memory type: {value}; available types: {}",
                memory_type::MemoryType::ALL
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::UnknownRecallType(value) => write!(
                f,
                "invalid memory type '{value}'. Valid types are: {}",
                memory_type::RecallType::ALL
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::EmptyIdentifier(title) => write!(
                f,
                "title `{title}` has no alphanumeric characters to derive a filename from"
            ),
        }
    }
}

impl Error for ModelError {}
