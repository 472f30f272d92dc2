//! Use-case services over the note store.
//!
//! # Responsibility
//! - `remember`: create-or-update with similarity and confirmation gates.
//! - `forget`: delete with reference cleanup and directory cleanup.
//! - `recall`: read-only listing and substring search.
//!
//! # Invariants
//! - Only `remember` and `forget` mutate the store, and only after every
//!   confirmation gate ahead of the mutation has been passed.
//! - A gate answered negatively leaves the store untouched.
//! - Per-file read problems become [`Warning`]s; they never abort an operation.

pub mod forget;
pub mod gate;
pub mod recall;
pub mod remember;

use crate::model::ModelError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Terminal failures of a mutating operation.
#[derive(Debug)]
pub enum MutationError {
    /// Rejected input; nothing on disk was touched.
    InvalidArgument(ModelError),
    /// A store write, directory creation or removal failed.
    Store(StoreError),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ModelError> for MutationError {
    fn from(value: ModelError) -> Self {
        Self::InvalidArgument(value)
    }
}

impl From<StoreError> for MutationError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Non-fatal problems surfaced alongside an outcome.
#[derive(Debug)]
pub enum Warning {
    /// A note was skipped because it could not be read.
    Skipped(StoreError),
    /// Linking to the related note would close a cycle; a notice was written
    /// instead of the link.
    CircularDependency { related: PathBuf },
    /// The related note could not be inspected; the related section was left empty.
    RelatedUnavailable(StoreError),
    /// A referencing note could not be rewritten and still mentions the target.
    ReferenceNotRemoved(StoreError),
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped(err) => write!(f, "skipped: {err}"),
            Self::CircularDependency { related } => write!(
                f,
                "circular dependency detected in related memories: `{}`",
                related.display()
            ),
            Self::RelatedUnavailable(err) => {
                write!(f, "could not process related memory: {err}")
            }
            Self::ReferenceNotRemoved(err) => {
                write!(f, "could not update references: {err}")
            }
        }
    }
}
