//! Core logic for the mnemonics note store.
//! Notes are plain markdown files; this crate keeps them consistent when they
//! are created, updated and deleted.

pub mod config;
pub mod logging;
pub mod model;
pub mod references;
pub mod service;
pub mod similarity;
pub mod store;
pub mod template;

pub use config::{ConfigError, ConfigOverrides, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memory_type::{parse_memory_type, parse_recall_type, MemoryType, RecallType};
pub use model::note::{kebab_case, note_filename, Note, NoteLocation};
pub use model::ModelError;
pub use references::{detect_cycle, find_referencers, strip_link_tokens, ReferenceGraph};
pub use service::forget::{
    find_candidates, forget, DeletedNote, ForgetOutcome, ForgetQuery, ForgetReport,
};
pub use service::gate::{ConfirmMode, DeletePreview, Prompt, Prompter};
pub use service::recall::{recall, RecallHit, RecallQuery, RecallReport};
pub use service::remember::{
    remember, remember_at, CancelledAt, RelatedNote, RememberReport, RememberRequest,
    RememberStatus,
};
pub use service::{MutationError, Warning};
pub use similarity::{find_similar, SimilarMatch, SimilarityReport};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
