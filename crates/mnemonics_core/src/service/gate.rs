//! Confirmation gates.
//!
//! A gate is a point where a mutation waits for an explicit accept/reject.
//! The decision comes from a [`Prompter`] unless the caller passes
//! [`ConfirmMode::AutoConfirm`], in which case the prompter is not consulted.

use crate::similarity::SimilarMatch;
use log::info;
use std::path::PathBuf;

/// Whether gates ask the prompter or pass automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmMode {
    #[default]
    Interactive,
    AutoConfirm,
}

/// What is being asked at a gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// The target note already exists; overwrite it?
    UpdateExisting { path: PathBuf },
    /// Similar notes exist in the category; proceed with the write?
    MergeSimilar {
        /// Best match, the one the decision is about.
        best: SimilarMatch,
        /// Up to three top matches, best first, for display.
        top: Vec<SimilarMatch>,
    },
    /// Delete this note and strip references to it?
    Delete(DeletePreview),
}

impl Prompt {
    /// Stable gate name used in log events.
    pub fn gate_name(&self) -> &'static str {
        match self {
            Self::UpdateExisting { .. } => "confirm_update",
            Self::MergeSimilar { .. } => "confirm_merge",
            Self::Delete(_) => "confirm_delete",
        }
    }
}

/// Everything shown before a deletion is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePreview {
    pub title: String,
    /// Parent directory name.
    pub category: String,
    pub path: PathBuf,
    pub content: String,
    /// Notes whose content mentions the target filename.
    pub referencers: Vec<PathBuf>,
}

/// Source of operator decisions.
pub trait Prompter {
    /// Accept (`true`) or reject (`false`) one gate.
    fn confirm(&mut self, prompt: &Prompt) -> bool;

    /// Picks one of several candidate notes (index into `candidates`), or
    /// `None` to abort.
    fn choose(&mut self, candidates: &[PathBuf]) -> Option<usize>;
}

/// Passes a gate according to `mode`.
pub fn pass_gate(mode: ConfirmMode, prompter: &mut dyn Prompter, prompt: &Prompt) -> bool {
    let accepted = match mode {
        ConfirmMode::AutoConfirm => true,
        ConfirmMode::Interactive => prompter.confirm(prompt),
    };
    info!(
        "event=gate module=service gate={} mode={:?} accepted={}",
        prompt.gate_name(),
        mode,
        accepted
    );
    accepted
}
