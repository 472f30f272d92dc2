//! Delete coordinator.
//!
//! Steps, in order: locate exactly one note (asking the prompter to pick when
//! several match), scan inbound references, confirm, strip references from
//! every referencer, remove the file, remove the category directory if it is
//! now empty.
//!
//! # Invariants
//! - Nothing is modified before the delete gate is accepted.
//! - Reference stripping is best effort and stays applied even when the final
//!   removal fails.
//! - Directory cleanup failures are swallowed.

use crate::config::StoreConfig;
use crate::model::note::title_from_identifier;
use crate::references::{strip_references, ReferenceGraph};
use crate::service::gate::{pass_gate, ConfirmMode, DeletePreview, Prompt, Prompter};
use crate::service::Warning;
use crate::store::files::{remove_dir_if_empty, remove_note};
use crate::store::scanner::{collect_notes, list_categories, read_note_text};
use crate::store::StoreError;
use log::{info, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Which notes a delete request targets.
#[derive(Debug, Clone, Default)]
pub struct ForgetQuery {
    /// Case-insensitive substring of the filename stem or the content.
    pub title: String,
    /// Restrict the search to the category folder of this name directly
    /// under the root.
    pub category: Option<String>,
    /// Case-insensitive content substring that must also be present.
    pub topic: Option<String>,
}

/// Matching notes, path-sorted.
#[derive(Debug, Default)]
pub struct CandidateSearch {
    pub candidates: Vec<PathBuf>,
    pub skipped: Vec<StoreError>,
}

/// Finds notes matching `query` under the category folders of `root`.
pub fn find_candidates(root: &Path, query: &ForgetQuery) -> CandidateSearch {
    let mut search = CandidateSearch::default();
    // Only the root's own child directories, matched by name.
    let scopes = list_categories(root)
        .into_iter()
        .filter(|dir| match query.category.as_deref() {
            Some(category) => dir.file_name() == Some(OsStr::new(category)),
            None => true,
        })
        .collect::<Vec<_>>();
    let title = query.title.to_lowercase();
    let topic = query
        .topic
        .as_deref()
        .filter(|topic| !topic.is_empty())
        .map(str::to_lowercase);

    for scope in scopes {
        for path in collect_notes(&scope) {
            let stem_matches = path
                .file_stem()
                .map(|stem| {
                    title_from_identifier(&stem.to_string_lossy())
                        .to_lowercase()
                        .contains(&title)
                })
                .unwrap_or(false);
            if stem_matches && topic.is_none() {
                search.candidates.push(path);
                continue;
            }

            let content = match read_note_text(&path) {
                Ok(content) => content.to_lowercase(),
                Err(err) => {
                    search.skipped.push(err);
                    continue;
                }
            };
            let title_matches = stem_matches || content.contains(&title);
            let topic_matches = topic
                .as_deref()
                .map_or(true, |topic| content.contains(topic));
            if title_matches && topic_matches {
                search.candidates.push(path);
            }
        }
    }
    search.candidates.sort();
    search.candidates.dedup();
    search
}

/// A note that was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedNote {
    pub path: PathBuf,
    pub title: String,
    pub category: String,
    /// Referencers whose link tokens were removed.
    pub stripped: Vec<PathBuf>,
    /// The category directory became empty and was removed.
    pub directory_removed: bool,
}

/// How a delete request ended.
#[derive(Debug)]
pub enum ForgetOutcome {
    NotFound,
    /// Several notes matched and no valid selection was made.
    Ambiguous { candidates: Vec<PathBuf> },
    Cancelled { path: PathBuf },
    Deleted(DeletedNote),
    /// The target could not be read or removed. `stripped` lists referencers
    /// already rewritten before the failure.
    Failed {
        path: PathBuf,
        error: StoreError,
        stripped: Vec<PathBuf>,
    },
}

/// Outcome plus the non-fatal problems met on the way.
#[derive(Debug)]
pub struct ForgetReport {
    pub outcome: ForgetOutcome,
    pub warnings: Vec<Warning>,
}

/// Deletes one note matching `query`.
pub fn forget(
    config: &StoreConfig,
    query: &ForgetQuery,
    mode: ConfirmMode,
    prompter: &mut dyn Prompter,
) -> ForgetReport {
    let root = config.root.as_path();
    let search = find_candidates(root, query);
    let mut warnings: Vec<Warning> = search.skipped.into_iter().map(Warning::Skipped).collect();
    let finish = |outcome, warnings| ForgetReport { outcome, warnings };

    let target = match search.candidates.len() {
        0 => return finish(ForgetOutcome::NotFound, warnings),
        1 => search.candidates[0].clone(),
        count => match prompter.choose(&search.candidates) {
            Some(index) if index < count => search.candidates[index].clone(),
            _ => {
                return finish(
                    ForgetOutcome::Ambiguous {
                        candidates: search.candidates,
                    },
                    warnings,
                )
            }
        },
    };

    let content = match read_note_text(&target) {
        Ok(content) => content,
        Err(error) => {
            return finish(
                ForgetOutcome::Failed {
                    path: target,
                    error,
                    stripped: Vec::new(),
                },
                warnings,
            )
        }
    };

    let graph = ReferenceGraph::build(root);
    let referencers = graph.inbound(&target);
    warnings.extend(
        graph
            .into_skipped()
            .into_iter()
            .filter(|err| err.path() != target.as_path())
            .map(Warning::Skipped),
    );

    let identifier = target
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let filename = target
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let category = target
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let preview = DeletePreview {
        title: title_from_identifier(&identifier),
        category: category.clone(),
        path: target.clone(),
        content,
        referencers: referencers.clone(),
    };
    let title = preview.title.clone();

    if !pass_gate(mode, prompter, &Prompt::Delete(preview)) {
        return finish(ForgetOutcome::Cancelled { path: target }, warnings);
    }

    let strip = strip_references(&referencers, &filename);
    warnings.extend(strip.failed.into_iter().map(Warning::ReferenceNotRemoved));

    if let Err(error) = remove_note(&target) {
        warn!(
            "event=forget module=service status=error error_code={} path={}",
            error.code(),
            target.display()
        );
        return finish(
            ForgetOutcome::Failed {
                path: target,
                error,
                stripped: strip.rewritten,
            },
            warnings,
        );
    }

    let directory_removed = match target.parent() {
        Some(parent) if parent != root => remove_dir_if_empty(parent),
        _ => false,
    };
    info!(
        "event=forget module=service status=ok path={} stripped={} directory_removed={}",
        target.display(),
        strip.rewritten.len(),
        directory_removed
    );

    finish(
        ForgetOutcome::Deleted(DeletedNote {
            path: target,
            title,
            category,
            stripped: strip.rewritten,
            directory_removed,
        }),
        warnings,
    )
}
