//! Create-or-update coordinator.
//!
//! Steps, in order: locate the target from category + kebab-cased title,
//! check whether it exists (update gate), scan the category for similar notes
//! (merge gate), render the template, write the file. A rejected gate ends
//! the operation with no filesystem change.

use crate::config::StoreConfig;
use crate::model::memory_type::MemoryType;
use crate::model::note::{note_filename, NoteLocation};
use crate::references::detect_cycle;
use crate::service::gate::{pass_gate, ConfirmMode, Prompt, Prompter};
use crate::service::{MutationError, Warning};
use crate::similarity::{find_similar, Candidate, SimilarMatch};
use crate::store::files::{ensure_category_dir, write_note};
use crate::template::{load_template, render_note, NoteFields};
use chrono::Local;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// A note the new note should link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedNote {
    /// Resolved path, used to read the related note.
    pub path: PathBuf,
    /// Link target exactly as the user gave it.
    pub link: String,
}

impl RelatedNote {
    /// Resolves `raw` against `cwd` when it is relative.
    pub fn resolve(raw: &str, cwd: &Path) -> Self {
        let given = Path::new(raw);
        let path = if given.is_absolute() {
            given.to_path_buf()
        } else {
            cwd.join(given)
        };
        Self {
            path,
            link: raw.to_string(),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.link.clone())
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.link.clone())
    }
}

/// Input of one `remember` call.
#[derive(Debug, Clone)]
pub struct RememberRequest {
    pub memory_type: MemoryType,
    pub title: String,
    pub content: String,
    pub related: Option<RelatedNote>,
}

/// Gate at which the operator declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledAt {
    Update,
    Merge,
}

/// How a `remember` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RememberStatus {
    Created,
    Updated,
    Cancelled(CancelledAt),
}

/// Result of a `remember` call.
#[derive(Debug)]
pub struct RememberReport {
    pub status: RememberStatus,
    /// Absolute target path (written unless cancelled).
    pub path: PathBuf,
    pub location: NoteLocation,
    /// Up to three similar notes, best first.
    pub similar: Vec<SimilarMatch>,
    /// The category directory did not exist and was created.
    pub category_created: bool,
    pub warnings: Vec<Warning>,
}

/// Creates or updates a note, stamped with the current local time.
pub fn remember(
    config: &StoreConfig,
    request: &RememberRequest,
    mode: ConfirmMode,
    prompter: &mut dyn Prompter,
) -> Result<RememberReport, MutationError> {
    let timestamp = Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();
    remember_at(config, request, mode, prompter, &timestamp)
}

/// [`remember`] with an explicit timestamp.
pub fn remember_at(
    config: &StoreConfig,
    request: &RememberRequest,
    mode: ConfirmMode,
    prompter: &mut dyn Prompter,
    timestamp: &str,
) -> Result<RememberReport, MutationError> {
    let filename = note_filename(&request.title)?;
    let folder = request.memory_type.folder();
    let category_dir = config.root.join(folder);
    let target = category_dir.join(&filename);
    let location = NoteLocation::from_path(&config.root, &target)
        .unwrap_or_else(|| NoteLocation::new(folder, filename.trim_end_matches(".md")));

    let mut report = RememberReport {
        status: RememberStatus::Created,
        path: target.clone(),
        location,
        similar: Vec::new(),
        category_created: false,
        warnings: Vec::new(),
    };

    let is_update = target.is_file();
    if is_update {
        report.status = RememberStatus::Updated;
        let prompt = Prompt::UpdateExisting {
            path: target.clone(),
        };
        if !pass_gate(mode, prompter, &prompt) {
            report.status = RememberStatus::Cancelled(CancelledAt::Update);
            return Ok(report);
        }
    }

    let candidate = Candidate::new(&request.title, &request.content);
    let similarity = find_similar(&config.root, folder, &candidate, Some(&target));
    report.similar = similarity.surfaced().to_vec();
    let best = similarity.best().cloned();
    report
        .warnings
        .extend(similarity.skipped.into_iter().map(Warning::Skipped));
    if let Some(best) = best {
        let prompt = Prompt::MergeSimilar {
            best,
            top: report.similar.clone(),
        };
        if !pass_gate(mode, prompter, &prompt) {
            report.status = RememberStatus::Cancelled(CancelledAt::Merge);
            return Ok(report);
        }
    }

    let template = load_template(config.template_path.as_deref());
    let related = related_section(request.related.as_ref(), &filename, &mut report.warnings);
    let rendered = render_note(
        &template,
        &NoteFields {
            title: &request.title,
            timestamp,
            memory_type: request.memory_type,
            content: &request.content,
            related: &related,
        },
    );

    report.category_created = ensure_category_dir(&category_dir)?;
    write_note(&target, &rendered)?;

    info!(
        "event=remember module=service status=ok mode={} path={} similar={}",
        if is_update { "update" } else { "create" },
        target.display(),
        report.similar.len()
    );
    Ok(report)
}

fn related_section(
    related: Option<&RelatedNote>,
    new_filename: &str,
    warnings: &mut Vec<Warning>,
) -> String {
    let Some(related) = related else {
        return String::new();
    };
    match detect_cycle(&related.path, new_filename) {
        Ok(false) => format!("- [{}]({})", related.stem(), related.link),
        Ok(true) => {
            warn!(
                "event=remember module=service status=warn error_code=circular_dependency related={}",
                related.path.display()
            );
            warnings.push(Warning::CircularDependency {
                related: related.path.clone(),
            });
            format!("⚠️  Circular dependency with {}", related.file_name())
        }
        Err(err) => {
            warn!(
                "event=remember module=service status=warn error_code={} related={}",
                err.code(),
                related.path.display()
            );
            warnings.push(Warning::RelatedUnavailable(err));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RelatedNote;
    use std::path::{Path, PathBuf};

    #[test]
    fn related_note_resolves_relative_paths_against_cwd() {
        let related = RelatedNote::resolve("ideas/other.md", Path::new("/work"));
        assert_eq!(related.path, PathBuf::from("/work/ideas/other.md"));
        assert_eq!(related.link, "ideas/other.md");
        assert_eq!(related.stem(), "other");

        let absolute = RelatedNote::resolve("/store/ideas/x.md", Path::new("/work"));
        assert_eq!(absolute.path, PathBuf::from("/store/ideas/x.md"));
    }
}
