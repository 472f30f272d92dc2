use mnemonics_core::{
    find_candidates, forget, ConfirmMode, ForgetOutcome, ForgetQuery, Prompt, Prompter,
    StoreConfig, StoreError, Warning,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[derive(Default)]
struct ScriptedPrompter {
    answers: VecDeque<bool>,
    choice: Option<usize>,
    seen: Vec<Prompt>,
    offered: Vec<Vec<PathBuf>>,
}

impl ScriptedPrompter {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self.seen.push(prompt.clone());
        self.answers.pop_front().unwrap_or(false)
    }

    fn choose(&mut self, candidates: &[PathBuf]) -> Option<usize> {
        self.offered.push(candidates.to_vec());
        self.choice
    }
}

fn query(title: &str) -> ForgetQuery {
    ForgetQuery {
        title: title.to_string(),
        ..ForgetQuery::default()
    }
}

fn write(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn delete_strips_links_and_leaves_other_notes_byte_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let target = write(root, "ideas/old-note.md", b"# Old Note\n\nretired idea\n");
    let linking = write(
        root,
        "learning/a.md",
        b"intro line\n\n[[link to old-note.md]]\n\noutro line\n",
    );
    let untouched_body = b"unrelated\n\n\n  spacing kept  \n";
    let untouched = write(root, "learning/b.md", untouched_body);

    let mut prompter = ScriptedPrompter::answering(&[true]);
    let report = forget(
        &StoreConfig::new(root),
        &query("old note"),
        ConfirmMode::Interactive,
        &mut prompter,
    );

    let deleted = match report.outcome {
        ForgetOutcome::Deleted(deleted) => deleted,
        other => panic!("expected deletion, got {other:?}"),
    };
    assert_eq!(deleted.path, target);
    assert_eq!(deleted.title, "old note");
    assert_eq!(deleted.category, "ideas");
    assert_eq!(deleted.stripped, vec![linking.clone()]);
    assert!(deleted.directory_removed);
    assert!(!target.exists());
    assert!(!root.join("ideas").exists());
    assert!(report.warnings.is_empty());

    assert_eq!(fs::read_to_string(&linking).unwrap(), "intro line\noutro line");
    assert_eq!(fs::read(&untouched).unwrap(), untouched_body);

    match &prompter.seen[..] {
        [Prompt::Delete(preview)] => {
            assert_eq!(preview.referencers, vec![linking]);
            assert_eq!(preview.content, "# Old Note\n\nretired idea\n");
        }
        other => panic!("unexpected prompts: {other:?}"),
    }
}

#[test]
fn category_directory_survives_when_other_notes_remain() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let target = write(root, "todos/first-task.md", b"# First Task");
    let sibling = write(root, "todos/second-task.md", b"# Second Task");

    let mut prompter = ScriptedPrompter::default();
    let report = forget(
        &StoreConfig::new(root),
        &query("first"),
        ConfirmMode::AutoConfirm,
        &mut prompter,
    );

    let deleted = match report.outcome {
        ForgetOutcome::Deleted(deleted) => deleted,
        other => panic!("expected deletion, got {other:?}"),
    };
    assert!(!deleted.directory_removed);
    assert!(!target.exists());
    assert!(sibling.exists());
    assert!(root.join("todos").is_dir());
    assert!(prompter.seen.is_empty());
}

#[test]
fn ambiguous_match_requires_a_selection() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let plan = write(root, "ideas/cache-plan.md", b"# Cache Plan");
    let tips = write(root, "learning/cache-tips.md", b"# Cache Tips");
    let config = StoreConfig::new(root);

    let mut undecided = ScriptedPrompter::answering(&[true]);
    let report = forget(&config, &query("Cache"), ConfirmMode::Interactive, &mut undecided);
    match report.outcome {
        ForgetOutcome::Ambiguous { candidates } => {
            assert_eq!(candidates, vec![plan.clone(), tips.clone()]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(undecided.offered, vec![vec![plan.clone(), tips.clone()]]);
    assert!(undecided.seen.is_empty());
    assert!(plan.exists() && tips.exists());

    let mut out_of_range = ScriptedPrompter {
        choice: Some(7),
        ..ScriptedPrompter::default()
    };
    let report = forget(&config, &query("cache"), ConfirmMode::AutoConfirm, &mut out_of_range);
    assert!(matches!(report.outcome, ForgetOutcome::Ambiguous { .. }));

    let mut decided = ScriptedPrompter {
        choice: Some(1),
        ..ScriptedPrompter::default()
    };
    let report = forget(&config, &query("cache"), ConfirmMode::AutoConfirm, &mut decided);
    assert!(matches!(report.outcome, ForgetOutcome::Deleted(ref note) if note.path == tips));
    assert!(plan.exists());
    assert!(!tips.exists());
}

#[test]
fn declined_delete_changes_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let target = write(root, "ideas/old-note.md", b"# Old Note");
    let linking = write(root, "learning/a.md", b"keep\n\n[[old-note.md]]\n\nme");

    let mut prompter = ScriptedPrompter::answering(&[false]);
    let report = forget(
        &StoreConfig::new(root),
        &query("old note"),
        ConfirmMode::Interactive,
        &mut prompter,
    );
    assert!(matches!(report.outcome, ForgetOutcome::Cancelled { ref path } if path == &target));
    assert!(target.exists());
    assert_eq!(
        fs::read_to_string(&linking).unwrap(),
        "keep\n\n[[old-note.md]]\n\nme"
    );
}

#[test]
fn no_match_reports_not_found() {
    let dir = tempdir().unwrap();
    write(dir.path(), "ideas/something.md", b"# Something");

    let mut prompter = ScriptedPrompter::default();
    let report = forget(
        &StoreConfig::new(dir.path()),
        &query("ghost"),
        ConfirmMode::AutoConfirm,
        &mut prompter,
    );
    assert!(matches!(report.outcome, ForgetOutcome::NotFound));
    assert!(prompter.offered.is_empty());
}

#[test]
fn candidates_match_content_and_respect_topic_and_category() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let by_stem = write(root, "ideas/queue-design.md", b"# Queue Design\nuses redis");
    let by_content = write(root, "learning/notes.md", b"thoughts on QUEUE DESIGN and kafka");
    write(root, "learning/other.md", b"nothing relevant");

    let all = find_candidates(root, &query("queue design"));
    assert_eq!(all.candidates, vec![by_stem.clone(), by_content.clone()]);

    let topical = find_candidates(
        root,
        &ForgetQuery {
            title: "queue design".to_string(),
            category: None,
            topic: Some("Kafka".to_string()),
        },
    );
    assert_eq!(topical.candidates, vec![by_content]);

    let scoped = find_candidates(
        root,
        &ForgetQuery {
            title: "queue design".to_string(),
            category: Some("ideas".to_string()),
            topic: None,
        },
    );
    assert_eq!(scoped.candidates, vec![by_stem]);
}

#[test]
fn unreadable_notes_do_not_block_deletion() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let target = write(root, "ideas/old-note.md", b"# Old Note");
    write(root, "ideas/broken.md", &[0xff, 0xfe, 0xfd]);

    let mut prompter = ScriptedPrompter::default();
    let report = forget(
        &StoreConfig::new(root),
        &query("old note"),
        ConfirmMode::AutoConfirm,
        &mut prompter,
    );
    assert!(matches!(report.outcome, ForgetOutcome::Deleted(ref note) if !note.directory_removed));
    assert!(!target.exists());
    assert!(!report.warnings.is_empty());
    assert!(report
        .warnings
        .iter()
        .all(|warning| matches!(warning, Warning::Skipped(err) if err.path().ends_with("broken.md"))));
}

#[test]
fn category_cannot_reach_outside_the_store() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "ideas/keep.md", b"# Keep");
    let outside = tempdir().unwrap();
    let secret = write(outside.path(), "private/secret.md", b"# Secret");
    let outside_name = outside.path().file_name().unwrap().to_string_lossy();

    for category in [
        outside.path().join("private").display().to_string(),
        format!("../{outside_name}/private"),
        "..".to_string(),
        "ideas/../..".to_string(),
    ] {
        let query = ForgetQuery {
            title: "secret".to_string(),
            category: Some(category.clone()),
            ..ForgetQuery::default()
        };
        assert!(
            find_candidates(root, &query).candidates.is_empty(),
            "category {category} escaped the store"
        );

        let mut prompter = ScriptedPrompter::default();
        let report = forget(
            &StoreConfig::new(root),
            &query,
            ConfirmMode::AutoConfirm,
            &mut prompter,
        );
        assert!(matches!(report.outcome, ForgetOutcome::NotFound));
    }

    assert!(secret.exists());
    assert!(outside.path().join("private").is_dir());
    assert!(root.join("ideas/keep.md").exists());
}

/// Accepts every prompt, but removes the target itself first.
struct VanishingTarget;

impl Prompter for VanishingTarget {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        if let Prompt::Delete(preview) = prompt {
            fs::remove_file(&preview.path).unwrap();
        }
        true
    }

    fn choose(&mut self, _candidates: &[PathBuf]) -> Option<usize> {
        None
    }
}

#[test]
fn failed_removal_still_reports_stripped_referencers() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let target = write(root, "ideas/old-note.md", b"# Old Note");
    let linking = write(root, "learning/a.md", b"keep\n\n[[old-note.md]]\n\nme");

    let report = forget(
        &StoreConfig::new(root),
        &query("old note"),
        ConfirmMode::Interactive,
        &mut VanishingTarget,
    );

    match report.outcome {
        ForgetOutcome::Failed {
            path,
            error,
            stripped,
        } => {
            assert_eq!(path, target);
            assert_eq!(stripped, vec![linking.clone()]);
            assert!(matches!(error, StoreError::RemoveFailed { .. }));
            assert_eq!(error.code(), "remove_failed");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&linking).unwrap(), "keep\nme");
    // the category directory is left alone after a failed removal
    assert!(root.join("ideas").is_dir());
}
