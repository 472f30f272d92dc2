//! Token-overlap similarity between a candidate note and existing notes.
//!
//! # Responsibility
//! - Tokenize titles and bodies into case-folded alphanumeric runs.
//! - Score a candidate against every note of one category and rank the
//!   qualifying ones.
//!
//! # Invariants
//! - Scores are in `[0, 1]`: `0.7 * content_jaccard + 0.3 * title_jaccard`.
//! - A note qualifies only when its score is strictly above `0.30`.
//! - An empty content token set on either side never divides by zero; the
//!   pairing is skipped.
//! - Scores are never persisted.

use crate::model::note::Note;
use crate::store::scanner::{load_note, scan_notes};
use crate::store::StoreError;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Weight of the content overlap in the combined score.
pub const CONTENT_WEIGHT: f64 = 0.7;
/// Weight of the title overlap in the combined score.
pub const TITLE_WEIGHT: f64 = 0.3;
/// Scores must be strictly greater than this to qualify.
pub const SIMILARITY_THRESHOLD: f64 = 0.30;
/// How many matches are surfaced to callers.
pub const MAX_SURFACED_MATCHES: usize = 3;

const MIN_TOKEN_CHARS: usize = 3;

static ALNUM_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid token regex"));

/// Distinct case-folded tokens of one text.
pub type TokenSet = BTreeSet<String>;

/// Extracts the distinct case-folded alphanumeric runs of at least three
/// characters.
pub fn tokenize(text: &str) -> TokenSet {
    ALNUM_RUN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

/// Jaccard index `|a ∩ b| / |a ∪ b|`; `0.0` when both sets are empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Weighted combination of content and title overlap.
pub fn combined_score(content_overlap: f64, title_overlap: f64) -> f64 {
    CONTENT_WEIGHT * content_overlap + TITLE_WEIGHT * title_overlap
}

/// Strict threshold check.
pub fn qualifies(score: f64) -> bool {
    score > SIMILARITY_THRESHOLD
}

/// Tokenized candidate (title + content) about to be written.
#[derive(Debug, Clone)]
pub struct Candidate {
    content_tokens: TokenSet,
    title_tokens: TokenSet,
}

impl Candidate {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            content_tokens: tokenize(content),
            title_tokens: tokenize(title),
        }
    }

    /// Scores this candidate against one existing note.
    ///
    /// Returns `None` when either content token set is empty.
    pub fn score(&self, note: &Note) -> Option<f64> {
        let note_content = tokenize(&note.body);
        if self.content_tokens.is_empty() || note_content.is_empty() {
            return None;
        }
        let note_title = tokenize(&note.title);
        let content_overlap = jaccard(&self.content_tokens, &note_content);
        let title_overlap = jaccard(&self.title_tokens, &note_title);
        Some(combined_score(content_overlap, title_overlap))
    }
}

/// One existing note that qualified as similar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMatch {
    #[serde(skip)]
    pub path: PathBuf,
    /// Store-relative path, `/`-separated.
    pub relative_path: String,
    pub title: String,
    pub score: f64,
}

/// Ranked similarity result for one candidate.
#[derive(Debug, Default)]
pub struct SimilarityReport {
    /// Every qualifying note, best first.
    pub matches: Vec<SimilarMatch>,
    /// Notes that could not be read and were skipped.
    pub skipped: Vec<StoreError>,
}

impl SimilarityReport {
    /// The match that takes part in a confirmation decision.
    pub fn best(&self) -> Option<&SimilarMatch> {
        self.matches.first()
    }

    /// At most [`MAX_SURFACED_MATCHES`] matches for display.
    pub fn surfaced(&self) -> &[SimilarMatch] {
        let end = self.matches.len().min(MAX_SURFACED_MATCHES);
        &self.matches[..end]
    }
}

/// Scores `candidate` against every note under `root/<category>`.
///
/// `exclude` skips one file (the write target itself). A missing category
/// directory yields an empty report.
pub fn find_similar(
    root: &Path,
    category: &str,
    candidate: &Candidate,
    exclude: Option<&Path>,
) -> SimilarityReport {
    let mut report = SimilarityReport::default();

    for path in scan_notes(root, Some(category)) {
        if exclude.is_some_and(|excluded| excluded == path.as_path()) {
            continue;
        }
        let note = match load_note(root, &path) {
            Ok(note) => note,
            Err(err) => {
                warn!(
                    "event=similarity_scan module=similarity status=warn error_code={} path={}",
                    err.code(),
                    path.display()
                );
                report.skipped.push(err);
                continue;
            }
        };
        let Some(score) = candidate.score(&note) else {
            continue;
        };
        if qualifies(score) {
            report.matches.push(SimilarMatch {
                relative_path: note.location.display_path(),
                title: note.title,
                path: note.path,
                score,
            });
        }
    }

    // Stable sort: ties keep the path-sorted scan order.
    report
        .matches
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        "event=similarity_scan module=similarity status=ok category={} matches={} skipped={}",
        category,
        report.matches.len(),
        report.skipped.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::{
        combined_score, find_similar, jaccard, qualifies, tokenize, Candidate,
        MAX_SURFACED_MATCHES, SIMILARITY_THRESHOLD,
    };
    use crate::model::note::Note;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn note(path: &str, body: &str) -> Note {
        Note::from_parts(Path::new("/store"), Path::new(path), body.to_string()).unwrap()
    }
    #[test]
    fn tokenize_folds_case_and_drops_short_runs() {
        let tokens = tokenize("Go is OK, but RUST rust-lang v2 über");
        let expected: Vec<&str> = vec!["but", "lang", "rust", "über"];
        assert_eq!(tokens.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn jaccard_of_subset_is_size_ratio() {
        let small = tokenize("alpha beta");
        let large = tokenize("alpha beta gamma delta");
        assert!((jaccard(&small, &large) - 0.5).abs() < 1e-12);
        assert_eq!(jaccard(&small, &large), jaccard(&large, &small));
        assert_eq!(jaccard(&tokenize(""), &tokenize("")), 0.0);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!qualifies(SIMILARITY_THRESHOLD));
        assert!(!qualifies(0.30));
        assert!(qualifies(0.31));
        assert!(!qualifies(combined_score(0.0, 1.0)));
    }

    #[test]
    fn empty_content_on_either_side_is_skipped() {
        let existing = note("/store/ideas/x.md", "# Same Title\n\nsome real content");
        assert_eq!(Candidate::new("Same Title", "").score(&existing), None);
        assert_eq!(Candidate::new("Same Title", "a b c").score(&existing), None);

        let empty = note("/store/ideas/y.md", "");
        assert_eq!(Candidate::new("t", "content words").score(&empty), None);
    }

    #[test]
    fn identical_title_with_disjoint_content_scores_exactly_threshold() {
        let existing = note("/store/ideas/x.md", "# Garden Plan\n\ntomatoes peppers");
        let score = Candidate::new("Garden Plan", "bicycle maintenance")
            .score(&existing)
            .unwrap();
        assert_eq!(score, 0.3);
        assert!(!qualifies(score));
    }

    #[test]
    fn note_without_heading_uses_stem_as_title() {
        let existing = note("/store/ideas/garden-plan.md", "tomatoes peppers");
        let score = Candidate::new("garden plan", "bicycle maintenance")
            .score(&existing)
            .unwrap();
        // "garden-plan" tokenizes to {garden, plan}.
        assert_eq!(score, 0.3);
    }

    #[test]
    fn matches_rank_by_score_with_ties_in_path_order() {
        let dir = tempdir().unwrap();
        let ideas = dir.path().join("ideas");
        fs::create_dir_all(&ideas).unwrap();
        // Two-letter stems carry no title tokens, so only content counts.
        for (stem, body) in [
            ("aa", "alpha beta"),
            ("ff", "alpha zeta"),
            ("mm", "alpha beta gamma zeta"),
            ("nn", "alpha beta gamma omega"),
            ("yy", "alpha beta gamma"),
            ("zz", "alpha beta gamma delta"),
        ] {
            fs::write(ideas.join(format!("{stem}.md")), body).unwrap();
        }

        let candidate = Candidate::new("Cache Design", "alpha beta gamma delta");
        let report = find_similar(dir.path(), "ideas", &candidate, None);
        let ranked = report
            .matches
            .iter()
            .map(|m| m.relative_path.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            ranked,
            vec!["ideas/zz.md", "ideas/yy.md", "ideas/mm.md", "ideas/nn.md", "ideas/aa.md"]
        );
        assert_eq!(report.matches[2].score, report.matches[3].score);
        assert!(report
            .matches
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));

        assert_eq!(report.surfaced().len(), MAX_SURFACED_MATCHES);
        assert_eq!(report.surfaced(), &report.matches[..3]);
        assert_eq!(report.best().unwrap().relative_path, "ideas/zz.md");
        assert!((report.best().unwrap().score - 0.7).abs() < 1e-12);
    }
}
