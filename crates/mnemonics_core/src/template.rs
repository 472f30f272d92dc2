//! Note template loading and placeholder substitution.
//!
//! # Responsibility
//! - Provide the built-in note template and load an override from disk.
//! - Render a note by applying an explicit, ordered list of substitutions.
//!
//! # Invariants
//! - Every rule is applied exactly once, in list order; a marker missing from
//!   the template is a no-op and leaves the template text as is.
//! - Values are inserted verbatim; they are never re-scanned for markers by
//!   the rule that inserted them.

use crate::model::memory_type::MemoryType;
use crate::store::scanner::read_note_text;
use log::warn;
use std::path::Path;

pub const TITLE_MARKER: &str = "{Memory Title}";
pub const TIMESTAMP_MARKER: &str = "{timestamp}";
pub const OVERVIEW_MARKER: &str = "{Overview content goes here}";
pub const EXAMPLES_MARKER: &str = "{Examples content goes here}";
pub const MEMORY_CONTENT_MARKER: &str = "{Memory content goes here}";
pub const CONTENT_MARKER: &str = "{Content goes here}";
pub const RELATED_MARKER: &str = "{Related links and references go here}";

/// Template used when no template file is configured or it cannot be read.
pub const DEFAULT_TEMPLATE: &str = "# {Memory Title}

- created at: {timestamp}
- last modified at: {timestamp}

## Overview

{Overview content goes here}

## Examples

{Examples content goes here}

## Related

{Related links and references go here}

## Content

{Memory content goes here}";

/// One `(marker, value)` replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub marker: String,
    pub value: String,
}

impl Substitution {
    pub fn new(marker: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            value: value.into(),
        }
    }
}

/// Values that fill one rendered note.
#[derive(Debug, Clone)]
pub struct NoteFields<'a> {
    pub title: &'a str,
    pub timestamp: &'a str,
    pub memory_type: MemoryType,
    pub content: &'a str,
    /// Body of the "Related" section; empty when there is no related note.
    pub related: &'a str,
}

/// The ordered substitution list for a note.
///
/// Order: title, timestamp, type section heading, overview, examples,
/// generic memory content, generic content, related links.
pub fn substitution_rules(fields: &NoteFields<'_>) -> Vec<Substitution> {
    let section = fields.memory_type.section();
    vec![
        Substitution::new(TITLE_MARKER, fields.title),
        Substitution::new(TIMESTAMP_MARKER, fields.timestamp),
        Substitution::new(
            format!("## {section}"),
            format!("## {section}\n\n{}", fields.content),
        ),
        Substitution::new(OVERVIEW_MARKER, fields.content),
        Substitution::new(EXAMPLES_MARKER, fields.content),
        Substitution::new(MEMORY_CONTENT_MARKER, fields.content),
        Substitution::new(CONTENT_MARKER, fields.content),
        Substitution::new(RELATED_MARKER, fields.related),
    ]
}

/// Applies each rule once, in order.
pub fn apply_substitutions(template: &str, rules: &[Substitution]) -> String {
    rules
        .iter()
        .fold(template.to_string(), |rendered, rule| {
            rendered.replace(&rule.marker, &rule.value)
        })
}

/// Renders a note from `template`.
pub fn render_note(template: &str, fields: &NoteFields<'_>) -> String {
    apply_substitutions(template, &substitution_rules(fields))
}

/// Loads the template at `path`, falling back to [`DEFAULT_TEMPLATE`].
pub fn load_template(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return DEFAULT_TEMPLATE.to_string();
    };
    match read_note_text(path) {
        Ok(template) => template,
        Err(err) => {
            warn!(
                "event=template_load module=template status=warn error_code={} path={}",
                err.code(),
                path.display()
            );
            DEFAULT_TEMPLATE.to_string()
        }
    }
}
