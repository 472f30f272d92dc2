//! Link-token removal for one note body.

use std::ops::Range;

const TOKEN_OPEN: &str = "[[";
const TOKEN_CLOSE: &str = "]]";

/// Removes every `[[ ... <target_filename> ... ]]` token from `content`.
///
/// A token runs from `[[` to the first `]]` after it on the same line, so
/// single brackets inside a token are fine and two tokens on one line never
/// merge. A token alone on its line is removed together with the line: the
/// whitespace around it collapses to one line break. A token sharing its
/// line with other text is cut out and everything around it is kept
/// verbatim. The result is trimmed.
///
/// Content without any matching token is returned unchanged, byte for byte.
pub fn strip_link_tokens(content: &str, target_filename: &str) -> String {
    let tokens = link_tokens(content, target_filename);
    if tokens.is_empty() {
        return content.to_string();
    }

    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;

    for token in tokens {
        let mut start = token.start;
        while start > cursor && is_layout_whitespace(bytes[start - 1]) {
            start -= 1;
        }
        let mut end = token.end;
        while end < bytes.len() && is_layout_whitespace(bytes[end]) {
            end += 1;
        }

        out.push_str(&content[cursor..start]);
        let before = &content[start..token.start];
        let after = &content[token.end..end];
        let opens_line =
            before.contains('\n') || (start == cursor && (out.is_empty() || out.ends_with('\n')));
        let closes_line = after.contains('\n') || end == bytes.len();

        if opens_line && closes_line {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            cursor = end;
        } else {
            out.push_str(before);
            cursor = token.end;
        }
    }

    out.push_str(&content[cursor..]);
    out.trim().to_string()
}

/// Byte ranges of the link tokens naming `target_filename`, in order.
fn link_tokens(content: &str, target_filename: &str) -> Vec<Range<usize>> {
    let mut tokens = Vec::new();
    let mut search_from = 0;
    while let Some(offset) = content[search_from..].find(TOKEN_OPEN) {
        let start = search_from + offset;
        let inner_start = start + TOKEN_OPEN.len();
        let Some(close) = content[inner_start..].find(TOKEN_CLOSE) else {
            break;
        };
        let inner = &content[inner_start..inner_start + close];
        if !inner.contains('\n') && inner.contains(target_filename) {
            let end = inner_start + close + TOKEN_CLOSE.len();
            tokens.push(start..end);
            search_from = end;
        } else {
            search_from = start + 1;
        }
    }
    tokens
}

fn is_layout_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::strip_link_tokens;

    #[test]
    fn removes_token_and_collapses_blank_lines() {
        let body = "# A\n\nIntro paragraph.\n\n[[link to old-note.md]]\n\nOutro stays.";
        assert_eq!(
            strip_link_tokens(body, "old-note.md"),
            "# A\n\nIntro paragraph.\nOutro stays."
        );
    }

    #[test]
    fn distinct_tokens_on_one_line_are_removed_independently() {
        let body = "see [[keep.md]] and [[old.md]] then [[also old.md]] end";
        assert_eq!(
            strip_link_tokens(body, "old.md"),
            "see [[keep.md]] and  then  end"
        );
    }

    #[test]
    fn inline_token_keeps_surrounding_single_line_breaks() {
        let body = "- first\n- ref [[old.md]]\n- last";
        assert_eq!(strip_link_tokens(body, "old.md"), "- first\n- ref \n- last");
    }

    #[test]
    fn token_with_single_brackets_inside_is_removed() {
        let body = "keep\n[[see [draft] old-note.md]]\nend";
        assert_eq!(strip_link_tokens(body, "old-note.md"), "keep\nend");
        let body = "a [[x] old.md]] b [[keep.md]]";
        assert_eq!(strip_link_tokens(body, "old.md"), "a  b [[keep.md]]");
    }

    #[test]
    fn token_never_spans_past_its_closing_brackets() {
        let body = "[[keep.md]] then old.md]] stays";
        assert_eq!(strip_link_tokens(body, "old.md"), body);
    }

    #[test]
    fn token_at_line_end_keeps_paragraph_break() {
        let body = "See [[old.md]]\n\nNext";
        assert_eq!(strip_link_tokens(body, "old.md"), "See \n\nNext");
    }

    #[test]
    fn content_without_token_is_untouched() {
        let body = "\n  mentions old.md in prose only\n\n\n";
        assert_eq!(strip_link_tokens(body, "old.md"), body);
    }

    #[test]
    fn filename_is_matched_literally_not_as_regex() {
        let body = "[[oldXmd]]\n[[old.md]]";
        assert_eq!(strip_link_tokens(body, "old.md"), "[[oldXmd]]");
    }

    #[test]
    fn adjacent_tokens_on_separate_lines() {
        let body = "top\n\n[[a old.md]]\n\n[[b old.md]]\n\nbottom";
        assert_eq!(strip_link_tokens(body, "old.md"), "top\nbottom");
    }
}
