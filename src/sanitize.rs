//! Free-text normalization for prompt embedding.
//!
//! Raw questionnaire answers are stored exactly as typed; this module is only
//! applied when an answer is interpolated into a generation prompt, where the
//! text must survive both a JSON string literal and a larger natural-language
//! template.

/// Normalize arbitrary user text into a single-line, JSON-literal-safe string.
///
/// Applied in order:
/// 1. Every control character (0x00-0x1F and 0x7F) becomes a single space.
/// 2. Bare `\` and `"` are escaped. Pairs that are already escaped (`\\`,
///    `\"`) are copied through unchanged, which keeps the function idempotent.
/// 3. Whitespace runs collapse to one space.
/// 4. Leading and trailing whitespace is trimmed.
///
/// Never fails; the empty string maps to the empty string.
pub fn sanitize(text: &str) -> String {
    let stripped = strip_control_chars(text);
    let escaped = escape_structural(&stripped);
    collapse_whitespace(&escaped)
}

/// Replace every ASCII control character with a single space.
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect()
}

/// Escape bare backslashes and double quotes, leaving `\\` and `\"` intact.
fn escape_structural(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                // Already-escaped pair: copy both characters through.
                Some('\\') | Some('"') => {
                    out.push('\\');
                    out.push(chars.next().unwrap_or_default());
                }
                _ => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }

    out
}

/// Collapse whitespace runs to single spaces and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_empty_string() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_plain_text_unchanged() {
        assert_eq!(sanitize("a simple answer"), "a simple answer");
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        let input = "one\x00two\x07three\x7ffour";
        let output = sanitize(input);
        assert!(!output.chars().any(|c| c.is_ascii_control()));
        assert_eq!(output, "one two three four");
    }

    #[test]
    fn test_sanitize_collapses_tabs_and_newlines() {
        assert_eq!(sanitize("line one\n\tline two"), "line one line two");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize("a    b\t\t c"), "a b c");
    }

    #[test]
    fn test_sanitize_trims_ends() {
        assert_eq!(sanitize("   padded   "), "padded");
    }

    #[test]
    fn test_sanitize_escapes_double_quote() {
        assert_eq!(sanitize("say \"hello\""), "say \\\"hello\\\"");
    }

    #[test]
    fn test_sanitize_escapes_bare_backslash() {
        assert_eq!(sanitize("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_sanitize_preserves_already_escaped_pairs() {
        assert_eq!(sanitize("say \\\"hello\\\""), "say \\\"hello\\\"");
        assert_eq!(sanitize("C:\\\\path"), "C:\\\\path");
    }

    #[test]
    fn test_sanitize_idempotent() {
        let inputs = [
            "plain",
            "with \"quotes\" and \\slashes\\",
            "control\x01chars\nand\tspace   runs",
            "trailing backslash \\",
            "",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_sanitize_whitespace_only_becomes_empty() {
        assert_eq!(sanitize(" \t\n "), "");
    }

    #[test]
    fn test_sanitize_trailing_backslash() {
        assert_eq!(sanitize("ends with \\"), "ends with \\\\");
    }
}
