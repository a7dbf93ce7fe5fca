//! Cleanup of user-supplied tribute names.
use regex::Regex;
use std::sync::OnceLock;

const MARKDOWN_METACHARS: [char; 7] = ['*', '_', '~', '`', '|', '>', '\\'];

struct NamePatterns {
    whitespace: Regex,
    control: Regex,
    markdown: Regex,
}

fn patterns() -> &'static NamePatterns {
    static PATTERNS: OnceLock<NamePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| NamePatterns {
        whitespace: Regex::new(r"\s+").expect("whitespace pattern is a valid regex"),
        control: Regex::new(r"[\p{Cc}\p{Cf}]").expect("control pattern is a valid regex"),
        markdown: Regex::new(r"([*_~`|>\\])").expect("markdown pattern is a valid regex"),
    })
}

/// Normalize a raw name for display in chat.
///
/// Trims, collapses whitespace runs to one space, drops control and format
/// characters, then escapes markdown metacharacters with a backslash.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    let patterns = patterns();
    let collapsed = patterns.whitespace.replace_all(raw.trim(), " ");
    let visible = patterns.control.replace_all(&collapsed, "");
    patterns
        .markdown
        .replace_all(visible.trim(), r"\$1")
        .into_owned()
}

/// Length in characters of a sanitized name as the user typed it: each
/// escaped metacharacter counts once.
#[must_use]
pub fn unescaped_len(name: &str) -> usize {
    let mut len = 0;
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek().is_some_and(|next| MARKDOWN_METACHARS.contains(next)) {
            chars.next();
        }
        len += 1;
    }
    len
}
