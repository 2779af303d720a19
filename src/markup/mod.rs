/*!
 * Inline markup translation into canonical SRT markup.
 *
 * Canonical markup is the small subset understood by SRT players:
 * `<b>`, `<i>`, `<u>` and `<font color="...">`.
 *
 * - `sami`: lenient tokenizer for SAMI blocks and HTML cleanup
 * - `ass`: override-block (`{\b1}`) interpreter
 */

use once_cell::sync::Lazy;
use regex::Regex;

pub mod ass;
pub mod sami;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static NBSP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&nbsp;").unwrap());

/// Remove every `<...>` tag, keeping the text between them
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// True when nothing visible remains once tags and `&nbsp;` entities are gone
pub fn is_blank_text(text: &str) -> bool {
    let stripped = strip_tags(text);
    NBSP_REGEX.replace_all(&stripped, " ").trim().is_empty()
}

/// Trim every line and drop empty ones.
///
/// An empty line inside a cue would end the SRT block early.
pub fn tidy_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
