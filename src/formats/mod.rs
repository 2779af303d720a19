/*!
 * Format detection and per-format parsers.
 *
 * Detection looks only at the start of the decoded text. Each parser turns
 * a whole document into tracks of cues, dropping malformed records and
 * failing only on file-level problems.
 */

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod ass;
pub mod sami;
pub mod srt;

static SAMI_SIGNATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*<SAMI").unwrap());

static SRT_SIGNATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d{1,3}\n").unwrap());

static ASS_SIGNATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[Script Info\]").unwrap());

/// Structural format of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Sami,
    Srt,
    Ass,
    Unrecognized,
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SubtitleFormat::Sami => "SAMI",
            SubtitleFormat::Srt => "SRT",
            SubtitleFormat::Ass => "ASS",
            SubtitleFormat::Unrecognized => "unrecognized",
        };
        write!(f, "{}", name)
    }
}

/// Detect the format from the leading bytes of newline-normalized text
pub fn detect_format(text: &str) -> SubtitleFormat {
    if SAMI_SIGNATURE.is_match(text) {
        SubtitleFormat::Sami
    } else if SRT_SIGNATURE.is_match(text) {
        SubtitleFormat::Srt
    } else if ASS_SIGNATURE.is_match(text) {
        SubtitleFormat::Ass
    } else {
        SubtitleFormat::Unrecognized
    }
}

/// First `count` character codes, reported when detection fails
pub fn leading_char_codes(text: &str, count: usize) -> Vec<u32> {
    text.chars().take(count).map(u32::from).collect()
}
