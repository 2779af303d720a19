//! Language utilities for ISO language code handling
//!
//! This module maps subtitle track labels, filename hints and detected text
//! languages to the ISO 639-1 codes used in output file names.

use anyhow::{Result, anyhow};
use isolang::Language;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::Track;

// SAMI class names such as ENCC, KRCC, KOKRCC, JPCC
static LABEL_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)^en").unwrap(), "en"),
        (Regex::new(r"(?i)^(kr|ko)").unwrap(), "ko"),
        (Regex::new(r"(?i)^(ja|jp)").unwrap(), "ja"),
    ]
});

/// Where a track's language code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    /// Track label pattern
    Label,
    /// Language hint in the file name
    FilenameHint,
    /// Statistical detection over the track text
    Detected,
}

/// Output language assigned to a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageClassification {
    /// Code used in the output file name (`en`, `ko`, `zh-cn`, ...)
    pub code: String,
    pub source: ClassificationSource,
}

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        // Mandarin has no 639-1 code of its own
        if normalized_code == "cmn" {
            return Ok("zh".to_string());
        }

        let part2t = part2b_to_part2t(&normalized_code).unwrap_or(normalized_code.as_str());
        if let Some(lang) = Language::from_639_3(part2t) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a code
///
/// Regional codes such as `zh-cn` are named after their base language.
pub fn get_language_name(code: &str) -> Result<String> {
    let base = code.split('-').next().unwrap_or(code);
    let normalized = normalize_to_part2t(base)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Language implied by a SAMI class name
pub fn language_from_label(label: &str) -> Option<&'static str> {
    let label = label.trim();
    LABEL_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(label))
        .map(|(_, code)| *code)
}

/// Normalize a filename language hint (`eng`, `KOR`, `chs`, ...)
pub fn normalize_filename_hint(hint: &str) -> Option<&'static str> {
    let code = match hint.trim().to_lowercase().as_str() {
        "en" | "eng" => "en",
        "ko" | "kor" => "ko",
        "ja" | "jap" => "ja",
        "zh-cn" | "chs" => "zh-cn",
        "zh-tw" | "cht" => "zh-tw",
        _ => return None,
    };
    Some(code)
}

/// Detect the language of plain text as an ISO 639-1 code where one exists
pub fn detect_language(text: &str) -> Option<String> {
    let info = whatlang::detect(text)?;
    let code = info.lang().code();
    debug!("Detected language {} (confidence {:.2})", code, info.confidence());

    normalize_to_part1_or_part2t(code).ok()
}

/// Decide the output language of a track.
///
/// The label wins, then the filename hint (only for single-track files),
/// then detection over the track text. `None` means the track cannot be
/// named and should be skipped.
pub fn classify_track(track: &Track, hint: Option<&str>, track_count: usize) -> Option<LanguageClassification> {
    if let Some(code) = language_from_label(&track.label) {
        return Some(LanguageClassification {
            code: code.to_string(),
            source: ClassificationSource::Label,
        });
    }

    if track_count == 1 {
        if let Some(code) = hint.and_then(normalize_filename_hint) {
            return Some(LanguageClassification {
                code: code.to_string(),
                source: ClassificationSource::FilenameHint,
            });
        }
    }

    detect_language(&track.plain_text()).map(|code| LanguageClassification {
        code,
        source: ClassificationSource::Detected,
    })
}
