/*!
 * SubRip (.srt) parser.
 *
 * Existing SRT files are re-read so they can be re-timed. The text is
 * repaired first (whitespace-only lines, doubled gaps, missing separators),
 * then split into blocks. Blocks that do not look like a cue are skipped.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::subtitle_processor::{Cue, Track};
use crate::timecode;

/// Label given to the single track of an SRT file
pub const TRACK_LABEL: &str = "srt";

static BLANKISH_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").unwrap());

static EXTRA_GAP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static MISSING_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\n])\n(\d+\n\d+:)").unwrap());

static BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+)[ \t]*\n(\d+):(\d\d):(\d\d)[,.](\d\d\d) --> (\d+):(\d\d):(\d\d)[,.](\d\d\d)[^\n]*\n((?s:.*))$",
    )
    .unwrap()
});

/// One decoded SRT block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtRecord {
    /// Index as written in the file, ignored on output
    pub index: u64,
    pub start_ms: u64,
    pub stop_ms: u64,
    /// Body text, verbatim
    pub text: String,
}

/// Repair common export defects before splitting into blocks
pub fn normalize(text: &str) -> String {
    let text = BLANKISH_LINE_REGEX.replace_all(text, "");
    let text = EXTRA_GAP_REGEX.replace_all(&text, "\n\n");
    MISSING_SEPARATOR_REGEX.replace_all(&text, "$1\n\n$2").into_owned()
}

/// Decode one block (index line, timing line, body)
pub fn decode_block(block: &str) -> Result<SrtRecord, SubtitleError> {
    let malformed = || SubtitleError::MalformedRecord(format!("not an SRT block: {:?}", first_line(block)));

    let caps = BLOCK_REGEX.captures(block).ok_or_else(malformed)?;

    let mut fields = [0u64; 9];
    for (slot, idx) in fields.iter_mut().zip(1..=9usize) {
        *slot = caps[idx].parse().map_err(|_| malformed())?;
    }
    let [index, h1, m1, s1, ms1, h2, m2, s2, ms2] = fields;

    Ok(SrtRecord {
        index,
        start_ms: timecode::srt_time_to_ms(h1, m1, s1, ms1).ok_or_else(malformed)?,
        stop_ms: timecode::srt_time_to_ms(h2, m2, s2, ms2).ok_or_else(malformed)?,
        text: caps[10].trim_end_matches('\n').to_string(),
    })
}

/// Parse an SRT document into a single track
pub fn parse(file_name: &str, text: &str) -> Result<Track, SubtitleError> {
    let normalized = normalize(text);
    let mut cues = Vec::new();
    let mut malformed = 0usize;

    for block in normalized.split("\n\n") {
        let block = block.trim_start_matches('\n');
        if block.trim().is_empty() {
            continue;
        }

        let record = match decode_block(block) {
            Ok(record) => record,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };

        if record.stop_ms < record.start_ms {
            return Err(SubtitleError::SyncOrderingInvalid {
                file: file_name.to_string(),
                start_ms: record.start_ms,
                stop_ms: record.stop_ms,
            });
        }

        if let Some(cue) = Cue::try_new(record.start_ms, record.stop_ms, record.text) {
            cues.push(cue);
        }
    }

    debug!("{}: {} cues, {} malformed blocks skipped", file_name, cues.len(), malformed);

    Ok(Track::new(TRACK_LABEL, cues))
}

fn first_line(block: &str) -> &str {
    block.lines().next().unwrap_or("")
}
