/*!
 * SAMI (.smi) parser.
 *
 * A SAMI body is a flat run of `<SYNC Start=...>` blocks, each holding one
 * `<P Class=...>` paragraph. Every class becomes its own track, and a cue
 * lasts until the next block of the same class starts.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::markup::{self, sami::SamiBlock};
use crate::subtitle_processor::{Cue, Track};

static SYNC_START_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<sync\b").unwrap());

static BODY_END_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</body").unwrap());

static LOOSE_NBSP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&nbsp;?").unwrap());

/// Give every `&nbsp` its missing semicolon
pub fn repair_nbsp(text: &str) -> String {
    LOOSE_NBSP_REGEX.replace_all(text, "&nbsp;").into_owned()
}

/// Cut the body into raw SYNC blocks.
///
/// A block runs up to the next `<SYNC`, the closing `</BODY` or the end of
/// the text, with trailing whitespace excluded.
pub fn split_sync_blocks(text: &str) -> Vec<&str> {
    let limit = BODY_END_REGEX.find(text).map_or(text.len(), |m| m.start());
    let body = &text[..limit];

    let starts: Vec<usize> = SYNC_START_REGEX.find_iter(body).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let end = starts.get(idx + 1).copied().unwrap_or(limit);
            body[start..end].trim_end()
        })
        .collect()
}

/// Parse a SAMI document into one track per class, in first-appearance order
pub fn parse(file_name: &str, text: &str) -> Result<Vec<Track>, SubtitleError> {
    let text = repair_nbsp(text);
    let raw_blocks = split_sync_blocks(&text);

    if raw_blocks.is_empty() {
        return Err(SubtitleError::NoCuesFound {
            file: file_name.to_string(),
        });
    }

    let mut groups: Vec<(String, Vec<SamiBlock>)> = Vec::new();
    let mut malformed = 0usize;

    for raw in &raw_blocks {
        match markup::sami::parse_sync_block(raw) {
            Ok(block) => match groups.iter_mut().find(|(label, _)| *label == block.label) {
                Some((_, blocks)) => blocks.push(block),
                None => groups.push((block.label.clone(), vec![block])),
            },
            Err(_) => malformed += 1,
        }
    }

    debug!(
        "{}: {} SYNC blocks, {} malformed skipped, {} class(es)",
        file_name,
        raw_blocks.len(),
        malformed,
        groups.len()
    );

    Ok(groups
        .into_iter()
        .map(|(label, blocks)| build_track(label, blocks))
        .collect())
}

fn build_track(label: String, mut blocks: Vec<SamiBlock>) -> Track {
    blocks.sort_by_key(|block| block.start_ms);

    // The last block only marks where the previous cue stops
    let cues = blocks
        .iter()
        .zip(blocks.iter().skip(1))
        .filter(|(block, _)| !markup::is_blank_text(&block.payload))
        .filter_map(|(block, next)| {
            Cue::try_new(block.start_ms, next.start_ms, markup::sami::translate(&block.payload))
        })
        .collect();

    Track::new(label, cues)
}
