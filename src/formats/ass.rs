/*!
 * ASS/SSA (.ass) parser.
 *
 * Only the `[Events]` section matters. Every record that matches the event
 * shape becomes a cue, whatever its kind; styles, fonts and positioning are
 * not carried over.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;
use crate::markup;
use crate::subtitle_processor::{Cue, Track};
use crate::timecode;

/// Label given to the single track of an ASS file
pub const TRACK_LABEL: &str = "ass";

const EVENTS_SECTION: &str = "Events";

static SECTION_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.+)\]$").unwrap());

// Kind: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text
static EVENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(.*?):\s*(\d+),(\d+):(\d\d):(\d\d)\.(\d\d),(\d+):(\d\d):(\d\d)\.(\d\d),(.*?),(.*?),(\d+),(\d+),(\d+),(.*?),(.*)$",
    )
    .unwrap()
});

/// One decoded `[Events]` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssDialogue {
    /// `Dialogue`, `Comment`, ...
    pub kind: String,
    pub layer: u32,
    pub start_ms: u64,
    pub stop_ms: u64,
    pub style: String,
    pub name: String,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub effect: String,
    /// Raw text field, override blocks included
    pub text: String,
}

/// Split a document into `(header, body)` pairs in file order
pub fn split_sections(text: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = SECTION_HEADER_REGEX.captures(line.trim()) {
            sections.push((caps[1].to_string(), Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        }
    }

    sections
        .into_iter()
        .map(|(name, body)| (name, body.join("\n")))
        .collect()
}

/// Decode one event line
pub fn decode_event(line: &str) -> Result<AssDialogue, SubtitleError> {
    let malformed = || SubtitleError::MalformedRecord(format!("not an ASS event: {:?}", line));

    let caps = EVENT_REGEX.captures(line).ok_or_else(malformed)?;
    let number = |idx: usize| caps[idx].parse::<u64>().map_err(|_| malformed());
    let small = |idx: usize| caps[idx].parse::<u32>().map_err(|_| malformed());

    Ok(AssDialogue {
        kind: caps[1].trim().to_string(),
        layer: small(2)?,
        start_ms: timecode::ass_time_to_ms(number(3)?, number(4)?, number(5)?, number(6)?)
            .ok_or_else(malformed)?,
        stop_ms: timecode::ass_time_to_ms(number(7)?, number(8)?, number(9)?, number(10)?)
            .ok_or_else(malformed)?,
        style: caps[11].to_string(),
        name: caps[12].to_string(),
        margin_l: small(13)?,
        margin_r: small(14)?,
        margin_v: small(15)?,
        effect: caps[16].to_string(),
        text: caps[17].to_string(),
    })
}

/// Parse the `[Events]` section into a single track, logging each
/// diagnostic as a warning
pub fn parse(file_name: &str, text: &str) -> Result<Track, SubtitleError> {
    let (track, diagnostics) = parse_with_diagnostics(file_name, text)?;
    for diagnostic in &diagnostics {
        warn!("{}", diagnostic);
    }
    Ok(track)
}

/// Parse the `[Events]` section, returning the non-fatal diagnostics
/// (one `UnknownCommand` per distinct command) next to the track
pub fn parse_with_diagnostics(file_name: &str, text: &str) -> Result<(Track, Vec<SubtitleError>), SubtitleError> {
    let sections = split_sections(text);
    let events = sections
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(EVENTS_SECTION))
        .map(|(_, body)| body)
        .ok_or_else(|| SubtitleError::NoCuesFound {
            file: file_name.to_string(),
        })?;

    let mut cues = Vec::new();
    let mut malformed = 0usize;
    let mut diagnostics: Vec<SubtitleError> = Vec::new();

    // First line is the Format: header
    for line in events.lines().filter(|line| !line.trim().is_empty()).skip(1) {
        let dialogue = match decode_event(line) {
            Ok(dialogue) => dialogue,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };

        if dialogue.stop_ms < dialogue.start_ms {
            return Err(SubtitleError::SyncOrderingInvalid {
                file: file_name.to_string(),
                start_ms: dialogue.start_ms,
                stop_ms: dialogue.stop_ms,
            });
        }

        let translation = markup::ass::translate(&dialogue.text);
        for command in translation.unknown_commands {
            let diagnostic = SubtitleError::UnknownCommand {
                file: file_name.to_string(),
                command,
            };
            if !diagnostics.contains(&diagnostic) {
                diagnostics.push(diagnostic);
            }
        }

        if let Some(cue) = Cue::try_new(dialogue.start_ms, dialogue.stop_ms, translation.text) {
            cues.push(cue);
        }
    }

    debug!("{}: {} cues, {} malformed events skipped", file_name, cues.len(), malformed);

    Ok((Track::new(TRACK_LABEL, cues), diagnostics))
}
