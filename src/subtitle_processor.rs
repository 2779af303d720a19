use std::fmt;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::debug;

use crate::charset;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::formats::{self, SubtitleFormat};
use crate::markup;
use crate::timecode;

// @module: Canonical cue model, document loading and SRT serialization

// @struct: Single subtitle display unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: Stop time in ms
    pub stop_ms: u64,

    // @field: Canonical markup, lines separated by '\n'
    pub text: String,
}

impl Cue {
    /// Creates a cue without checking its invariants - used by tests and benches
    pub fn new(start_ms: u64, stop_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            start_ms,
            stop_ms,
            text: text.into(),
        }
    }

    // @creates: Cue only when it can be materialized
    // @validates: Non-zero stop and visible text
    pub fn try_new(start_ms: u64, stop_ms: u64, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if stop_ms == 0 || markup::is_blank_text(&text) {
            return None;
        }
        Some(Self::new(start_ms, stop_ms, text))
    }

    /// Text with all markup removed
    pub fn plain_text(&self) -> String {
        markup::strip_tags(&self.text)
    }
}

/// Ordered cues for one language or style variant of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// SAMI class, or the format name for single-track formats
    pub label: String,

    /// Cues sorted by start time
    pub cues: Vec<Cue>,
}

impl Track {
    /// Create a track, sorting cues by start time (ties keep input order)
    pub fn new(label: impl Into<String>, mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.start_ms);
        Track {
            label: label.into(),
            cues,
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Concatenated de-tagged text, used for language identification
    pub fn plain_text(&self) -> String {
        self.cues
            .iter()
            .map(|cue| cue.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the track as SRT.
    ///
    /// Cues starting at or after `time_begin_ms` are shifted by
    /// `time_offset_ms`; earlier cues are written unchanged. Indices are
    /// renumbered from 1.
    pub fn to_srt_string(&self, time_begin_ms: u64, time_offset_ms: i64) -> String {
        let mut out = String::new();

        for (idx, cue) in self.cues.iter().enumerate() {
            let offset = if cue.start_ms >= time_begin_ms { time_offset_ms } else { 0 };
            let start = timecode::apply_offset(cue.start_ms, offset);
            let stop = timecode::apply_offset(cue.stop_ms, offset);

            // Writing into a String cannot fail
            let _ = write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                idx + 1,
                timecode::format_timestamp(start),
                timecode::format_timestamp(stop),
                cue.text
            );
        }

        out
    }

    /// Write the track to an SRT file as UTF-8, replacing any existing file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P, time_begin_ms: u64, time_offset_ms: i64) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            FileManager::ensure_dir(parent)?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(self.to_srt_string(time_begin_ms, time_offset_ms).as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} cues)", self.label, self.cues.len())
    }
}

/// One decoded input file
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path the document was read from
    pub path: PathBuf,

    /// Decoded text with `\r\n` collapsed to `\n`
    pub text: String,

    /// Name of the encoding used to decode the bytes
    pub encoding: String,

    /// Structural format detected from the text
    pub format: SubtitleFormat,

    /// Language hint taken from the file name
    pub language_hint: Option<String>,
}

impl SourceDocument {
    /// Build a document from already decoded text
    pub fn from_text(path: impl Into<PathBuf>, text: &str, encoding: &str, language_hint: Option<String>) -> Self {
        let text = normalize_newlines(text);
        let format = formats::detect_format(&text);

        SourceDocument {
            path: path.into(),
            text,
            encoding: encoding.to_string(),
            format,
            language_hint,
        }
    }

    /// File name used in diagnostics
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads source documents and parses them into tracks
pub struct SubtitleProcessor;

impl SubtitleProcessor {
    /// Decode raw bytes into a source document
    pub fn load_document(
        path: &Path,
        bytes: &[u8],
        encoding_override: Option<&str>,
        language_hint: Option<String>,
    ) -> Result<SourceDocument, SubtitleError> {
        let file_name = path.display().to_string();
        let decoded = charset::decode_bytes(&file_name, bytes, encoding_override)?;

        let document = SourceDocument::from_text(path, &decoded.text, decoded.encoding.name(), language_hint);
        debug!("{}: decoded as {}, detected {}", file_name, document.encoding, document.format);

        Ok(document)
    }

    /// Parse a document into its non-empty tracks
    pub fn parse_document(document: &SourceDocument) -> Result<Vec<Track>, SubtitleError> {
        let file_name = document.display_name();

        let tracks = match document.format {
            SubtitleFormat::Sami => formats::sami::parse(&file_name, &document.text)?,
            SubtitleFormat::Srt => vec![formats::srt::parse(&file_name, &document.text)?],
            SubtitleFormat::Ass => vec![formats::ass::parse(&file_name, &document.text)?],
            SubtitleFormat::Unrecognized => {
                return Err(SubtitleError::UnsupportedFormat {
                    file: file_name,
                    leading: formats::leading_char_codes(&document.text, 3),
                });
            }
        };

        let tracks: Vec<Track> = tracks.into_iter().filter(|track| !track.is_empty()).collect();
        if tracks.is_empty() {
            return Err(SubtitleError::NoCuesFound { file: file_name });
        }

        debug!(
            "{}: {} track(s): {}",
            file_name,
            tracks.len(),
            tracks.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
        );

        Ok(tracks)
    }
}

/// Collapse Windows line endings
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
