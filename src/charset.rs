/*!
 * Source encoding resolution.
 *
 * Korean SAMI files are usually CP949, Japanese ones Shift_JIS, newer ones
 * UTF-8 or UTF-16 with a BOM. The encoding is taken from an explicit label
 * when given, then from the BOM, then from a statistical guess.
 */

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{debug, warn};

use crate::errors::SubtitleError;

// Common labels that are not WHATWG labels
const LABEL_ALIASES: [(&str, &str); 6] = [
    ("cp949", "windows-949"),
    ("ms949", "windows-949"),
    ("uhc", "windows-949"),
    ("euc_kr", "euc-kr"),
    ("cp932", "shift_jis"),
    ("cp936", "gbk"),
];

/// Decoded text and the encoding that produced it
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// How the encoding was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    Override,
    ByteOrderMark,
    Guessed,
}

/// Look up an encoding by label, accepting the aliases above
pub fn resolve_encoding_label(label: &str) -> Option<&'static Encoding> {
    let label = label.trim().to_ascii_lowercase();
    let label = LABEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map_or(label.as_str(), |&(_, canonical)| canonical);

    Encoding::for_label(label.as_bytes())
}

/// Pick the encoding for raw bytes
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, EncodingSource::ByteOrderMark);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), EncodingSource::Guessed)
}

/// Decode a file's bytes.
///
/// An unknown override label is an error. Undecodable sequences are replaced
/// with U+FFFD and reported as a warning.
pub fn decode_bytes(file_name: &str, bytes: &[u8], encoding_override: Option<&str>) -> Result<DecodedText, SubtitleError> {
    let (encoding, source) = match encoding_override {
        Some(label) => {
            let encoding = resolve_encoding_label(label).ok_or_else(|| SubtitleError::Decode {
                file: file_name.to_string(),
                encoding: label.to_string(),
            })?;
            (encoding, EncodingSource::Override)
        }
        None => detect_encoding(bytes),
    };

    debug!("{}: using {} ({:?})", file_name, encoding.name(), source);

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        warn!("{}: invalid {} sequences replaced", file_name, encoding.name());
    }

    Ok(DecodedText {
        text: text.into_owned(),
        encoding,
    })
}
