/*!
 * Lenient SAMI tokenizer and HTML cleanup.
 *
 * SAMI bodies are HTML in name only: tags are left open, attributes are
 * unquoted, case is arbitrary and `&nbsp` is often missing its semicolon.
 * This is not a general HTML engine. It understands the few tags SAMI
 * actually uses (`SYNC`, `P`, `BR`) plus the canonical inline tags, and
 * treats anything it cannot read as plain text. Entities are never decoded.
 */

use crate::errors::SubtitleError;
use std::ops::Range;

/// Label used when neither SYNC nor P carries a `class`
pub const DEFAULT_LABEL: &str = "unknown";

/// A start or end tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name
    pub name: String,
    /// Attributes in source order, names lowercased, values verbatim
    pub attributes: Vec<(String, String)>,
    /// Byte range of the whole tag in the tokenized input
    pub span: Range<usize>,
}

impl Tag {
    /// Case-insensitive attribute lookup
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Open(Tag),
    Close(Tag),
    /// Comment or declaration, dropped from output
    Comment,
}

impl Token<'_> {
    fn tag(&self) -> Option<&Tag> {
        match self {
            Token::Open(tag) | Token::Close(tag) => Some(tag),
            _ => None,
        }
    }
}

/// One `<SYNC>` block reduced to its typed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamiBlock {
    /// Declared `start` attribute
    pub start_ms: u64,
    /// Literal `class` value, or `DEFAULT_LABEL`
    pub label: String,
    /// Raw inner markup of the first P, or of the SYNC itself
    pub payload: String,
}

/// Split markup into text, tags and comments.
///
/// A `<` that does not start a readable tag stays part of the text.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }

        let parsed = match bytes.get(pos + 1) {
            Some(b'!') => Some((Token::Comment, skip_declaration(input, pos))),
            Some(b'/') => parse_tag(input, pos, true).map(|(tag, end)| (Token::Close(tag), end)),
            Some(c) if c.is_ascii_alphabetic() => {
                parse_tag(input, pos, false).map(|(tag, end)| (Token::Open(tag), end))
            }
            _ => None,
        };

        match parsed {
            Some((token, end)) => {
                if text_start < pos {
                    tokens.push(Token::Text(&input[text_start..pos]));
                }
                tokens.push(token);
                pos = end;
                text_start = end;
            }
            None => pos += 1,
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }

    tokens
}

fn skip_declaration(input: &str, start: usize) -> usize {
    let rest = &input[start..];
    let found = if rest.starts_with("<!--") {
        rest.find("-->").map(|end| end + 3)
    } else {
        rest.find('>').map(|end| end + 1)
    };
    found.map_or(input.len(), |len| start + len)
}

fn parse_tag(input: &str, start: usize, closing: bool) -> Option<(Tag, usize)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut pos = start + 1 + usize::from(closing);

    let name_start = pos;
    while pos < len && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'-' | b':')) {
        pos += 1;
    }
    if pos == name_start {
        return None;
    }
    let name = input[name_start..pos].to_ascii_lowercase();

    let mut attributes = Vec::new();
    loop {
        while pos < len && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= len {
            // Unterminated tag
            return None;
        }
        if bytes[pos] == b'>' {
            pos += 1;
            break;
        }

        let attr_start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'=' | b'>' | b'/') {
            pos += 1;
        }
        let attr_name = input[attr_start..pos].to_ascii_lowercase();

        let mut look = pos;
        while look < len && bytes[look].is_ascii_whitespace() {
            look += 1;
        }

        let mut value = String::new();
        if look < len && bytes[look] == b'=' {
            pos = look + 1;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < len && matches!(bytes[pos], b'"' | b'\'') {
                let quote = bytes[pos] as char;
                let value_start = pos + 1;
                let offset = input[value_start..].find(quote)?;
                value = input[value_start..value_start + offset].to_string();
                pos = value_start + offset + 1;
            } else {
                let value_start = pos;
                while pos < len && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                    pos += 1;
                }
                value = input[value_start..pos].to_string();
            }
        }

        if !attr_name.is_empty() {
            attributes.push((attr_name, value));
        }
    }

    Some((Tag { name, attributes, span: start..pos }, pos))
}

/// Integer prefix of an attribute value (`"1000ms"` reads as 1000)
pub fn parse_leading_int(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Decode one `<SYNC ...>` block into its start, label and payload
pub fn parse_sync_block(block: &str) -> Result<SamiBlock, SubtitleError> {
    let tokens = tokenize(block);

    let sync_idx = tokens
        .iter()
        .position(|t| matches!(t, Token::Open(tag) if tag.name == "sync"))
        .ok_or_else(|| SubtitleError::MalformedRecord(format!("no SYNC tag in {:?}", preview(block))))?;
    let sync = tokens[sync_idx].tag().ok_or_else(|| SubtitleError::MalformedRecord("no SYNC tag".into()))?;

    let start_ms = sync
        .attribute("start")
        .and_then(parse_leading_int)
        .ok_or_else(|| SubtitleError::MalformedRecord(format!("SYNC without usable start: {}", &block[sync.span.clone()])))?;

    let paragraph_idx = tokens
        .iter()
        .enumerate()
        .skip(sync_idx + 1)
        .find(|(_, t)| matches!(t, Token::Open(tag) if tag.name == "p"))
        .map(|(idx, _)| idx);

    let label = std::iter::once(sync_idx)
        .chain(paragraph_idx)
        .filter_map(|idx| tokens[idx].tag().and_then(|tag| tag.attribute("class")))
        .find(|class| !class.is_empty())
        .unwrap_or(DEFAULT_LABEL)
        .to_string();

    let content_idx = paragraph_idx.unwrap_or(sync_idx);
    let content_start = tokens[content_idx].tag().map_or(0, |tag| tag.span.end);
    let content_end = tokens
        .iter()
        .skip(content_idx + 1)
        .filter_map(Token::tag)
        .find(|tag| matches!(tag.name.as_str(), "p" | "sync" | "body"))
        .map_or(block.len(), |tag| tag.span.start);

    Ok(SamiBlock {
        start_ms,
        label,
        payload: block[content_start..content_end].to_string(),
    })
}

/// Convert SAMI inner markup to canonical markup.
///
/// `<br>` becomes a line break, whitespace runs collapse, `b`/`i`/`u` and
/// colored `font` tags are kept, other tags are removed with their text
/// kept. Tags left open are closed at the end.
pub fn translate(payload: &str) -> String {
    let mut out = String::new();
    let mut open: Vec<(String, bool)> = Vec::new();

    for token in tokenize(payload) {
        match token {
            Token::Text(text) => push_collapsed(&mut out, text),
            Token::Open(tag) => match tag.name.as_str() {
                "br" => out.push('\n'),
                "b" | "i" | "u" => {
                    out.push_str(&format!("<{}>", tag.name));
                    open.push((tag.name.clone(), true));
                }
                "font" => match tag.attribute("color").filter(|c| !c.trim().is_empty()) {
                    Some(color) => {
                        out.push_str(&format!("<font color=\"{}\">", color.trim()));
                        open.push((tag.name.clone(), true));
                    }
                    None => open.push((tag.name.clone(), false)),
                },
                _ => {}
            },
            Token::Close(tag) => {
                // Stray closing tags are dropped
                if let Some(pos) = open.iter().rposition(|(name, _)| *name == tag.name) {
                    let closed: Vec<_> = open.drain(pos..).collect();
                    for (name, emitted) in closed.into_iter().rev() {
                        if emitted {
                            out.push_str(&format!("</{}>", name));
                        }
                    }
                }
            }
            Token::Comment => {}
        }
    }

    for (name, emitted) in open.into_iter().rev() {
        if emitted {
            out.push_str(&format!("</{}>", name));
        }
    }

    super::tidy_lines(&out)
}

fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}
