/*!
 * Timestamp parsing, formatting and offset arithmetic.
 *
 * All times are integer milliseconds. Formatting truncates, it never rounds.
 */

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

// @const: [H:]MM:SS[,mmm] duration spec
static DURATION_SPEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d\d):(\d\d)(?:,(\d\d\d))?$").unwrap()
});

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02},{:03}",
        ms / MS_PER_HOUR,
        (ms / MS_PER_MINUTE) % 60,
        (ms / MS_PER_SECOND) % 60,
        ms % 1_000
    )
}

/// Fixed-radix conversion for SRT captures, `None` when the total overflows
pub fn srt_time_to_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(MS_PER_HOUR)?
        .checked_add(minutes.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(seconds.checked_mul(MS_PER_SECOND)?)?
        .checked_add(millis)
}

/// Fixed-radix conversion for ASS captures, whose last field is centiseconds
pub fn ass_time_to_ms(hours: u64, minutes: u64, seconds: u64, centis: u64) -> Option<u64> {
    srt_time_to_ms(hours, minutes, seconds, centis.checked_mul(10)?)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) into milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

    if parts.len() != 4 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let mut values = [0u64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| anyhow!("Invalid timestamp component '{}' in {}", part, timestamp))?;
    }

    let [hours, minutes, seconds, millis] = values;
    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    srt_time_to_ms(hours, minutes, seconds, millis)
        .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
}

/// Parse a user supplied time: `MM:SS`, `MM:SS,mmm`, `H:MM:SS`, `H:MM:SS,mmm`,
/// or a plain millisecond count
pub fn parse_duration_spec(spec: &str) -> Result<u64> {
    let spec = spec.trim();

    if let Some(caps) = DURATION_SPEC_REGEX.captures(spec) {
        let field = |idx: usize| -> Result<u64> {
            caps.get(idx)
                .map_or(Ok(0), |m| m.as_str().parse())
                .map_err(|_| anyhow!("Time '{}' is out of range", spec))
        };
        return srt_time_to_ms(field(1)?, field(2)?, field(3)?, field(4)?)
            .ok_or_else(|| anyhow!("Time '{}' is out of range", spec));
    }

    spec.parse::<u64>()
        .map_err(|_| anyhow!("Invalid time '{}': expected milliseconds or [H:]MM:SS[,mmm]", spec))
}

/// Shift a time by a signed offset, clamping at zero
pub fn apply_offset(ms: u64, offset_ms: i64) -> u64 {
    ms.saturating_add_signed(offset_ms)
}
