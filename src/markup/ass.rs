/*!
 * ASS override-block interpreter.
 *
 * Override blocks are `{...}` groups of backslash commands inside a dialogue
 * text field. Only bold, italic, underline and primary color have a
 * canonical equivalent; font size and position are dropped silently and
 * everything else is reported back to the caller.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]*)\}").unwrap());

// &HBBGGRR&
static COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&H([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})&").unwrap()
});

static HARD_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[Nn]").unwrap());

const TOGGLES: [&str; 3] = ["b", "i", "u"];

/// Result of translating one dialogue text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssTranslation {
    /// Canonical markup
    pub text: String,
    /// Commands with no translation, without their backslash
    pub unknown_commands: Vec<String>,
}

/// Translate a dialogue text field into canonical markup.
///
/// Bold, italic and underline state is tracked across the whole field, not
/// reset per override block, so a `{\b0}` in a later block closes a `{\b1}`
/// from an earlier one and a repeated `{\b0}` emits nothing. Toggles still
/// open at the end of the field are closed there. Color tags are emitted open
/// and never closed.
pub fn translate(text: &str) -> AssTranslation {
    let mut open = [false; 3];
    let mut unknown_commands = Vec::new();

    let translated = OVERRIDE_BLOCK_REGEX.replace_all(text, |caps: &Captures| {
        let mut out = String::new();

        for command in caps[1].split('\\').skip(1) {
            let name_len = command
                .find(|c: char| !c.is_ascii_lowercase())
                .unwrap_or(command.len());
            let (name, argument) = command.split_at(name_len);

            match name {
                "" => {}
                "c" => {
                    if let Some(color) = COLOR_REGEX.captures(argument) {
                        out.push_str(&format!("<font color=\"#{}{}{}\">", &color[3], &color[2], &color[1]));
                    }
                }
                "fs" | "pos" => {}
                _ => match TOGGLES.iter().position(|toggle| *toggle == name) {
                    Some(slot) => {
                        let enable = leading_int(argument) > 0;
                        if enable && !open[slot] {
                            out.push_str(&format!("<{}>", name));
                        } else if !enable && open[slot] {
                            out.push_str(&format!("</{}>", name));
                        }
                        open[slot] = enable;
                    }
                    None => unknown_commands.push(command.to_string()),
                },
            }
        }

        out
    });

    let mut text = HARD_BREAK_REGEX.replace_all(&translated, "\n").replace("\\h", " ");

    for (slot, toggle) in TOGGLES.iter().enumerate().rev() {
        if open[slot] {
            text.push_str(&format!("</{}>", toggle));
        }
    }

    AssTranslation {
        text: super::tidy_lines(&text),
        unknown_commands,
    }
}

fn leading_int(argument: &str) -> u64 {
    argument
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
