/// Text heuristics applied to message content.
use once_cell::sync::Lazy;
use regex::Regex;

/// Synthetic "Reacted ... message" / "Liked ... message" notices.
///
/// The wildcard stops at line terminators (`\r`, `\n`, U+2028, U+2029).
static REACTION_NOTICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Reacted|Liked) [^\r\n\x{2028}\x{2029}]* message\s?$").unwrap()
});

/// Run length of non-ASCII UTF-16 units that marks text as not English.
const NON_ENGLISH_RUN: usize = 10;

/// A word followed by a closing parenthesis, e.g. "ok)" or "thanks))".
static SMILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Za-z_]+\)").unwrap());

/// Returns true when the content is a reaction notification rather than authored text.
pub fn is_reaction_notice(content: &str) -> bool {
    REACTION_NOTICE_RE.is_match(content)
}

/// English-ness heuristic: a long run of non-ASCII characters means the text is not English.
///
/// Runs are measured in UTF-16 code units, so each astral char (emoji) counts twice.
pub fn looks_english(content: &str) -> bool {
    let mut run = 0;
    for unit in content.encode_utf16() {
        if unit > 0x7F {
            run += 1;
            if run >= NON_ENGLISH_RUN {
                return false;
            }
        } else {
            run = 0;
        }
    }
    true
}

pub fn has_smile(content: &str) -> bool {
    SMILE_RE.is_match(content)
}

/// Content length in UTF-16 code units.
pub fn content_length(content: &str) -> u64 {
    content.encode_utf16().count() as u64
}
