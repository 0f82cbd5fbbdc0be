use std::sync::LazyLock;

use regex::Regex;

/// Maximum text size forwarded to a provider, in characters.
pub const MAX_TEXT_CHARS: usize = 8000;

/// Marker appended when input is truncated.
pub const TRUNCATION_MARKER: &str = "...";

/// Boilerplate phrases stripped before summarization.
///
/// Each entry is a regex fragment matched case-insensitively; a match is
/// consumed from the phrase start to the end of the line. Extend this table
/// rather than adding branches to [`normalize`].
const BOILERPLATE_PHRASES: &[&str] = &[
    r"we use cookies",
    r"this (?:web)?site uses cookies",
    r"accept (?:all )?cookies",
    r"cookie settings",
    r"sign in to continue",
    r"log in to continue",
    r"subscribe to (?:our )?newsletter",
    r"sign up for (?:our )?newsletter",
    r"read more",
    r"advertisement",
    r"sponsored content",
    r"share this article",
    r"related articles",
    r"follow us on",
];

static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = BOILERPLATE_PHRASES.join("|");
    Regex::new(&format!(r"(?i)(?:{alternation})[^\n]*"))
        .expect("boilerplate phrase table must compile")
});

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("whitespace pattern must compile"));

static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("trailing pattern must compile"));

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-line pattern must compile"));

/// Deterministic pre-provider text cleanup.
///
/// In order: boilerplate phrase removal, horizontal whitespace collapse,
/// blank-line collapse, adjacent duplicate-line removal, and truncation to
/// [`MAX_TEXT_CHARS`]. No I/O; idempotent — `normalize(normalize(x))`
/// equals `normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let text = BOILERPLATE.replace_all(raw, "");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = TRAILING_WS.replace_all(&text, "");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    let text = dedup_adjacent_lines(&text);
    truncate(text.trim())
}

/// Collapse runs of identical consecutive lines to a single occurrence.
/// Only adjacent duplicates are removed; repeats elsewhere are kept.
fn dedup_adjacent_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        if out.last() != Some(&line) {
            out.push(line);
        }
    }
    out.join("\n")
}

/// Hard cap at [`MAX_TEXT_CHARS`] characters, appending [`TRUNCATION_MARKER`]
/// when the input is cut.
fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((byte_idx, _)) => {
            let mut out = text[..byte_idx].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
        None => text.to_string(),
    }
}
