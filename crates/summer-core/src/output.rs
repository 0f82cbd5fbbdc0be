use std::sync::LazyLock;

use regex::Regex;

/// Paired delimiters whose enclosed content is a model's reasoning trace.
/// Matched case-insensitively across multiple lines.
const THINKING_DELIMITERS: &[(&str, &str)] = &[
    ("<think>", "</think>"),
    ("<thinking>", "</thinking>"),
    ("[thinking]", "[/thinking]"),
    ("*thinking*", "*thinking*"),
];

/// Line openers that start a reasoning preamble. The preamble runs until the
/// next blank line or a line starting with an uppercase letter.
const REASONING_OPENERS: &[&str] = &[
    "let me think",
    "okay, let's see",
    "i need to",
    "the user wants",
];

static THINKING_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    THINKING_DELIMITERS
        .iter()
        .map(|(open, close)| {
            Regex::new(&format!(
                r"(?is){}.*?{}",
                regex::escape(open),
                regex::escape(close)
            ))
            .expect("thinking delimiter table must compile")
        })
        .collect()
});

static SUMMARY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^summary:\s*").expect("summary label must compile"));

/// Leading meta-commentary openers, tried once each against the start of the
/// cleaned text.
static META_OPENERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:here'?s|here is)\s+(?:a\s+|the\s+)?(?:brief\s+)?summary[^\n:]*:?\s*",
        r"(?i)^based on[^\n:]*:?\s*",
        r"(?i)^the article[^\n]*?discusses[^\n:]*:?\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("meta opener table must compile"))
    .collect()
});

static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("trailing pattern must compile"));

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-line pattern must compile"));

/// Strip reasoning traces, stock prefaces, and meta-commentary from a raw
/// completion, leaving only the summary prose.
///
/// Best-effort heuristic filtering: residual commentary is acceptable, and
/// text already free of markers passes through unchanged apart from
/// whitespace trimming.
pub fn clean_output(raw: &str) -> String {
    let mut text = raw.to_string();

    for pattern in THINKING_BLOCKS.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }

    text = drop_reasoning_preambles(&text);

    let mut text = text.trim_start().to_string();
    text = SUMMARY_LABEL.replace(&text, "").into_owned();
    for pattern in META_OPENERS.iter() {
        text = pattern.replace(&text, "").into_owned();
    }

    let text = TRAILING_WS.replace_all(&text, "");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Drop lines from a reasoning opener up to (but not including) the next
/// blank line or capitalized line start.
fn drop_reasoning_preambles(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if skipping {
            let ends_preamble = trimmed.is_empty()
                || trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase());
            if ends_preamble {
                skipping = false;
            } else {
                continue;
            }
        }

        let lowered = trimmed.to_lowercase();
        if REASONING_OPENERS.iter().any(|o| lowered.starts_with(o)) {
            skipping = true;
            continue;
        }

        out.push(line);
    }

    out.join("\n")
}
