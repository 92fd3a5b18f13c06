use std::sync::LazyLock;

use regex::Regex;

use crate::types::CaptureMatch;

/// `[capture]` optionally followed by whitespace and `(option)`.
static CAPTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?P<capture>[^\[\]]+)\](?P<tail>\s+\((?P<option>[^)]+)\))?")
        .expect("valid regex")
});

/// Finds every bracket capture in `document`, in document order.
///
/// A capture immediately followed by `(` is a Markdown link, not a mention,
/// and is skipped.
pub fn scan_captures(document: &str) -> Vec<CaptureMatch> {
    CAPTURE_RE
        .captures_iter(document)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if caps.name("tail").is_none() && document[whole.end()..].starts_with('(') {
                return None;
            }
            let (line, line_text) = line_of(document, whole.start(), whole.end());
            Some(CaptureMatch {
                full: whole.as_str().to_string(),
                capture: caps.name("capture")?.as_str().to_string(),
                option: caps.name("option").map(|m| m.as_str().to_string()),
                start: whole.start(),
                end: whole.end(),
                line,
                line_text,
            })
        })
        .collect()
}

/// 1-based line number of `start` and the text of the lines spanning
/// `start..end`.
fn line_of(document: &str, start: usize, end: usize) -> (usize, String) {
    let line_start = document[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = document[end..]
        .find('\n')
        .map(|i| end + i)
        .unwrap_or(document.len());
    let line = document[..start].matches('\n').count() + 1;
    (line, document[line_start..line_end].to_string())
}
