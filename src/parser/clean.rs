use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Decorative marker glyphs the source attaches to cells: visa/citizenship
/// pictograms and the regional-indicator pair that renders as a flag.
/// The lock glyph also appears here so it never survives into output fields;
/// locked-row detection runs on the raw cell before cleaning.
const MARKER_GLYPHS: &[char] = &['\u{1F6C2}', '\u{1F512}', '\u{1F1FA}', '\u{1F1F8}'];

const LOCK_GLYPH: char = '\u{1F512}';

pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Strip markup tags and marker glyphs, collapse whitespace runs, trim.
pub fn clean_cell(s: &str) -> String {
    let stripped = strip_tags(s).replace(MARKER_GLYPHS, "");
    WS_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Clean a location cell, joining `<br>`-separated fragments with ", ".
pub fn join_fragments(s: &str) -> String {
    let joined = BR_RE.replace_all(s, ", ");
    let cleaned = clean_cell(&joined);
    cleaned.trim_end_matches(',').trim_end().to_string()
}

/// A locked/restricted row marker on the raw (uncleaned) cell.
pub fn is_locked(s: &str) -> bool {
    s.contains(LOCK_GLYPH)
}
