use std::sync::LazyLock;

use regex::Regex;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// Keep medical notation: ranges, ratios, percentages, comparison signs.
static RE_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,:;\-()/%<>]").unwrap());

/// Clean raw extracted text for downstream matching.
///
/// Collapses whitespace runs, replaces characters outside the allowed set
/// with spaces, and trims. Case is preserved; matching downstream is
/// case-insensitive. Total function, never fails.
pub fn clean_text(text: &str) -> String {
    let collapsed = RE_WHITESPACE.replace_all(text, " ");
    let stripped = RE_SPECIAL.replace_all(&collapsed, " ");
    stripped.trim().to_string()
}
