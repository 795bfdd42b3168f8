// src/output/ansi.rs

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences (colors, cursor movement), OSC sequences (window titles,
/// hyperlinks) terminated by BEL or ST, and two-byte escapes.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1b\[[0-?]*[ -/]*[@-~]",
        r"|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)",
        r"|\x1b[@-Z\\-_]",
    ))
    .unwrap_or_else(|e| panic!("invalid ANSI escape regex: {e}"))
});

/// Remove ANSI escape sequences from `text`.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    ANSI_ESCAPE.replace_all(text, "")
}
