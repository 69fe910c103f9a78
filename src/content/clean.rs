//! Text normalization applied before chunking

use regex::Regex;
use std::sync::OnceLock;

static RE_BLANK_LINES: OnceLock<Regex> = OnceLock::new();
static RE_WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
static RE_PAGE_OF: OnceLock<Regex> = OnceLock::new();
static RE_PAGE: OnceLock<Regex> = OnceLock::new();

fn re_blank_lines() -> &'static Regex {
    RE_BLANK_LINES.get_or_init(|| Regex::new(r"\n{2,}").expect("valid regex"))
}

fn re_whitespace_run() -> &'static Regex {
    RE_WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s{2,}").expect("valid regex"))
}

fn re_page_of() -> &'static Regex {
    RE_PAGE_OF.get_or_init(|| Regex::new(r"(?i)page \d+ of \d+").expect("valid regex"))
}

fn re_page() -> &'static Regex {
    RE_PAGE.get_or_init(|| Regex::new(r"(?i)page \d+").expect("valid regex"))
}

/// Normalize extracted document text
///
/// Collapses whitespace runs, turns the remaining line breaks into spaces,
/// drops control characters, and strips `Page N of M` / `Page N` page
/// markers left behind by PDF extraction.
pub fn clean_text(text: &str) -> String {
    let text = text.replace('\r', " ");
    let text = re_blank_lines().replace_all(&text, "\n");
    let text = re_whitespace_run().replace_all(&text, " ");
    let text: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let text = re_page_of().replace_all(&text, "");
    let text = re_page().replace_all(&text, "");
    text.trim().to_string()
}
