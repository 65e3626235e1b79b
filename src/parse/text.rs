use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use scraper::ElementRef;

pub fn remove_excess_whitespace(s: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s\s+").expect("regex should be valid"));
    re.replace_all(s, " ")
}

/// Drops every `\r` and `\n` without inserting a separator.
pub fn remove_line_breaks(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.replace(['\r', '\n'], ""))
    } else {
        Cow::Borrowed(s)
    }
}

/// Concatenated text of every node below `element`, without line breaks and trimmed.
pub fn element_text(element: ElementRef) -> String {
    let text: String = element.text().collect();
    remove_line_breaks(text.trim()).trim().to_owned()
}

/// Keeps ASCII digits and the first decimal point, dropping everything else.
pub fn numeric_only(s: &str) -> String {
    let mut seen_dot = false;
    s.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        })
        .collect()
}
