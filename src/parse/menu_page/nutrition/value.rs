use std::sync::OnceLock;

use regex::Regex;

use super::label::FieldKey;
use crate::parse::numeric_only;

/// Pulls the numeric amount for `field` out of a row, or `None` when the row has no digits
/// where that field keeps them.
pub fn extract(field: FieldKey, label: &str, value: &str) -> Option<String> {
    let amount = match field {
        FieldKey::ServingSize => serving_size(label)?,
        key if key.reads_value_column() => numeric_only(value),
        key => numeric_only(after_phrase(label, key.label_phrase())),
    };
    (!amount.is_empty()).then_some(amount)
}

// "Serving Size 1 cup (226g)" -> "226"
fn serving_size(label: &str) -> Option<String> {
    static PARENTHESIZED: OnceLock<Regex> = OnceLock::new();
    let re = PARENTHESIZED.get_or_init(|| Regex::new(r"\((.*?)\)").expect("regex should be valid"));
    let captures = re.captures(after_phrase(label, "Size"))?;
    Some(numeric_only(&captures[1]))
}

/// The part of `label` after `phrase`. Labels that misspell the phrase fall back to
/// everything after the head word.
fn after_phrase<'a>(label: &'a str, phrase: &str) -> &'a str {
    match label.find(phrase) {
        Some(start) => &label[start + phrase.len()..],
        None => label
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest),
    }
}
