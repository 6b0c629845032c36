//! School-name extraction from free text.

use once_cell::sync::Lazy;
use regex::Regex;

// A run of Hangul syllables, an optional 초등/중/고등 qualifier, then 학교.
static SCHOOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([가-힣]+(?:초등|중|고등)?학교)").expect("school pattern"));

/// Extracts the first school name from `text`.
///
/// `None` means "ask the user to clarify" — callers must never treat it as
/// an empty-string school name.
#[must_use]
pub fn extract_school_name(text: &str) -> Option<&str> {
    SCHOOL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
